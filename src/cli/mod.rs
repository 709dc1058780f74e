use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::ReportFormat;

pub mod commands;

#[derive(Parser)]
#[command(name = "review-desk")]
#[command(about = "Command-line client for the technical document review service")]
#[command(long_about = "review-desk uploads construction plans for AI-assisted review, shows review \
                       reports and the review-point library, and manages review standards and the \
                       rules generated from them. Start with 'review-desk projects list'.")]
pub struct Cli {
    /// Override the service base address (e.g. http://localhost:8000)
    #[arg(long, global = true, help = "Service base address; skips host-based selection")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List or create projects
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },
    /// Upload a document, parse it and run the review
    Review {
        /// Project to file the document under
        #[arg(long, short = 'p', help = "Project id")]
        project: Option<i64>,
        /// Document to review
        #[arg(long, short = 'f', help = "Path of the plan document (.docx, .pdf)")]
        file: Option<PathBuf>,
        /// Rule-based review only
        #[arg(long, help = "Skip AI assistance for this review")]
        no_ai: bool,
    },
    /// Show the report of a review
    Report {
        /// Review id
        review_id: i64,
        #[arg(long, default_value = "json", help = "Report format: json or text")]
        format: ReportFormat,
    },
    /// List the reviews of a project
    Reviews {
        /// Project id
        project_id: i64,
    },
    /// Browse the review-point library
    Points {
        /// Only chapters whose name or content contains this term
        #[arg(long, short = 's')]
        search: Option<String>,
        /// Show a single chapter in full
        #[arg(long, short = 'c')]
        chapter: Option<String>,
    },
    /// List the AI models available for rule generation
    Models,
    /// Manage review standards
    Standards {
        #[command(subcommand)]
        action: StandardsAction,
    },
    /// Manage review rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
pub enum ProjectsAction {
    /// List projects (falls back to the local mirror when offline)
    List,
    /// Create a project
    Create {
        /// Project name
        name: String,
        /// Project type, e.g. 施工前期
        #[arg(long = "type", short = 't')]
        project_type: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum StandardsAction {
    /// List uploaded standards
    List,
    /// Upload a standard document
    Upload {
        /// Path of the standard document
        file: PathBuf,
        /// Display name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
        /// Category (defaults to the configured category)
        #[arg(long)]
        category: Option<String>,
    },
    /// Show a standard and its rules
    Show {
        standard_id: i64,
    },
    /// Generate rules from a standard with an AI model
    Generate {
        standard_id: i64,
        /// Model id (defaults to the preferred model when the service offers it)
        #[arg(long, short = 'm')]
        model: Option<String>,
        /// API key for the model provider
        #[arg(long, env = "REVIEW_DESK_MODEL_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum RulesAction {
    /// Find a rule by id across all standards
    Find {
        rule_id: i64,
    },
    /// Create a rule by hand
    Create {
        #[command(flatten)]
        fields: RuleFields,
    },
    /// Overwrite a rule; unspecified fields keep their current values
    Update {
        rule_id: i64,
        #[command(flatten)]
        fields: RuleFields,
    },
    /// Delete a rule
    Delete {
        rule_id: i64,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RuleFields {
    /// Standard the rule belongs to
    #[arg(long)]
    pub standard: Option<i64>,
    #[arg(long)]
    pub name: Option<String>,
    /// Rule type, e.g. 内容检查
    #[arg(long = "type")]
    pub rule_type: Option<String>,
    /// Severity: 严重, 一般 or 轻微
    #[arg(long)]
    pub severity: Option<String>,
    /// Required content item; repeat for several items
    #[arg(long, action = ArgAction::Append)]
    pub required: Vec<String>,
    /// Regular expression the document must match
    #[arg(long)]
    pub pattern: Option<String>,
    /// What reviewers should focus on
    #[arg(long)]
    pub focus: Option<String>,
    /// Disable the rule
    #[arg(long, conflicts_with = "active")]
    pub inactive: bool,
    /// Enable the rule
    #[arg(long)]
    pub active: bool,
}
