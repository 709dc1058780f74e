use anyhow::Result;
use serde_json::Value;
use std::fmt::{self, Write as _};
use std::path::PathBuf;

use crate::api::UploadFile;
use crate::cli::commands::AppContext;
use crate::errors::ValidationError;
use crate::models::{Report, ReportFormat, ReportPayload, Severity};
use crate::workflows::{PipelineInput, PipelineStage, ReviewDigest, ScoreBand};

pub struct ReviewCommand {
    pub project: Option<i64>,
    pub file: Option<PathBuf>,
    pub no_ai: bool,
}

impl ReviewCommand {
    pub async fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let file = match &self.file {
            Some(path) => Some(UploadFile::from_path(path).await?),
            None => None,
        };
        let mut pipeline = ctx.pipeline();
        if self.no_ai {
            pipeline = pipeline.with_ai(false);
        }

        let input = PipelineInput {
            project_id: self.project,
            file,
        };
        let completed = pipeline
            .run(&mut ctx.session, input, |stage| println!("{}", progress_line(stage)))
            .await?;

        println!();
        print!("{}", render_digest(&completed.digest)?);
        println!();
        println!("💡 Full report: review-desk report {}", completed.digest.review_id);
        Ok(())
    }
}

pub struct ReportCommand {
    pub review_id: i64,
    pub format: ReportFormat,
}

impl ReportCommand {
    pub async fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let payload = ctx
            .projects()
            .fetch_report(&ctx.session, Some(self.review_id), self.format)
            .await?;
        match payload {
            ReportPayload::File { report_file } => {
                println!("📄 Report written on the server: {report_file}");
            }
            ReportPayload::Structured(report) => print!("{}", render_report(&report)?),
        }
        Ok(())
    }
}

fn progress_line(stage: PipelineStage) -> String {
    let label = match stage {
        PipelineStage::Idle => "waiting",
        PipelineStage::Uploading => "uploading document...",
        PipelineStage::Parsing => "parsing document...",
        PipelineStage::Reviewing => "reviewing document...",
        PipelineStage::Done => "review complete",
        PipelineStage::Failed => "review failed",
    };
    format!("[{:>3}%] {}", stage.progress_percent(), label)
}

fn band_marker(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Favorable => "🟢",
        ScoreBand::Cautionary => "🟡",
        ScoreBand::Unfavorable => "🔴",
    }
}

fn render_digest(digest: &ReviewDigest) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "{} Score: {} ({})",
        band_marker(digest.band),
        digest.score,
        digest.band
    )?;
    writeln!(out, "   Severe issues:  {}", digest.severe_count)?;
    writeln!(out, "   General issues: {}", digest.general_count)?;
    writeln!(out, "   Suggestions:    {}", digest.suggestion_count)?;
    writeln!(out, "   {}", digest.summary)?;
    Ok(out)
}

fn render_report(report: &Report) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let info = &report.report_info;
    let summary = &report.review_summary;

    writeln!(out, "📄 {}", if info.title.is_empty() { "Review report" } else { info.title.as_str() })?;
    writeln!(out, "   Project:   {} ({})", info.project_name, info.project_type)?;
    writeln!(out, "   Generated: {}", info.generate_time)?;
    writeln!(out)?;
    writeln!(
        out,
        "{} Score {}: {} severe, {} general, {} suggestions",
        band_marker(ScoreBand::from_score(summary.score)),
        summary.score,
        summary.severe_issues,
        summary.general_issues,
        summary.suggestions
    )?;

    for category in &report.issues_list {
        writeln!(out)?;
        writeln!(out, "{}", category.category)?;
        for (index, item) in category.items.iter().enumerate() {
            let marker = Severity::from_label(item.severity.as_deref().unwrap_or_default()).marker();
            writeln!(out, "  {marker} {}. {}", index + 1, item.text())?;
            if let Some(suggestion) = item.suggestion.as_deref().filter(|s| !s.is_empty()) {
                writeln!(out, "       suggestion: {suggestion}")?;
            }
        }
    }

    if let Some(suggestions) = report.suggestions_list.as_ref().filter(|s| !s.is_empty()) {
        writeln!(out)?;
        writeln!(out, "Suggestions")?;
        for (index, suggestion) in suggestions.iter().enumerate() {
            writeln!(out, "  {}. {}", index + 1, suggestion_text(suggestion))?;
        }
    }

    if let Some(conclusion) = &report.conclusion {
        writeln!(out)?;
        writeln!(out, "Conclusion: {}", conclusion.conclusion)?;
        writeln!(out, "   {}", conclusion.description)?;
        for step in conclusion.next_steps.iter().flatten() {
            writeln!(out, "   - {step}")?;
        }
    }
    Ok(out)
}

fn suggestion_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(map) => ["description", "item", "suggestion", "content"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(": "),
        other => other.to_string(),
    }
}

/// Hint printed for validation failures of the review command.
pub fn validation_hint(error: &ValidationError) -> Option<&'static str> {
    match error {
        ValidationError::NoProjectSelected => Some("pass --project <id>; see 'review-desk projects list'"),
        ValidationError::NoFileChosen => Some("pass --file <path>"),
        _ => None,
    }
}
