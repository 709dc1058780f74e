use anyhow::Result;
use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::api::ReviewApi;
use crate::cache::ProjectCache;
use crate::config::ReviewDeskConfig;
use crate::http::{ApiAddress, ApiClient};
use crate::workflows::{ProjectWorkflow, ReviewPipeline, Session, StandardsManager};

pub mod points;
pub mod projects;
pub mod review;
pub mod rules;
pub mod standards;

/// Everything a command needs: settings, the service and the session.
pub struct AppContext {
    pub config: ReviewDeskConfig,
    pub api: Arc<dyn ReviewApi>,
    pub session: Session,
}

impl AppContext {
    /// Context talking to the service over HTTP.
    pub fn connect(config: ReviewDeskConfig) -> Self {
        let address = ApiAddress::resolve(&config.api);
        tracing::debug!(base_url = %address.base_url, origin = ?address.origin, "connecting");
        let api: Arc<dyn ReviewApi> = Arc::new(ApiClient::from_address(&address));
        Self::with_api(config, api)
    }

    pub fn with_api(config: ReviewDeskConfig, api: Arc<dyn ReviewApi>) -> Self {
        Self {
            config,
            api,
            session: Session::new(),
        }
    }

    pub fn projects(&self) -> ProjectWorkflow {
        ProjectWorkflow::new(self.api.clone(), ProjectCache::new(&self.config.cache.dir))
            .with_default_type(self.config.review.default_project_type.clone())
    }

    pub fn pipeline(&self) -> ReviewPipeline {
        ReviewPipeline::new(self.api.clone()).with_ai(self.config.review.use_ai)
    }

    pub fn standards(&self) -> StandardsManager {
        StandardsManager::new(self.api.clone())
            .with_default_category(self.config.review.default_standard_category.clone())
    }
}

/// Asks a yes/no question; anything but `y`/`yes` declines.
pub fn confirm(prompt: &str, auto_approve: bool) -> Result<bool> {
    if auto_approve {
        return Ok(true);
    }
    let stdin = std::io::stdin();
    confirm_with(prompt, &mut stdin.lock(), &mut std::io::stdout())
}

fn confirm_with(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<bool> {
    write!(output, "{prompt} [y/N]: ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Line printed for a failed command. Service and pipeline errors already
/// name their cause, so the cause chain is not appended again.
pub fn failure_line(error: &anyhow::Error) -> String {
    format!("❌ {error}")
}

pub fn show_how_to_get_started() -> Result<()> {
    println!("📑 review-desk - technical document review");
    println!();
    println!("To get started:");
    println!("  📁 review-desk projects list                 # Pick a project");
    println!("  🔍 review-desk review -p <id> -f plan.docx   # Review a document");
    println!("  📄 review-desk report <review-id>            # Read the full report");
    println!();
    println!("Standards and rules:");
    println!("  📚 review-desk standards list");
    println!("  🤖 review-desk standards generate <id>");
    println!("  ✏️  review-desk rules find <rule-id>");
    println!();
    println!("💡 Set REVIEW_DESK__API__BASE_URL or --base-url to point at another service.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ApiError, PipelineError};
    use crate::http::TransportError;
    use crate::workflows::PipelineStage;
    use std::io::Cursor;

    #[test]
    fn only_yes_confirms() {
        for (answer, expected) in [("y\n", true), ("YES\n", true), ("n\n", false), ("\n", false), ("", false)] {
            let mut output = Vec::new();
            let confirmed = confirm_with("Delete rule 3?", &mut Cursor::new(answer), &mut output).unwrap();
            assert_eq!(confirmed, expected, "answer {answer:?}");
            assert_eq!(String::from_utf8(output).unwrap(), "Delete rule 3? [y/N]: ");
        }
    }

    #[test]
    fn auto_approve_skips_prompt() {
        assert!(confirm("Generate rules?", true).unwrap());
    }

    #[test]
    fn failure_line_names_the_cause_once() {
        let error = anyhow::Error::from(PipelineError::StageFailed {
            stage: PipelineStage::Uploading,
            document_id: None,
            source: ApiError::Http {
                status: 500,
                message: "文件格式不支持".into(),
            },
        });
        assert_eq!(failure_line(&error), "❌ upload failed: 文件格式不支持");

        let error = anyhow::Error::from(ApiError::Transport {
            url: "http://localhost:8000/api/projects".into(),
            source: TransportError::Network {
                message: "connection refused".into(),
            },
        });
        let line = failure_line(&error);
        assert_eq!(line.matches("connection refused").count(), 1);
    }
}
