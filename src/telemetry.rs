use anyhow::Result;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays clean.
pub fn init_telemetry(settings: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);

    if settings.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    tracing::debug!(level = %settings.log_level, json = settings.json_logs, "telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking related operations
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping one workflow run (a review pipeline, a rule generation, ...).
pub fn create_workflow_span(
    operation: &str,
    project_id: Option<i64>,
    correlation_id: &str,
) -> tracing::Span {
    tracing::info_span!(
        "workflow",
        operation = operation,
        project.id = project_id,
        correlation.id = correlation_id,
    )
}

/// Logs how long a stage took when finished.
pub struct StageTimer {
    stage: &'static str,
    start: Instant,
}

impl StageTimer {
    pub fn start(stage: &'static str) -> Self {
        Self {
            stage,
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        info!(
            stage = self.stage,
            duration_ms = self.start.elapsed().as_millis() as u64,
            "stage completed"
        );
    }
}
