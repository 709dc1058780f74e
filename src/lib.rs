// Review Desk Library - client for the technical document review service
// This exposes the core components for testing and integration

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod http;
pub mod models;
pub mod telemetry;
pub mod workflows;

// Re-export key types for easy access
pub use api::{ReviewApi, UploadFile};
pub use cache::{CachedProject, ProjectCache};
pub use config::{config, ReviewDeskConfig};
pub use errors::{ApiError, PipelineError, ValidationError, WorkflowError};
pub use http::{ApiAddress, ApiClient, HttpTransport, ReqwestTransport, TransportError};
pub use telemetry::{create_workflow_span, generate_correlation_id, init_telemetry, StageTimer};
pub use workflows::{
    CompletedReview, PipelineInput, PipelineStage, ProjectWorkflow, ReviewPipeline, Session,
    StandardsManager,
};
