use thiserror::Error;

use crate::http::transport::TransportError;
use crate::workflows::PipelineStage;

/// Failure of a call to the review service.
///
/// Transport faults, non-2xx statuses and envelopes whose `code` is not 200
/// all end up here, so callers handle one error channel.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("cannot reach {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("malformed response: {snippet}")]
    MalformedResponse { snippet: String },
    #[error("{message}")]
    Application { code: i64, message: String },
    #[error("unexpected payload from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode request for {endpoint}: {source}")]
    Encode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{endpoint} returned no data")]
    MissingData { endpoint: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Missing or invalid user input, caught before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("select a project first")]
    NoProjectSelected,
    #[error("choose a file to upload")]
    NoFileChosen,
    #[error("could not read {path}: {message}")]
    FileUnreadable { path: String, message: String },
    #[error("select an AI model first")]
    NoModelSelected,
    #[error("project name must not be empty")]
    EmptyProjectName,
    #[error("rule name must not be empty")]
    EmptyRuleName,
    #[error("rule pattern is not a valid regular expression: {message}")]
    InvalidPattern { message: String },
    #[error("there is no review report to view")]
    NoReviewAvailable,
}

/// Failure of an upload, parse and review run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// `document_id` is set once the upload succeeded; the document stays on
    /// the server even though later stages did not run.
    #[error("{stage} failed: {source}")]
    StageFailed {
        stage: PipelineStage,
        document_id: Option<i64>,
        #[source]
        source: ApiError,
    },
}

impl PipelineError {
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            PipelineError::Validation(_) => None,
            PipelineError::StageFailed { stage, .. } => Some(*stage),
        }
    }
}

/// Failure of a project or standards workflow operation.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("standard {standard_id} does not exist")]
    StandardNotFound { standard_id: i64 },
    #[error("confirmation {token} is unknown or was already used")]
    UnknownProposal { token: String },
}
