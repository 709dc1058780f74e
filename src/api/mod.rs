//! Typed operations of the review service.
//!
//! [`ReviewApi`] has one method per remote endpoint. Workflows depend on the
//! trait so tests can substitute mocks; [`crate::http::ApiClient`] is the
//! production implementation (see `endpoints.rs`).

mod endpoints;

use async_trait::async_trait;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

use crate::errors::{ApiError, ValidationError};
use crate::models::{
    AiModel, CreatedProject, GeneratedRules, ParsedDocument, Project, ReportFormat, ReportPayload,
    ReviewOutcome, ReviewPoints, ReviewRecord, Rule, RulePayload, SavedRule, Standard,
    UploadedDocument, UploadedStandard,
};

/// A file read into memory for a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk; its base name becomes the upload file name.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ValidationError::FileUnreadable {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { file_name, bytes })
    }
}

/// Remote operations, one per endpoint.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReviewApi: Send + Sync {
    async fn create_project(&self, name: &str, project_type: &str) -> Result<CreatedProject, ApiError>;

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    async fn upload_document(&self, project_id: i64, file: &UploadFile) -> Result<UploadedDocument, ApiError>;

    async fn parse_document(&self, document_id: i64) -> Result<ParsedDocument, ApiError>;

    async fn review_document(&self, document_id: i64, use_ai: bool) -> Result<ReviewOutcome, ApiError>;

    async fn get_report(&self, review_id: i64, format: ReportFormat) -> Result<ReportPayload, ApiError>;

    async fn list_project_reviews(&self, project_id: i64) -> Result<Vec<ReviewRecord>, ApiError>;

    async fn get_review_points(&self) -> Result<ReviewPoints, ApiError>;

    async fn list_ai_models(&self) -> Result<Vec<AiModel>, ApiError>;

    /// `name` and `category` are omitted from the form when `None`.
    async fn upload_standard(
        &self,
        file: &UploadFile,
        name: Option<String>,
        category: Option<String>,
    ) -> Result<UploadedStandard, ApiError>;

    async fn list_standards(&self) -> Result<Vec<Standard>, ApiError>;

    /// `api_key` is sent only when present and non-blank.
    async fn generate_rules(
        &self,
        standard_id: i64,
        model_name: &str,
        api_key: Option<String>,
    ) -> Result<GeneratedRules, ApiError>;

    async fn list_standard_rules(&self, standard_id: i64) -> Result<Vec<Rule>, ApiError>;

    async fn create_rule(&self, payload: &RulePayload) -> Result<SavedRule, ApiError>;

    async fn update_rule(&self, rule_id: i64, payload: &RulePayload) -> Result<SavedRule, ApiError>;

    async fn delete_rule(&self, rule_id: i64) -> Result<(), ApiError>;
}
