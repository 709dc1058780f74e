use async_trait::async_trait;
use serde_json::json;

use super::{ReviewApi, UploadFile};
use crate::errors::ApiError;
use crate::http::{ApiClient, FormPart, RequestOptions};
use crate::models::{
    AiModel, CreatedProject, GeneratedRules, ParsedDocument, Project, ReportFormat, ReportPayload,
    ReviewOutcome, ReviewPoints, ReviewRecord, Rule, RulePayload, SavedRule, Standard,
    UploadedDocument, UploadedStandard,
};

fn file_part(file: &UploadFile) -> FormPart {
    FormPart::File {
        name: "file".to_string(),
        file_name: file.file_name.clone(),
        bytes: file.bytes.clone(),
    }
}

fn rule_body(payload: &RulePayload) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(payload).map_err(|source| ApiError::Encode {
        endpoint: "/api/review-rules".to_string(),
        source,
    })
}

#[async_trait]
impl ReviewApi for ApiClient {
    async fn create_project(&self, name: &str, project_type: &str) -> Result<CreatedProject, ApiError> {
        let body = json!({ "name": name, "project_type": project_type });
        self.fetch("/api/projects", RequestOptions::post().json(body)).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.fetch("/api/projects", RequestOptions::get()).await
    }

    async fn upload_document(&self, project_id: i64, file: &UploadFile) -> Result<UploadedDocument, ApiError> {
        let endpoint = format!("/api/projects/{project_id}/documents/upload");
        self.fetch(&endpoint, RequestOptions::post().multipart(vec![file_part(file)]))
            .await
    }

    async fn parse_document(&self, document_id: i64) -> Result<ParsedDocument, ApiError> {
        let endpoint = format!("/api/documents/{document_id}/parse");
        self.fetch(&endpoint, RequestOptions::post()).await
    }

    async fn review_document(&self, document_id: i64, use_ai: bool) -> Result<ReviewOutcome, ApiError> {
        let endpoint = format!("/api/documents/{document_id}/review");
        self.fetch(&endpoint, RequestOptions::post().query("use_ai", use_ai.to_string()))
            .await
    }

    async fn get_report(&self, review_id: i64, format: ReportFormat) -> Result<ReportPayload, ApiError> {
        let endpoint = format!("/api/reviews/{review_id}/report");
        self.fetch(&endpoint, RequestOptions::get().query("format", format.as_str()))
            .await
    }

    async fn list_project_reviews(&self, project_id: i64) -> Result<Vec<ReviewRecord>, ApiError> {
        let endpoint = format!("/api/projects/{project_id}/reviews");
        self.fetch(&endpoint, RequestOptions::get()).await
    }

    async fn get_review_points(&self) -> Result<ReviewPoints, ApiError> {
        self.fetch("/api/review-points", RequestOptions::get()).await
    }

    async fn list_ai_models(&self) -> Result<Vec<AiModel>, ApiError> {
        self.fetch("/api/ai-models", RequestOptions::get()).await
    }

    async fn upload_standard(
        &self,
        file: &UploadFile,
        name: Option<String>,
        category: Option<String>,
    ) -> Result<UploadedStandard, ApiError> {
        let mut parts = vec![file_part(file)];
        for (field, value) in [("name", name), ("category", category)] {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                parts.push(FormPart::Text {
                    name: field.to_string(),
                    value,
                });
            }
        }
        self.fetch("/api/review-standards/upload", RequestOptions::post().multipart(parts))
            .await
    }

    async fn list_standards(&self) -> Result<Vec<Standard>, ApiError> {
        self.fetch("/api/review-standards", RequestOptions::get()).await
    }

    async fn generate_rules(
        &self,
        standard_id: i64,
        model_name: &str,
        api_key: Option<String>,
    ) -> Result<GeneratedRules, ApiError> {
        let endpoint = format!("/api/review-standards/{standard_id}/generate-rules");
        let mut options = RequestOptions::post().query("model_name", model_name);
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            options = options.query("api_key", key);
        }
        self.fetch(&endpoint, options).await
    }

    async fn list_standard_rules(&self, standard_id: i64) -> Result<Vec<Rule>, ApiError> {
        let endpoint = format!("/api/review-standards/{standard_id}/rules");
        self.fetch(&endpoint, RequestOptions::get()).await
    }

    async fn create_rule(&self, payload: &RulePayload) -> Result<SavedRule, ApiError> {
        let body = rule_body(payload)?;
        self.fetch("/api/review-rules", RequestOptions::post().json(body)).await
    }

    async fn update_rule(&self, rule_id: i64, payload: &RulePayload) -> Result<SavedRule, ApiError> {
        let endpoint = format!("/api/review-rules/{rule_id}");
        let body = rule_body(payload)?;
        self.fetch(&endpoint, RequestOptions::put().json(body)).await
    }

    async fn delete_rule(&self, rule_id: i64) -> Result<(), ApiError> {
        let endpoint = format!("/api/review-rules/{rule_id}");
        self.execute(&endpoint, RequestOptions::delete()).await
    }
}
