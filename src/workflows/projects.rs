use std::sync::Arc;
use tracing::{info, warn};

use crate::api::ReviewApi;
use crate::cache::{CachedProject, ProjectCache};
use crate::errors::{ValidationError, WorkflowError};
use crate::models::{CreatedProject, Project, ReportFormat, ReportPayload, ReviewRecord, DEFAULT_PROJECT_TYPE};
use crate::workflows::session::Session;

/// Entry of a project selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectChoice {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectChoices {
    pub choices: Vec<ProjectChoice>,
    /// Set when the live list could not be fetched and the mirror was used.
    pub from_cache: bool,
}

pub struct ProjectWorkflow {
    api: Arc<dyn ReviewApi>,
    cache: ProjectCache,
    default_type: String,
}

impl ProjectWorkflow {
    pub fn new(api: Arc<dyn ReviewApi>, cache: ProjectCache) -> Self {
        Self {
            api,
            cache,
            default_type: DEFAULT_PROJECT_TYPE.to_string(),
        }
    }

    pub fn with_default_type(mut self, project_type: impl Into<String>) -> Self {
        self.default_type = project_type.into();
        self
    }

    /// Creates a project and reloads the project list.
    pub async fn create_project(
        &self,
        session: &mut Session,
        name: &str,
        project_type: Option<&str>,
    ) -> Result<CreatedProject, WorkflowError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyProjectName.into());
        }
        let project_type = project_type
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(self.default_type.as_str());

        let created = self.api.create_project(name, project_type).await?;
        info!(project_id = created.project_id, name = %created.name, "project created");

        self.load_projects(session).await?;
        Ok(created)
    }

    /// Fetches the project list into the session and mirrors it to disk.
    pub async fn load_projects(&self, session: &mut Session) -> Result<Vec<Project>, WorkflowError> {
        let projects = self.api.list_projects().await?;
        if let Err(e) = self.cache.store(&projects).await {
            warn!(error = format!("{e:#}"), "could not mirror project list");
        }
        session.replace_projects(projects.clone());
        Ok(projects)
    }

    /// Projects for a selection list, falling back to the mirror when the
    /// live list is unavailable.
    pub async fn project_choices(&self, session: &mut Session) -> ProjectChoices {
        match self.load_projects(session).await {
            Ok(projects) => ProjectChoices {
                choices: projects
                    .iter()
                    .map(|p| ProjectChoice {
                        id: p.project_id,
                        label: p.selection_label(),
                    })
                    .collect(),
                from_cache: false,
            },
            Err(e) => {
                warn!(error = %e, cache = %self.cache.path().display(), "using cached project list");
                ProjectChoices {
                    choices: self
                        .cache
                        .load()
                        .await
                        .iter()
                        .map(|p: &CachedProject| ProjectChoice {
                            id: p.id,
                            label: p.selection_label(),
                        })
                        .collect(),
                    from_cache: true,
                }
            }
        }
    }

    pub async fn reviews(&self, project_id: i64) -> Result<Vec<ReviewRecord>, WorkflowError> {
        Ok(self.api.list_project_reviews(project_id).await?)
    }

    /// Report of `review_id`, or of the session's latest review.
    pub async fn fetch_report(
        &self,
        session: &Session,
        review_id: Option<i64>,
        format: ReportFormat,
    ) -> Result<ReportPayload, WorkflowError> {
        let review_id = review_id
            .or(session.current_review_id())
            .ok_or(ValidationError::NoReviewAvailable)?;
        Ok(self.api.get_report(review_id, format).await?)
    }
}
