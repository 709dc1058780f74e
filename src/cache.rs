//! On-disk mirror of the project list.
//!
//! The mirror is only read when the live project list cannot be fetched, to
//! keep selection lists populated.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::models::{Project, DEFAULT_PROJECT_TYPE};

const CACHE_FILE: &str = "projects.json";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedProject {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "createTime", default)]
    pub create_time: String,
}

impl CachedProject {
    pub fn from_project(project: &Project) -> Self {
        Self {
            id: project.project_id,
            name: project.name.clone(),
            project_type: project.project_type.clone(),
            status: project.status.clone(),
            create_time: format_timestamp(project.create_time.as_deref()),
        }
    }

    /// Same label format as a live [`Project`].
    pub fn selection_label(&self) -> String {
        let project_type = self
            .project_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_PROJECT_TYPE);
        format!("{} ({})", self.name, project_type)
    }
}

/// Formats a service timestamp for display; `-` when absent.
///
/// Unrecognised timestamps are shown unchanged.
pub fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return "-".to_string();
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(DISPLAY_FORMAT).to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|parsed| parsed.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[derive(Debug, Clone)]
pub struct ProjectCache {
    path: PathBuf,
}

impl ProjectCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CACHE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the mirror with the given project list.
    pub async fn store(&self, projects: &[Project]) -> Result<()> {
        let entries: Vec<CachedProject> = projects.iter().map(CachedProject::from_project).collect();
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating cache directory {}", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(&entries)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;
        debug!(path = %self.path.display(), count = entries.len(), "project cache updated");
        Ok(())
    }

    /// Reads the mirror. A missing or unreadable mirror yields an empty list.
    pub async fn load(&self) -> Vec<CachedProject> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read project cache");
                return Vec::new();
            }
        };
        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring corrupt project cache");
            Vec::new()
        })
    }
}
