use serde::{Deserialize, Serialize};

/// Project category the service assigns when none is given.
pub const DEFAULT_PROJECT_TYPE: &str = "施工前期";

/// Entry of the project list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: i64,
    pub name: String,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
}

impl Project {
    pub fn project_type_or_default(&self) -> &str {
        self.project_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_PROJECT_TYPE)
    }

    /// Label used in project selection lists.
    pub fn selection_label(&self) -> String {
        format!("{} ({})", self.name, self.project_type_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedProject {
    pub project_id: i64,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub document_id: i64,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub document_id: i64,
    #[serde(default)]
    pub chapters_count: u64,
    #[serde(default)]
    pub content_length: u64,
}

/// One row of a project's review history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub review_id: i64,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub review_time: Option<String>,
    #[serde(default)]
    pub issues_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selection_label_falls_back_to_default_type() {
        let project: Project = serde_json::from_value(json!({
            "project_id": 3,
            "name": "Runway extension",
            "project_type": null,
            "status": "待审核",
            "create_time": "2025-01-02T08:30:00"
        }))
        .unwrap();
        assert_eq!(project.selection_label(), "Runway extension (施工前期)");
    }

    #[test]
    fn selection_label_uses_project_type() {
        let project = Project {
            project_id: 1,
            name: "Terminal B".into(),
            project_type: Some("竣工交付".into()),
            status: None,
            create_time: None,
        };
        assert_eq!(project.selection_label(), "Terminal B (竣工交付)");
    }
}
