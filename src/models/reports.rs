use serde::{Deserialize, Serialize};

/// Issue category label for severe findings.
pub const SEVERE_CATEGORY: &str = "严重问题";
/// Issue category label for general findings.
pub const GENERAL_CATEGORY: &str = "一般问题";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Text,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Text => "text",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ReportFormat::Json),
            "text" => Ok(ReportFormat::Text),
            other => Err(format!("unknown report format '{other}' (expected json or text)")),
        }
    }
}

/// Result of the review step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub review_id: i64,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub issues_count: u64,
    #[serde(default)]
    pub suggestions_count: u64,
    #[serde(default)]
    pub report: Report,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub report_info: ReportInfo,
    #[serde(default)]
    pub review_summary: ReviewSummary,
    #[serde(default)]
    pub completeness_check: serde_json::Value,
    #[serde(default)]
    pub chapter_reviews: serde_json::Value,
    #[serde(default)]
    pub issues_list: Vec<IssueCategory>,
    #[serde(default)]
    pub suggestions_list: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub conclusion: Option<Conclusion>,
}

impl Report {
    /// Number of items filed under the category with the given label.
    pub fn items_in_category(&self, label: &str) -> usize {
        self.issues_list
            .iter()
            .filter(|category| category.category == label)
            .map(|category| category.items.len())
            .sum()
    }

    pub fn suggestion_count(&self) -> usize {
        self.suggestions_list.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub generate_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub total_issues: u64,
    #[serde(default)]
    pub severe_issues: u64,
    #[serde(default)]
    pub general_issues: u64,
    #[serde(default)]
    pub suggestions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueCategory {
    pub category: String,
    #[serde(default)]
    pub items: Vec<IssueItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueItem {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
}

impl IssueItem {
    pub fn text(&self) -> &str {
        self.description
            .as_deref()
            .or(self.item.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conclusion {
    #[serde(default)]
    pub conclusion: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub next_steps: Option<Vec<String>>,
}

/// Body of the report endpoint: the structured report, or a reference to a
/// rendered text file on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportPayload {
    File { report_file: String },
    Structured(Box<Report>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_report() -> serde_json::Value {
        json!({
            "report_info": {
                "title": "技术方案审核报告",
                "generate_time": "2025-03-01 10:00:00",
                "project_name": "Apron works",
                "project_type": "施工前期"
            },
            "review_summary": {
                "score": 72,
                "total_issues": 3,
                "severe_issues": 1,
                "general_issues": 2,
                "suggestions": 1
            },
            "issues_list": [
                {"category": "一般问题", "items": [
                    {"type": "规则检查", "severity": "一般", "description": "missing drainage plan"},
                    {"severity": "一般", "item": "schedule gaps", "suggestion": "add milestones"}
                ]},
                {"category": "严重问题", "items": [
                    {"severity": "严重", "description": "no emergency plan"}
                ]}
            ],
            "suggestions_list": [{"content": "clarify staffing"}],
            "conclusion": {
                "conclusion": "有条件通过",
                "description": "needs rework",
                "next_steps": ["fix issues", "resubmit"]
            }
        })
    }

    #[test]
    fn structured_report_decodes_with_counts() {
        let payload: ReportPayload = serde_json::from_value(sample_report()).unwrap();
        let ReportPayload::Structured(report) = payload else {
            panic!("expected structured report");
        };
        assert_eq!(report.items_in_category(SEVERE_CATEGORY), 1);
        assert_eq!(report.items_in_category(GENERAL_CATEGORY), 2);
        assert_eq!(report.suggestion_count(), 1);
        assert_eq!(report.issues_list[0].items[1].text(), "schedule gaps");
        assert_eq!(
            report.conclusion.unwrap().next_steps.unwrap(),
            vec!["fix issues".to_string(), "resubmit".to_string()]
        );
    }

    #[test]
    fn text_format_decodes_as_file_reference() {
        let payload: ReportPayload =
            serde_json::from_value(json!({"report_file": "/data/reports/report_9.txt"})).unwrap();
        assert_eq!(
            payload,
            ReportPayload::File {
                report_file: "/data/reports/report_9.txt".into()
            }
        );
    }

    #[test]
    fn report_format_parses_cli_values() {
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }
}
