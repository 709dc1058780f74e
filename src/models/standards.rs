use serde::{Deserialize, Serialize};

/// Category recorded for a standard uploaded without one.
pub const DEFAULT_STANDARD_CATEGORY: &str = "通用规范";
/// Rule type the service uses when none is specified.
pub const DEFAULT_RULE_TYPE: &str = "内容检查";
/// Severity the service uses when none is specified.
pub const DEFAULT_RULE_SEVERITY: &str = "一般";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiModel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub provider: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standard {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub rules_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedStandard {
    pub standard_id: i64,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: i64,
    #[serde(default)]
    pub standard_id: Option<i64>,
    pub rule_name: String,
    #[serde(default)]
    pub rule_type: Option<String>,
    #[serde(default)]
    pub rule_content: Option<String>,
    #[serde(default)]
    pub rule_pattern: Option<String>,
    #[serde(default)]
    pub required_content: Option<Vec<String>>,
    #[serde(default)]
    pub review_focus: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub priority: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_ai_generated: bool,
    #[serde(default)]
    pub ai_model: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Rule {
    /// Provenance label: the generating model for AI rules, "manual" otherwise.
    pub fn provenance(&self) -> String {
        if self.is_ai_generated {
            format!("AI ({})", self.ai_model.as_deref().unwrap_or("unknown"))
        } else {
            "manual".to_string()
        }
    }

    /// Required content as editable text, one entry per line.
    pub fn required_content_text(&self) -> String {
        self.required_content
            .as_deref()
            .map(|items| items.join("\n"))
            .unwrap_or_default()
    }
}

/// Body shared by rule creation and rule update; updates overwrite every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulePayload {
    pub standard_id: Option<i64>,
    pub rule_name: String,
    pub rule_type: String,
    pub rule_content: String,
    pub rule_pattern: String,
    pub required_content: Vec<String>,
    pub review_focus: String,
    pub severity: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRule {
    pub rule_id: i64,
    #[serde(default)]
    pub rule_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRules {
    pub standard_id: i64,
    pub rules_count: u64,
    #[serde(default)]
    pub rules: Vec<GeneratedRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRule {
    pub id: i64,
    pub rule_name: String,
    #[serde(default)]
    pub rule_type: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub is_ai_generated: bool,
}
