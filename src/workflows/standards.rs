//! Standards and review rules management.
//!
//! Rule generation and rule deletion are confirmation-gated: a `propose_*`
//! call validates the request and returns a [`Proposal`], and only
//! [`StandardsManager::commit`] with that proposal talks to the service.
//! Each proposal can be committed once.

use regex::Regex;
use indexmap::IndexMap;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::{ReviewApi, UploadFile};
use crate::errors::{ValidationError, WorkflowError};
use crate::models::{
    GeneratedRules, Rule, RulePayload, SavedRule, Standard, UploadedStandard,
    DEFAULT_RULE_SEVERITY, DEFAULT_RULE_TYPE, DEFAULT_STANDARD_CATEGORY,
};
use crate::telemetry::generate_correlation_id;
use crate::workflows::session::Session;

/// Splits free text into required-content entries: one per line, trimmed,
/// blank lines dropped.
pub fn parse_required_content(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rule as edited by a user, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDraft {
    pub standard_id: Option<i64>,
    pub rule_name: String,
    pub rule_type: String,
    /// One required item per line.
    pub required_content: String,
    pub rule_pattern: String,
    pub review_focus: String,
    pub severity: String,
    pub is_active: bool,
}

impl Default for RuleDraft {
    fn default() -> Self {
        Self {
            standard_id: None,
            rule_name: String::new(),
            rule_type: DEFAULT_RULE_TYPE.to_string(),
            required_content: String::new(),
            rule_pattern: String::new(),
            review_focus: String::new(),
            severity: DEFAULT_RULE_SEVERITY.to_string(),
            is_active: true,
        }
    }
}

impl RuleDraft {
    /// Draft pre-filled from an existing rule, for editing.
    pub fn from_rule(rule: &Rule) -> Self {
        Self {
            standard_id: rule.standard_id,
            rule_name: rule.rule_name.clone(),
            rule_type: rule
                .rule_type
                .clone()
                .unwrap_or_else(|| DEFAULT_RULE_TYPE.to_string()),
            required_content: rule.required_content_text(),
            rule_pattern: rule.rule_pattern.clone().unwrap_or_default(),
            review_focus: rule.review_focus.clone().unwrap_or_default(),
            severity: rule
                .severity
                .clone()
                .unwrap_or_else(|| DEFAULT_RULE_SEVERITY.to_string()),
            is_active: rule.is_active,
        }
    }

    /// Validates the draft and builds the request body.
    pub fn into_payload(self) -> Result<RulePayload, ValidationError> {
        let rule_name = self.rule_name.trim().to_string();
        if rule_name.is_empty() {
            return Err(ValidationError::EmptyRuleName);
        }
        let rule_pattern = self.rule_pattern.trim().to_string();
        if !rule_pattern.is_empty() {
            Regex::new(&rule_pattern).map_err(|e| ValidationError::InvalidPattern {
                message: e.to_string(),
            })?;
        }
        let required_content = parse_required_content(&self.required_content);
        let review_focus = self.review_focus.trim().to_string();

        let rule_content = json!({
            "rule_name": rule_name,
            "rule_type": self.rule_type,
            "required_content": required_content,
            "review_focus": review_focus,
            "severity": self.severity,
        })
        .to_string();

        Ok(RulePayload {
            standard_id: self.standard_id,
            rule_name,
            rule_type: self.rule_type,
            rule_content,
            rule_pattern,
            required_content,
            review_focus,
            severity: self.severity,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalKind {
    GenerateRules {
        standard_id: i64,
        model_name: String,
        api_key: Option<String>,
    },
    DeleteRule {
        rule_id: i64,
    },
}

/// A pending confirmation-gated action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    token: String,
    pub kind: ProposalKind,
    /// Question to put to the user.
    pub description: String,
}

impl Proposal {
    pub fn token(&self) -> &str {
        &self.token
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Generated(GeneratedRules),
    Deleted { rule_id: i64 },
}

/// A rule located by [`StandardsManager::find_rule`].
#[derive(Debug, Clone, PartialEq)]
pub struct FoundRule {
    pub rule: Rule,
    /// Standard whose rule list contained the rule.
    pub listed_under: i64,
}

impl FoundRule {
    /// Owning standard: the rule's own reference, else where it was listed.
    pub fn standard_id(&self) -> i64 {
        self.rule.standard_id.unwrap_or(self.listed_under)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardView {
    pub standard: Standard,
    pub rules: Vec<Rule>,
}

/// Unresolved proposals kept before the oldest is dropped.
const MAX_PENDING_PROPOSALS: usize = 32;

/// Standards and rules workflows.
///
/// Every proposal should be resolved with [`StandardsManager::commit`] or
/// [`StandardsManager::cancel`]. At most [`MAX_PENDING_PROPOSALS`] stay open;
/// past that the oldest is forgotten and can no longer be committed.
pub struct StandardsManager {
    api: Arc<dyn ReviewApi>,
    default_category: String,
    pending: IndexMap<String, ProposalKind>,
}

impl StandardsManager {
    pub fn new(api: Arc<dyn ReviewApi>) -> Self {
        Self {
            api,
            default_category: DEFAULT_STANDARD_CATEGORY.to_string(),
            pending: IndexMap::new(),
        }
    }

    pub fn with_default_category(mut self, category: impl Into<String>) -> Self {
        self.default_category = category.into();
        self
    }

    /// Uploads a standard document. A blank name becomes the file name and a
    /// blank category the default category.
    pub async fn upload_standard(
        &self,
        session: &mut Session,
        file: Option<UploadFile>,
        name: Option<&str>,
        category: Option<&str>,
    ) -> Result<UploadedStandard, WorkflowError> {
        let file = file.ok_or(ValidationError::NoFileChosen)?;
        let name = non_blank(name).unwrap_or_else(|| file.file_name.clone());
        let category = non_blank(category).unwrap_or_else(|| self.default_category.clone());

        let uploaded = self
            .api
            .upload_standard(&file, Some(name), Some(category))
            .await?;
        info!(standard_id = uploaded.standard_id, name = %uploaded.name, "standard uploaded");

        self.refresh_standards(session).await?;
        Ok(uploaded)
    }

    pub async fn refresh_standards(&self, session: &mut Session) -> Result<(), WorkflowError> {
        let standards = self.api.list_standards().await?;
        debug!(count = standards.len(), "standards refreshed");
        session.replace_standards(standards);
        Ok(())
    }

    /// Makes `standard_id` the current standard and loads its rules.
    pub async fn view_standard(&self, session: &mut Session, standard_id: i64) -> Result<StandardView, WorkflowError> {
        session.select_standard(Some(standard_id));
        let rules = self.api.list_standard_rules(standard_id).await?;
        let standards = self.api.list_standards().await?;

        let standard = standards.iter().find(|s| s.id == standard_id).cloned();
        session.replace_standards(standards);
        session.replace_rules(rules.clone());

        let standard = standard.ok_or(WorkflowError::StandardNotFound { standard_id })?;
        Ok(StandardView { standard, rules })
    }

    /// First phase of rule generation. Makes no request.
    pub fn propose_generation(
        &mut self,
        standard_id: i64,
        model_name: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<Proposal, WorkflowError> {
        let model_name = non_blank(model_name).ok_or(ValidationError::NoModelSelected)?;
        let description = format!(
            "Generate review rules for standard {standard_id} with {model_name}? \
             The standard's content will be split into review rules automatically."
        );
        Ok(self.propose(
            ProposalKind::GenerateRules {
                standard_id,
                model_name,
                api_key: non_blank(api_key),
            },
            description,
        ))
    }

    /// First phase of rule deletion. Makes no request.
    pub fn propose_deletion(&mut self, rule_id: i64) -> Proposal {
        self.propose(
            ProposalKind::DeleteRule { rule_id },
            format!("Delete rule {rule_id}?"),
        )
    }

    /// Withdraws a proposal the user declined.
    pub fn cancel(&mut self, proposal: &Proposal) {
        self.pending.shift_remove(&proposal.token);
    }

    /// Carries out a confirmed proposal, then refreshes the affected lists.
    pub async fn commit(&mut self, session: &mut Session, proposal: &Proposal) -> Result<CommitOutcome, WorkflowError> {
        let kind = self
            .pending
            .shift_remove(&proposal.token)
            .ok_or_else(|| WorkflowError::UnknownProposal {
                token: proposal.token.clone(),
            })?;

        match kind {
            ProposalKind::GenerateRules {
                standard_id,
                model_name,
                api_key,
            } => {
                let generated = self.api.generate_rules(standard_id, &model_name, api_key).await?;
                info!(
                    standard_id,
                    model = %model_name,
                    rules_count = generated.rules_count,
                    "rules generated"
                );
                if session.current_standard_id() == Some(standard_id) {
                    self.view_standard(session, standard_id).await?;
                } else {
                    self.refresh_standards(session).await?;
                }
                Ok(CommitOutcome::Generated(generated))
            }
            ProposalKind::DeleteRule { rule_id } => {
                self.api.delete_rule(rule_id).await?;
                info!(rule_id, "rule deleted");
                self.refresh_after_mutation(session).await?;
                Ok(CommitOutcome::Deleted { rule_id })
            }
        }
    }

    /// Finds a rule by id.
    ///
    /// The service cannot look rules up directly, so every standard's rule
    /// list is fetched in order until one contains the id.
    pub async fn find_rule(&self, rule_id: i64) -> Result<Option<FoundRule>, WorkflowError> {
        let standards = self.api.list_standards().await?;
        for standard in &standards {
            let rules = self.api.list_standard_rules(standard.id).await?;
            if let Some(rule) = rules.into_iter().find(|r| r.id == rule_id) {
                debug!(rule_id, standard_id = standard.id, "rule located");
                return Ok(Some(FoundRule {
                    rule,
                    listed_under: standard.id,
                }));
            }
        }
        debug!(rule_id, searched = standards.len(), "rule not found");
        Ok(None)
    }

    /// Creates a rule, or overwrites `existing` with the full draft.
    pub async fn save_rule(
        &self,
        session: &mut Session,
        draft: RuleDraft,
        existing: Option<i64>,
    ) -> Result<SavedRule, WorkflowError> {
        let payload = draft.into_payload()?;
        let saved = match existing {
            Some(rule_id) => self.api.update_rule(rule_id, &payload).await?,
            None => self.api.create_rule(&payload).await?,
        };
        info!(
            rule_id = saved.rule_id,
            updated = existing.is_some(),
            "rule saved"
        );
        self.refresh_after_mutation(session).await?;
        Ok(saved)
    }

    async fn refresh_after_mutation(&self, session: &mut Session) -> Result<(), WorkflowError> {
        match session.current_standard_id() {
            Some(standard_id) => self.view_standard(session, standard_id).await.map(|_| ()),
            None => self.refresh_standards(session).await,
        }
    }

    fn propose(&mut self, kind: ProposalKind, description: String) -> Proposal {
        while self.pending.len() >= MAX_PENDING_PROPOSALS {
            if let Some((token, _)) = self.pending.shift_remove_index(0) {
                debug!(token = %token, "oldest unresolved proposal dropped");
            }
        }
        let token = generate_correlation_id();
        self.pending.insert(token.clone(), kind.clone());
        Proposal {
            token,
            kind,
            description,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockReviewApi;
    use crate::errors::ApiError;
    use mockall::predicate::eq;
    use mockall::Sequence;
    use serde_json::Value;

    fn standard(id: i64, name: &str) -> Standard {
        serde_json::from_value(json!({"id": id, "name": name, "category": "通用规范"})).unwrap()
    }

    fn rule(id: i64, standard_id: Option<i64>) -> Rule {
        serde_json::from_value(json!({
            "id": id,
            "standard_id": standard_id,
            "rule_name": format!("rule {id}"),
            "rule_type": "内容检查",
            "required_content": ["a", "b"],
            "severity": "严重"
        }))
        .unwrap()
    }

    fn saved(rule_id: i64) -> SavedRule {
        SavedRule {
            rule_id,
            rule_name: "Fire lanes".into(),
        }
    }

    fn generated(standard_id: i64) -> GeneratedRules {
        GeneratedRules {
            standard_id,
            rules_count: 2,
            rules: Vec::new(),
        }
    }

    #[test]
    fn required_content_drops_blank_lines() {
        assert_eq!(parse_required_content("a\n\nb\n "), vec!["a", "b"]);
        assert_eq!(parse_required_content("  a  \r\n\tb"), vec!["a", "b"]);
        assert!(parse_required_content("\n \n").is_empty());
    }

    #[test]
    fn payload_embeds_rule_content_as_json() {
        let draft = RuleDraft {
            standard_id: Some(4),
            rule_name: "  消防通道 ".into(),
            required_content: "宽度\n\n净高\n".into(),
            review_focus: "通道宽度 ".into(),
            ..RuleDraft::default()
        };

        let payload = draft.into_payload().unwrap();

        assert_eq!(payload.rule_name, "消防通道");
        assert_eq!(payload.required_content, vec!["宽度", "净高"]);
        let content: Value = serde_json::from_str(&payload.rule_content).unwrap();
        assert_eq!(
            content,
            json!({
                "rule_name": "消防通道",
                "rule_type": "内容检查",
                "required_content": ["宽度", "净高"],
                "review_focus": "通道宽度",
                "severity": "一般"
            })
        );
        assert!(payload.rule_content.contains("消防通道"));
    }

    #[test]
    fn payload_validation() {
        let blank = RuleDraft {
            rule_name: "   ".into(),
            ..RuleDraft::default()
        };
        assert_eq!(blank.into_payload(), Err(ValidationError::EmptyRuleName));

        let bad_pattern = RuleDraft {
            rule_name: "Dates".into(),
            rule_pattern: "([0-9]".into(),
            ..RuleDraft::default()
        };
        assert!(matches!(
            bad_pattern.into_payload(),
            Err(ValidationError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn draft_from_rule_joins_required_content() {
        let draft = RuleDraft::from_rule(&rule(3, Some(1)));
        assert_eq!(draft.required_content, "a\nb");
        assert_eq!(draft.severity, "严重");
        assert_eq!(draft.standard_id, Some(1));
    }

    #[tokio::test]
    async fn generation_without_model_makes_no_request() {
        let mut api = MockReviewApi::new();
        api.expect_generate_rules().times(0);
        api.expect_list_standards().times(0);

        let mut manager = StandardsManager::new(Arc::new(api));

        let err = manager.propose_generation(4, None, Some("sk-1")).unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(ValidationError::NoModelSelected)));
        let err = manager.propose_generation(4, Some("  "), None).unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(ValidationError::NoModelSelected)));
    }

    #[tokio::test]
    async fn committed_generation_refreshes_current_standard() {
        let mut api = MockReviewApi::new();
        api.expect_generate_rules()
            .withf(|id, model, key| *id == 4 && model == "deepseek-chat" && key.is_none())
            .times(1)
            .returning(|id, _, _| Ok(generated(id)));
        api.expect_list_standard_rules()
            .with(eq(4))
            .times(1)
            .returning(|_| Ok(vec![rule(1, Some(4)), rule(2, Some(4))]));
        api.expect_list_standards()
            .times(1)
            .returning(|| Ok(vec![standard(4, "GB 50720")]));

        let mut manager = StandardsManager::new(Arc::new(api));
        let mut session = Session::new();
        session.select_standard(Some(4));

        let proposal = manager
            .propose_generation(4, Some("deepseek-chat"), Some(""))
            .unwrap();
        let outcome = manager.commit(&mut session, &proposal).await.unwrap();

        assert_eq!(outcome, CommitOutcome::Generated(generated(4)));
        assert_eq!(session.rules().len(), 2);
    }

    #[tokio::test]
    async fn generation_for_other_standard_refreshes_overview() {
        let mut api = MockReviewApi::new();
        api.expect_generate_rules()
            .withf(|_, _, key| key.as_deref() == Some("sk-1"))
            .returning(|id, _, _| Ok(generated(id)));
        api.expect_list_standard_rules().times(0);
        api.expect_list_standards()
            .times(1)
            .returning(|| Ok(vec![standard(4, "GB 50720"), standard(5, "JGJ 59")]));

        let mut manager = StandardsManager::new(Arc::new(api));
        let mut session = Session::new();

        let proposal = manager.propose_generation(5, Some("gpt-4o"), Some(" sk-1 ")).unwrap();
        manager.commit(&mut session, &proposal).await.unwrap();

        assert_eq!(session.standards().len(), 2);
    }

    #[tokio::test]
    async fn proposals_are_single_use() {
        let mut api = MockReviewApi::new();
        api.expect_delete_rule().with(eq(9)).times(1).returning(|_| Ok(()));
        api.expect_list_standards().times(1).returning(|| Ok(Vec::new()));

        let mut manager = StandardsManager::new(Arc::new(api));
        let mut session = Session::new();
        let proposal = manager.propose_deletion(9);

        manager.commit(&mut session, &proposal).await.unwrap();
        let err = manager.commit(&mut session, &proposal).await.unwrap_err();

        assert!(matches!(err, WorkflowError::UnknownProposal { .. }));
    }

    #[tokio::test]
    async fn cancelled_proposal_cannot_be_committed() {
        let mut api = MockReviewApi::new();
        api.expect_delete_rule().times(0);

        let mut manager = StandardsManager::new(Arc::new(api));
        let proposal = manager.propose_deletion(9);
        manager.cancel(&proposal);

        let err = manager.commit(&mut Session::new(), &proposal).await.unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownProposal { .. }));
    }

    #[tokio::test]
    async fn oldest_unresolved_proposal_is_dropped() {
        let mut api = MockReviewApi::new();
        api.expect_delete_rule()
            .with(eq(MAX_PENDING_PROPOSALS as i64))
            .times(1)
            .returning(|_| Ok(()));
        api.expect_list_standards().times(1).returning(|| Ok(Vec::new()));

        let mut manager = StandardsManager::new(Arc::new(api));
        let mut session = Session::new();
        let proposals: Vec<Proposal> = (0..=MAX_PENDING_PROPOSALS as i64)
            .map(|rule_id| manager.propose_deletion(rule_id))
            .collect();

        let err = manager.commit(&mut session, &proposals[0]).await.unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownProposal { .. }));

        let last = proposals.last().unwrap();
        let outcome = manager.commit(&mut session, last).await.unwrap();
        assert_eq!(
            outcome,
            CommitOutcome::Deleted {
                rule_id: MAX_PENDING_PROPOSALS as i64
            }
        );
    }

    #[tokio::test]
    async fn manual_rule_without_standard_refreshes_overview() {
        let mut api = MockReviewApi::new();
        let mut seq = Sequence::new();
        api.expect_create_rule()
            .withf(|payload| payload.standard_id.is_none() && payload.rule_name == "文明施工")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(saved(51)));
        api.expect_list_standards()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![standard(1, "JGJ 46")]));
        api.expect_list_standard_rules().times(0);

        let manager = StandardsManager::new(Arc::new(api));
        let mut session = Session::new();
        let draft = RuleDraft {
            standard_id: None,
            rule_name: "文明施工".into(),
            ..RuleDraft::default()
        };

        let saved = manager.save_rule(&mut session, draft, None).await.unwrap();

        assert_eq!(saved.rule_id, 51);
        assert_eq!(session.standards().len(), 1);
    }

    #[tokio::test]
    async fn find_rule_scans_standards_in_order() {
        let mut api = MockReviewApi::new();
        let mut seq = Sequence::new();
        api.expect_list_standards()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![standard(1, "A"), standard(2, "B"), standard(3, "C")]));
        api.expect_list_standard_rules()
            .with(eq(1))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![rule(10, Some(1))]));
        api.expect_list_standard_rules()
            .with(eq(2))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![rule(11, None), rule(12, Some(2))]));

        let manager = StandardsManager::new(Arc::new(api));

        let found = manager.find_rule(11).await.unwrap().unwrap();

        assert_eq!(found.rule.id, 11);
        assert_eq!(found.listed_under, 2);
        assert_eq!(found.standard_id(), 2);
    }

    #[tokio::test]
    async fn find_rule_reports_absence() {
        let mut api = MockReviewApi::new();
        api.expect_list_standards()
            .returning(|| Ok(vec![standard(1, "A"), standard(2, "B")]));
        api.expect_list_standard_rules()
            .times(2)
            .returning(|id| Ok(vec![rule(id * 10, Some(id))]));

        let manager = StandardsManager::new(Arc::new(api));

        assert_eq!(manager.find_rule(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_rule_updates_and_refetches_current_standard() {
        let mut api = MockReviewApi::new();
        api.expect_update_rule()
            .withf(|id, payload| *id == 7 && payload.rule_name == "Fire lanes" && payload.required_content == vec!["width"])
            .times(1)
            .returning(|id, _| Ok(saved(id)));
        api.expect_create_rule().times(0);
        api.expect_list_standard_rules()
            .with(eq(4))
            .times(1)
            .returning(|_| Ok(vec![rule(7, Some(4))]));
        api.expect_list_standards()
            .times(1)
            .returning(|| Ok(vec![standard(4, "GB 50720")]));

        let manager = StandardsManager::new(Arc::new(api));
        let mut session = Session::new();
        session.select_standard(Some(4));
        let draft = RuleDraft {
            standard_id: Some(4),
            rule_name: "Fire lanes".into(),
            required_content: "width\n".into(),
            ..RuleDraft::default()
        };

        let saved_rule = manager.save_rule(&mut session, draft, Some(7)).await.unwrap();

        assert_eq!(saved_rule.rule_id, 7);
        assert_eq!(session.rules().len(), 1);
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_before_any_request() {
        let mut api = MockReviewApi::new();
        api.expect_create_rule().times(0);
        api.expect_list_standards().times(0);

        let manager = StandardsManager::new(Arc::new(api));
        let err = manager
            .save_rule(&mut Session::new(), RuleDraft::default(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Validation(ValidationError::EmptyRuleName)));
    }

    #[tokio::test]
    async fn upload_defaults_name_and_category() {
        let mut api = MockReviewApi::new();
        api.expect_upload_standard()
            .withf(|file, name, category| {
                file.file_name == "GB50720.pdf"
                    && name.as_deref() == Some("GB50720.pdf")
                    && category.as_deref() == Some("通用规范")
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(UploadedStandard {
                    standard_id: 4,
                    name: "GB50720.pdf".into(),
                    category: Some("通用规范".into()),
                    file_name: Some("GB50720.pdf".into()),
                })
            });
        api.expect_list_standards()
            .times(1)
            .returning(|| Ok(vec![standard(4, "GB50720.pdf")]));

        let manager = StandardsManager::new(Arc::new(api));
        let mut session = Session::new();

        let uploaded = manager
            .upload_standard(
                &mut session,
                Some(UploadFile::new("GB50720.pdf", b"%PDF".to_vec())),
                Some(" "),
                None,
            )
            .await
            .unwrap();

        assert_eq!(uploaded.standard_id, 4);
        assert_eq!(session.standards().len(), 1);
    }

    #[tokio::test]
    async fn upload_requires_a_file() {
        let mut api = MockReviewApi::new();
        api.expect_upload_standard().times(0);

        let manager = StandardsManager::new(Arc::new(api));
        let err = manager
            .upload_standard(&mut Session::new(), None, Some("GB"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Validation(ValidationError::NoFileChosen)));
    }

    #[tokio::test]
    async fn view_standard_reports_missing_standard() {
        let mut api = MockReviewApi::new();
        api.expect_list_standard_rules().returning(|_| Ok(Vec::new()));
        api.expect_list_standards()
            .returning(|| Ok(vec![standard(1, "A")]));

        let manager = StandardsManager::new(Arc::new(api));
        let mut session = Session::new();

        let err = manager.view_standard(&mut session, 8).await.unwrap_err();

        assert!(matches!(err, WorkflowError::StandardNotFound { standard_id: 8 }));
        assert_eq!(session.current_standard_id(), Some(8));
    }

    #[tokio::test]
    async fn service_failure_aborts_commit() {
        let mut api = MockReviewApi::new();
        api.expect_delete_rule().returning(|_| {
            Err(ApiError::Application {
                code: 404,
                message: "规则不存在".into(),
            })
        });
        api.expect_list_standards().times(0);

        let mut manager = StandardsManager::new(Arc::new(api));
        let proposal = manager.propose_deletion(3);

        let err = manager.commit(&mut Session::new(), &proposal).await.unwrap_err();

        assert_eq!(err.to_string(), "规则不存在");
    }
}
