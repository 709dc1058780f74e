use anyhow::{bail, Result};

use crate::cli::commands::{confirm, AppContext};
use crate::cli::RuleFields;
use crate::workflows::{parse_required_content, CommitOutcome, RuleDraft};

pub struct RulesCommand;

impl RulesCommand {
    pub async fn find(ctx: &mut AppContext, rule_id: i64) -> Result<()> {
        let Some(found) = ctx.standards().find_rule(rule_id).await? else {
            println!("🔍 No rule #{rule_id} in any standard");
            return Ok(());
        };
        let rule = &found.rule;
        println!("📏 #{} {}", rule.id, rule.rule_name);
        println!("   Standard: #{}", found.standard_id());
        println!("   Type:     {}", rule.rule_type.as_deref().unwrap_or("-"));
        println!("   Severity: {}", rule.severity.as_deref().unwrap_or("-"));
        println!("   Active:   {}", if rule.is_active { "yes" } else { "no" });
        println!("   Source:   {}", rule.provenance());
        if let Some(focus) = rule.review_focus.as_deref().filter(|f| !f.is_empty()) {
            println!("   Focus:    {focus}");
        }
        if let Some(pattern) = rule.rule_pattern.as_deref().filter(|p| !p.is_empty()) {
            println!("   Pattern:  {pattern}");
        }
        for item in rule.required_content.iter().flatten() {
            println!("   • {item}");
        }
        Ok(())
    }

    pub async fn create(ctx: &mut AppContext, fields: &RuleFields) -> Result<()> {
        let mut draft = RuleDraft::default();
        apply_fields(&mut draft, fields);

        ctx.session.select_standard(draft.standard_id);
        let saved = ctx.standards().save_rule(&mut ctx.session, draft, None).await?;
        println!("✅ Created rule #{} {}", saved.rule_id, saved.rule_name);
        Ok(())
    }

    pub async fn update(ctx: &mut AppContext, rule_id: i64, fields: &RuleFields) -> Result<()> {
        let manager = ctx.standards();
        let Some(found) = manager.find_rule(rule_id).await? else {
            bail!("no rule #{rule_id} in any standard");
        };

        let mut draft = RuleDraft::from_rule(&found.rule);
        draft.standard_id = Some(found.standard_id());
        apply_fields(&mut draft, fields);

        ctx.session.select_standard(draft.standard_id);
        let saved = manager.save_rule(&mut ctx.session, draft, Some(rule_id)).await?;
        println!("✅ Updated rule #{} {}", saved.rule_id, saved.rule_name);
        Ok(())
    }

    pub async fn delete(ctx: &mut AppContext, rule_id: i64, yes: bool) -> Result<()> {
        let mut manager = ctx.standards();
        let proposal = manager.propose_deletion(rule_id);
        if !confirm(&proposal.description, yes)? {
            manager.cancel(&proposal);
            println!("❌ Cancelled");
            return Ok(());
        }

        if let CommitOutcome::Deleted { rule_id } = manager.commit(&mut ctx.session, &proposal).await? {
            println!("🗑️  Deleted rule #{rule_id}");
        }
        Ok(())
    }
}

/// Overlays the flags the user passed onto a draft.
fn apply_fields(draft: &mut RuleDraft, fields: &RuleFields) {
    if let Some(standard_id) = fields.standard {
        draft.standard_id = Some(standard_id);
    }
    if let Some(name) = &fields.name {
        draft.rule_name = name.clone();
    }
    if let Some(rule_type) = &fields.rule_type {
        draft.rule_type = rule_type.clone();
    }
    if let Some(severity) = &fields.severity {
        draft.severity = severity.clone();
    }
    if !fields.required.is_empty() {
        draft.required_content = parse_required_content(&fields.required.join("\n")).join("\n");
    }
    if let Some(pattern) = &fields.pattern {
        draft.rule_pattern = pattern.clone();
    }
    if let Some(focus) = &fields.focus {
        draft.review_focus = focus.clone();
    }
    if fields.inactive {
        draft.is_active = false;
    } else if fields.active {
        draft.is_active = true;
    }
}
