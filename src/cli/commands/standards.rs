use anyhow::Result;
use std::path::Path;

use crate::api::UploadFile;
use crate::cache::format_timestamp;
use crate::cli::commands::{confirm, AppContext};
use crate::models::{AiModel, Rule, Severity};
use crate::workflows::CommitOutcome;

pub struct StandardsCommand;

impl StandardsCommand {
    pub async fn list(ctx: &mut AppContext) -> Result<()> {
        ctx.standards().refresh_standards(&mut ctx.session).await?;
        let standards = ctx.session.standards();
        if standards.is_empty() {
            println!("📚 No standards uploaded yet");
            println!("   💡 Upload one with: review-desk standards upload <file>");
            return Ok(());
        }

        println!("{:>4}  {:<32} {:<12} {:>5}  {}", "ID", "NAME", "CATEGORY", "RULES", "UPLOADED");
        for standard in standards {
            println!(
                "{:>4}  {:<32} {:<12} {:>5}  {}",
                standard.id,
                standard.name,
                standard.category.as_deref().unwrap_or("-"),
                standard.rules_count,
                format_timestamp(standard.create_time.as_deref())
            );
        }
        Ok(())
    }

    pub async fn upload(
        ctx: &mut AppContext,
        file: &Path,
        name: Option<&str>,
        category: Option<&str>,
    ) -> Result<()> {
        let file = UploadFile::from_path(file).await?;
        let uploaded = ctx
            .standards()
            .upload_standard(&mut ctx.session, Some(file), name, category)
            .await?;
        println!("✅ Uploaded standard #{} {}", uploaded.standard_id, uploaded.name);
        println!(
            "   💡 Generate rules with: review-desk standards generate {}",
            uploaded.standard_id
        );
        Ok(())
    }

    pub async fn show(ctx: &mut AppContext, standard_id: i64) -> Result<()> {
        let view = ctx.standards().view_standard(&mut ctx.session, standard_id).await?;
        let standard = &view.standard;
        println!("📚 #{} {}", standard.id, standard.name);
        println!("   Category: {}", standard.category.as_deref().unwrap_or("-"));
        if let Some(file_name) = &standard.file_name {
            println!("   File:     {file_name}");
        }
        println!();

        if view.rules.is_empty() {
            println!("📋 No rules yet");
            return Ok(());
        }
        for rule in &view.rules {
            println!("{}", rule_line(rule));
        }
        Ok(())
    }

    pub async fn generate(
        ctx: &mut AppContext,
        standard_id: i64,
        model: Option<&str>,
        api_key: Option<&str>,
        yes: bool,
    ) -> Result<()> {
        let model_name = match model {
            Some(model) => Some(model.to_string()),
            None => {
                let models = ctx.api.list_ai_models().await?;
                preferred_model(ctx.config.review.preferred_model.as_deref(), &models)
            }
        };

        let mut manager = ctx.standards();
        let proposal = manager.propose_generation(standard_id, model_name.as_deref(), api_key)?;
        if !confirm(&proposal.description, yes)? {
            manager.cancel(&proposal);
            println!("❌ Cancelled");
            return Ok(());
        }

        println!("🤖 Generating rules, this can take a while...");
        if let CommitOutcome::Generated(generated) = manager.commit(&mut ctx.session, &proposal).await? {
            println!(
                "✅ Generated {} rules for standard #{}",
                generated.rules_count, generated.standard_id
            );
            for rule in &generated.rules {
                let severity = rule.severity.as_deref().unwrap_or_default();
                println!(
                    "   {} #{} {}",
                    Severity::from_label(severity).marker(),
                    rule.id,
                    rule.rule_name
                );
            }
        }
        Ok(())
    }
}

pub struct ModelsCommand;

impl ModelsCommand {
    pub async fn execute(ctx: &mut AppContext) -> Result<()> {
        let models = ctx.api.list_ai_models().await?;
        if models.is_empty() {
            println!("🤖 The service offers no AI models");
            return Ok(());
        }
        let preferred = ctx.config.review.preferred_model.as_deref();
        for model in &models {
            let marker = if Some(model.id.as_str()) == preferred { "*" } else { " " };
            println!("{marker} {:<24} {:<28} {}", model.id, model.name, model.provider);
        }
        Ok(())
    }
}

/// The configured model, if the service offers it.
fn preferred_model(preferred: Option<&str>, models: &[AiModel]) -> Option<String> {
    let preferred = preferred?;
    models
        .iter()
        .find(|model| model.id == preferred)
        .map(|model| model.id.clone())
}

fn rule_line(rule: &Rule) -> String {
    let severity = rule.severity.as_deref().unwrap_or_default();
    let state = if rule.is_active { "active" } else { "inactive" };
    format!(
        "{} #{:<4} {:<28} {:<10} {:<8} {}",
        Severity::from_label(severity).marker(),
        rule.id,
        rule.rule_name,
        rule.rule_type.as_deref().unwrap_or("-"),
        state,
        rule.provenance()
    )
}
