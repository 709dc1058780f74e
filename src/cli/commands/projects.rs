use anyhow::Result;

use crate::cache::format_timestamp;
use crate::cli::commands::AppContext;
use crate::models::ReviewRecord;

pub struct ProjectsCommand;

impl ProjectsCommand {
    pub async fn list(ctx: &mut AppContext) -> Result<()> {
        let workflow = ctx.projects();
        let choices = workflow.project_choices(&mut ctx.session).await;

        if choices.from_cache {
            println!("⚠️  Service unavailable, showing the cached project list");
        }
        if choices.choices.is_empty() {
            println!("📋 No projects yet");
            println!("   💡 Create one with: review-desk projects create \"<name>\"");
            return Ok(());
        }

        if choices.from_cache {
            for choice in &choices.choices {
                println!("  {:>4}  {}", choice.id, choice.label);
            }
        } else {
            println!("{:>4}  {:<30} {:<10} {:<10} {}", "ID", "NAME", "TYPE", "STATUS", "CREATED");
            for project in ctx.session.projects() {
                println!(
                    "{:>4}  {:<30} {:<10} {:<10} {}",
                    project.project_id,
                    project.name,
                    project.project_type_or_default(),
                    project.status.as_deref().unwrap_or("-"),
                    format_timestamp(project.create_time.as_deref())
                );
            }
        }
        Ok(())
    }

    pub async fn create(ctx: &mut AppContext, name: &str, project_type: Option<&str>) -> Result<()> {
        let workflow = ctx.projects();
        let created = workflow.create_project(&mut ctx.session, name, project_type).await?;
        println!("✅ Created project #{} {}", created.project_id, created.name);
        println!("   💡 Review a document with: review-desk review -p {} -f <file>", created.project_id);
        Ok(())
    }

    pub async fn reviews(ctx: &mut AppContext, project_id: i64) -> Result<()> {
        let reviews = ctx.projects().reviews(project_id).await?;
        if reviews.is_empty() {
            println!("📋 Project #{project_id} has no reviews yet");
            return Ok(());
        }
        println!("{:>6}  {:>6}  {:<10} {:>6}  {}", "REVIEW", "SCORE", "STATUS", "ISSUES", "TIME");
        for review in &reviews {
            println!("{}", review_row(review));
        }
        Ok(())
    }
}

fn review_row(review: &ReviewRecord) -> String {
    let score = review
        .score
        .map(|s| format!("{s:.0}"))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>6}  {:>6}  {:<10} {:>6}  {}",
        review.review_id,
        score,
        review.status.as_deref().unwrap_or("-"),
        review.issues_count,
        format_timestamp(review.review_time.as_deref())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_rows_tolerate_missing_fields() {
        let review: ReviewRecord = serde_json::from_value(serde_json::json!({
            "review_id": 8,
            "score": 72.4,
            "status": "completed",
            "review_time": "2025-03-01T10:04:05",
            "issues_count": 3
        }))
        .unwrap();
        let row = review_row(&review);
        assert!(row.contains("72"));
        assert!(row.ends_with("2025-03-01 10:04:05"));

        let bare: ReviewRecord = serde_json::from_value(serde_json::json!({"review_id": 9})).unwrap();
        assert!(review_row(&bare).contains('-'));
    }
}
