use anyhow::{bail, Result};
use std::fmt::{self, Write as _};

use crate::cli::commands::AppContext;
use crate::models::{Chapter, PointDetail, PointItem, ReviewPoints, Severity};

pub struct PointsCommand {
    pub search: Option<String>,
    pub chapter: Option<String>,
}

impl PointsCommand {
    pub async fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let points = ctx.api.get_review_points().await?;

        if let Some(name) = &self.chapter {
            let Some(chapter) = points.chapter(name) else {
                bail!("no chapter named '{name}'");
            };
            print!("{}", render_chapter(name, chapter)?);
            return Ok(());
        }

        let names = points.search(self.search.as_deref().unwrap_or_default());
        if names.is_empty() {
            println!("🔍 No chapters match");
            return Ok(());
        }
        print!("{}", render_overview(&points, &names)?);
        Ok(())
    }
}

fn render_overview(points: &ReviewPoints, names: &[&str]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "📚 {} of {} chapters", names.len(), points.len())?;
    for name in names {
        let size = match points.chapter(name) {
            Some(Chapter::Flat(items)) => items.len(),
            Some(Chapter::Outline(outline)) => outline.required_chapters.len(),
            Some(Chapter::Grouped(sub_points)) => sub_points.len(),
            None => 0,
        };
        writeln!(out, "  • {name} ({size})")?;
    }
    Ok(out)
}

fn render_chapter(name: &str, chapter: &Chapter) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "📖 {name}")?;
    match chapter {
        Chapter::Flat(items) => {
            for (index, item) in items.iter().enumerate() {
                match item {
                    PointItem::Text(text) => {
                        writeln!(out, "  {}. {text}", index + 1)?;
                    }
                    PointItem::Detail(detail) => {
                        writeln!(out, "  {}.", index + 1)?;
                        render_detail(&mut out, detail)?;
                    }
                    PointItem::Other(value) => {
                        writeln!(out, "  {}. {value}", index + 1)?;
                    }
                }
            }
        }
        Chapter::Outline(outline) => {
            writeln!(out, "  Required chapters:")?;
            for required in &outline.required_chapters {
                writeln!(out, "    - {required}")?;
            }
            if let Some(criterion) = &outline.criterion {
                writeln!(out, "  Criterion: {criterion}")?;
            }
            if let Some(severity) = &outline.severity {
                writeln!(out, "  Severity: {} {severity}", Severity::from_label(severity).marker())?;
            }
        }
        Chapter::Grouped(sub_points) => {
            for (sub_name, detail) in sub_points {
                writeln!(out, "  ▸ {sub_name}")?;
                render_detail(&mut out, detail)?;
            }
        }
    }
    Ok(out)
}

fn render_detail(out: &mut String, detail: &PointDetail) -> fmt::Result {
    if !detail.required_content.is_empty() {
        writeln!(out, "      must contain: {}", detail.required_content.join(", "))?;
    }
    if let Some(focus) = &detail.focus {
        writeln!(out, "      focus: {focus}")?;
    }
    if let Some(severity) = &detail.severity {
        writeln!(out, "      severity: {} {severity}", Severity::from_label(severity).marker())?;
    }
    if let Some(reference) = &detail.reference {
        writeln!(out, "      reference: {reference}")?;
    }
    Ok(())
}
