use serde::Serialize;
use std::fmt;

use crate::models::{ReviewOutcome, GENERAL_CATEGORY, SEVERE_CATEGORY};

const FAVORABLE_FROM: f64 = 80.0;
const CAUTIONARY_FROM: f64 = 60.0;

/// Display band of a review score. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Favorable,
    Cautionary,
    Unfavorable,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= FAVORABLE_FROM {
            ScoreBand::Favorable
        } else if score >= CAUTIONARY_FROM {
            ScoreBand::Cautionary
        } else {
            ScoreBand::Unfavorable
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScoreBand::Favorable => "favorable",
            ScoreBand::Cautionary => "cautionary",
            ScoreBand::Unfavorable => "unfavorable",
        })
    }
}

/// Figures shown once a review finishes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewDigest {
    pub review_id: i64,
    pub score: f64,
    pub band: ScoreBand,
    pub severe_count: usize,
    pub general_count: usize,
    pub suggestion_count: usize,
    pub summary: String,
}

impl ReviewDigest {
    pub fn from_outcome(outcome: &ReviewOutcome) -> Self {
        let report = &outcome.report;
        let summary = report
            .conclusion
            .as_ref()
            .map(|c| c.description.clone())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "review complete".to_string());

        Self {
            review_id: outcome.review_id,
            score: outcome.score,
            band: ScoreBand::from_score(outcome.score),
            severe_count: report.items_in_category(SEVERE_CATEGORY),
            general_count: report.items_in_category(GENERAL_CATEGORY),
            suggestion_count: report.suggestion_count(),
            summary,
        }
    }
}
