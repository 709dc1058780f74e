// Wire types exchanged with the review service

pub mod envelope;
pub mod projects;
pub mod reports;
pub mod review_points;
pub mod severity;
pub mod standards;

pub use envelope::{Envelope, SUCCESS_CODE};
pub use projects::{
    CreatedProject, ParsedDocument, Project, ReviewRecord, UploadedDocument,
    DEFAULT_PROJECT_TYPE,
};
pub use reports::{
    Conclusion, IssueCategory, IssueItem, Report, ReportFormat, ReportInfo, ReportPayload,
    ReviewOutcome, ReviewSummary, GENERAL_CATEGORY, SEVERE_CATEGORY,
};
pub use review_points::{Chapter, ChapterOutline, PointDetail, PointItem, ReviewPoints};
pub use severity::Severity;
pub use standards::{
    AiModel, GeneratedRule, GeneratedRules, Rule, RulePayload, SavedRule, Standard,
    UploadedStandard, DEFAULT_RULE_SEVERITY, DEFAULT_RULE_TYPE, DEFAULT_STANDARD_CATEGORY,
};
