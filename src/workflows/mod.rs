// Workflow orchestration: review pipeline, projects, standards and rules

pub mod pipeline;
pub mod projects;
pub mod session;
pub mod standards;
pub mod summary;

pub use pipeline::{CompletedReview, PipelineInput, PipelineStage, ReviewPipeline};
pub use projects::{ProjectChoice, ProjectChoices, ProjectWorkflow};
pub use session::Session;
pub use standards::{
    parse_required_content, CommitOutcome, FoundRule, Proposal, ProposalKind, RuleDraft,
    StandardView, StandardsManager,
};
pub use summary::{ReviewDigest, ScoreBand};
