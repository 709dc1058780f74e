//! Upload, parse and review pipeline.
//!
//! Stages run strictly in sequence because each one needs the identifier
//! returned by the one before. The first fault ends the run in `Failed`;
//! nothing is retried.

use serde::Serialize;
use statig::prelude::*;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, Instrument};

use crate::api::{ReviewApi, UploadFile};
use crate::errors::{ApiError, PipelineError, ValidationError};
use crate::models::{ParsedDocument, ReviewOutcome};
use crate::telemetry::{create_workflow_span, generate_correlation_id, StageTimer};
use crate::workflows::session::Session;
use crate::workflows::summary::ReviewDigest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    #[default]
    Idle,
    Uploading,
    Parsing,
    Reviewing,
    Done,
    Failed,
}

impl PipelineStage {
    /// Progress hint shown while the stage runs.
    pub fn progress_percent(self) -> u8 {
        match self {
            PipelineStage::Idle | PipelineStage::Failed => 0,
            PipelineStage::Uploading => 20,
            PipelineStage::Parsing => 40,
            PipelineStage::Reviewing => 60,
            PipelineStage::Done => 100,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Failed)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Uploading => "upload",
            PipelineStage::Parsing => "parse",
            PipelineStage::Reviewing => "review",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PipelineEvent {
    Start,
    Uploaded { document_id: i64 },
    Parsed,
    Reviewed { review_id: i64 },
    Fault,
}

#[derive(Debug, Default)]
struct PipelineMachine {
    stage: PipelineStage,
    failed_in: Option<PipelineStage>,
    document_id: Option<i64>,
    review_id: Option<i64>,
}

impl PipelineMachine {
    fn fail(&mut self) -> Outcome<State> {
        self.failed_in = Some(self.stage);
        self.stage = PipelineStage::Failed;
        Transition(State::failed())
    }
}

#[state_machine(initial = "State::idle()")]
impl PipelineMachine {
    #[state]
    fn idle(&mut self, event: &PipelineEvent) -> Outcome<State> {
        match event {
            PipelineEvent::Start => {
                self.stage = PipelineStage::Uploading;
                Transition(State::uploading())
            }
            _ => Handled,
        }
    }

    #[state]
    fn uploading(&mut self, event: &PipelineEvent) -> Outcome<State> {
        match event {
            PipelineEvent::Uploaded { document_id } => {
                self.document_id = Some(*document_id);
                self.stage = PipelineStage::Parsing;
                Transition(State::parsing())
            }
            PipelineEvent::Fault => self.fail(),
            _ => Handled,
        }
    }

    #[state]
    fn parsing(&mut self, event: &PipelineEvent) -> Outcome<State> {
        match event {
            PipelineEvent::Parsed => {
                self.stage = PipelineStage::Reviewing;
                Transition(State::reviewing())
            }
            PipelineEvent::Fault => self.fail(),
            _ => Handled,
        }
    }

    #[state]
    fn reviewing(&mut self, event: &PipelineEvent) -> Outcome<State> {
        match event {
            PipelineEvent::Reviewed { review_id } => {
                self.review_id = Some(*review_id);
                self.stage = PipelineStage::Done;
                Transition(State::done())
            }
            PipelineEvent::Fault => self.fail(),
            _ => Handled,
        }
    }

    #[state]
    fn done(&mut self, event: &PipelineEvent) -> Outcome<State> {
        tracing::debug!(?event, "ignoring event after completion");
        Handled
    }

    #[state]
    fn failed(&mut self, event: &PipelineEvent) -> Outcome<State> {
        tracing::debug!(?event, "ignoring event after failure");
        Handled
    }
}

/// What the caller chose before starting a run.
#[derive(Debug, Clone, Default)]
pub struct PipelineInput {
    /// Falls back to the session's current project.
    pub project_id: Option<i64>,
    pub file: Option<UploadFile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletedReview {
    pub project_id: i64,
    pub document_id: i64,
    pub parsed: ParsedDocument,
    pub outcome: ReviewOutcome,
    pub digest: ReviewDigest,
}

pub struct ReviewPipeline {
    api: Arc<dyn ReviewApi>,
    use_ai: bool,
}

impl ReviewPipeline {
    pub fn new(api: Arc<dyn ReviewApi>) -> Self {
        Self { api, use_ai: true }
    }

    pub fn with_ai(mut self, use_ai: bool) -> Self {
        self.use_ai = use_ai;
        self
    }

    /// Runs upload, parse and review for one file.
    ///
    /// `on_stage` is called with every stage the run enters, ending with
    /// `Done` or `Failed`. Validation problems are reported before any
    /// request is made and before any stage is entered.
    pub async fn run<F>(
        &self,
        session: &mut Session,
        input: PipelineInput,
        mut on_stage: F,
    ) -> Result<CompletedReview, PipelineError>
    where
        F: FnMut(PipelineStage),
    {
        let project_id = input
            .project_id
            .or(session.current_project_id())
            .ok_or(ValidationError::NoProjectSelected)?;
        let file = input.file.ok_or(ValidationError::NoFileChosen)?;

        session.select_project(project_id);
        session.begin_review();

        let correlation_id = generate_correlation_id();
        let span = create_workflow_span("review_pipeline", Some(project_id), &correlation_id);
        let completed = self
            .drive(project_id, &file, &mut on_stage)
            .instrument(span)
            .await?;

        session.complete_review(completed.outcome.review_id);
        Ok(completed)
    }

    async fn drive<F>(&self, project_id: i64, file: &UploadFile, on_stage: &mut F) -> Result<CompletedReview, PipelineError>
    where
        F: FnMut(PipelineStage),
    {
        let mut machine = PipelineMachine::default().state_machine();
        machine.handle(&PipelineEvent::Start);
        on_stage(machine.inner().stage);
        info!(file = %file.file_name, bytes = file.bytes.len(), "review pipeline started");

        let timer = StageTimer::start("upload");
        let uploaded = match self.api.upload_document(project_id, file).await {
            Ok(uploaded) => uploaded,
            Err(e) => return Err(abort(&mut machine, on_stage, e)),
        };
        timer.finish();
        machine.handle(&PipelineEvent::Uploaded {
            document_id: uploaded.document_id,
        });
        on_stage(machine.inner().stage);

        let timer = StageTimer::start("parse");
        let parsed = match self.api.parse_document(uploaded.document_id).await {
            Ok(parsed) => parsed,
            Err(e) => return Err(abort(&mut machine, on_stage, e)),
        };
        timer.finish();
        machine.handle(&PipelineEvent::Parsed);
        on_stage(machine.inner().stage);

        let timer = StageTimer::start("review");
        let outcome = match self.api.review_document(uploaded.document_id, self.use_ai).await {
            Ok(outcome) => outcome,
            Err(e) => return Err(abort(&mut machine, on_stage, e)),
        };
        timer.finish();
        machine.handle(&PipelineEvent::Reviewed {
            review_id: outcome.review_id,
        });
        on_stage(machine.inner().stage);

        let digest = ReviewDigest::from_outcome(&outcome);
        info!(
            document_id = uploaded.document_id,
            review_id = outcome.review_id,
            score = outcome.score,
            band = %digest.band,
            "review pipeline finished"
        );

        Ok(CompletedReview {
            project_id,
            document_id: uploaded.document_id,
            parsed,
            outcome,
            digest,
        })
    }
}

fn abort<F>(machine: &mut StateMachine<PipelineMachine>, on_stage: &mut F, source: ApiError) -> PipelineError
where
    F: FnMut(PipelineStage),
{
    machine.handle(&PipelineEvent::Fault);
    let context = machine.inner();
    let stage = context.failed_in.unwrap_or(PipelineStage::Idle);
    error!(stage = %stage, document_id = ?context.document_id, error = %source, "review pipeline failed");
    on_stage(context.stage);
    PipelineError::StageFailed {
        stage,
        document_id: context.document_id,
        source,
    }
}
