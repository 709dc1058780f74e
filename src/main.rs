use anyhow::Result;
use clap::Parser;

use review_desk::cli::commands::points::PointsCommand;
use review_desk::cli::commands::projects::ProjectsCommand;
use review_desk::cli::commands::review::{validation_hint, ReportCommand, ReviewCommand};
use review_desk::cli::commands::rules::RulesCommand;
use review_desk::cli::commands::standards::{ModelsCommand, StandardsCommand};
use review_desk::cli::commands::{failure_line, show_how_to_get_started, AppContext};
use review_desk::cli::{Cli, Commands, ProjectsAction, RulesAction, StandardsAction};
use review_desk::errors::{PipelineError, ValidationError, WorkflowError};
use review_desk::{config, init_telemetry};

fn main() {
    let cli = Cli::parse();

    if let Err(error) = run(cli) {
        eprintln!("{}", failure_line(&error));
        if let Some(hint) = hint_for(&error) {
            eprintln!("   💡 {hint}");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        return show_how_to_get_started();
    };

    let mut settings = config()?.clone();
    if let Some(base_url) = cli.base_url {
        settings.api.base_url = Some(base_url);
    }
    init_telemetry(&settings.observability)?;

    let mut ctx = AppContext::connect(settings);
    tokio::runtime::Runtime::new()?.block_on(async { dispatch(&mut ctx, command).await })
}

async fn dispatch(ctx: &mut AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Projects { action } => match action {
            ProjectsAction::List => ProjectsCommand::list(ctx).await,
            ProjectsAction::Create { name, project_type } => {
                ProjectsCommand::create(ctx, &name, project_type.as_deref()).await
            }
        },
        Commands::Review { project, file, no_ai } => {
            ReviewCommand { project, file, no_ai }.execute(ctx).await
        }
        Commands::Report { review_id, format } => ReportCommand { review_id, format }.execute(ctx).await,
        Commands::Reviews { project_id } => ProjectsCommand::reviews(ctx, project_id).await,
        Commands::Points { search, chapter } => PointsCommand { search, chapter }.execute(ctx).await,
        Commands::Models => ModelsCommand::execute(ctx).await,
        Commands::Standards { action } => match action {
            StandardsAction::List => StandardsCommand::list(ctx).await,
            StandardsAction::Upload { file, name, category } => {
                StandardsCommand::upload(ctx, &file, name.as_deref(), category.as_deref()).await
            }
            StandardsAction::Show { standard_id } => StandardsCommand::show(ctx, standard_id).await,
            StandardsAction::Generate {
                standard_id,
                model,
                api_key,
                yes,
            } => StandardsCommand::generate(ctx, standard_id, model.as_deref(), api_key.as_deref(), yes).await,
        },
        Commands::Rules { action } => match action {
            RulesAction::Find { rule_id } => RulesCommand::find(ctx, rule_id).await,
            RulesAction::Create { fields } => RulesCommand::create(ctx, &fields).await,
            RulesAction::Update { rule_id, fields } => RulesCommand::update(ctx, rule_id, &fields).await,
            RulesAction::Delete { rule_id, yes } => RulesCommand::delete(ctx, rule_id, yes).await,
        },
    }
}

fn hint_for(error: &anyhow::Error) -> Option<&'static str> {
    let validation = error
        .downcast_ref::<ValidationError>()
        .or_else(|| match error.downcast_ref::<PipelineError>() {
            Some(PipelineError::Validation(inner)) => Some(inner),
            _ => None,
        })
        .or_else(|| match error.downcast_ref::<WorkflowError>() {
            Some(WorkflowError::Validation(inner)) => Some(inner),
            _ => None,
        })?;
    match validation {
        ValidationError::NoModelSelected => Some("pass --model <id>; see 'review-desk models'"),
        other => validation_hint(other),
    }
}
