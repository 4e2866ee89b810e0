//! Surveyor CLI: author surveys, answer them, and review the responses.

mod config;
mod storage;

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use surveyor::{
    AnsweringSession, AuthError, Authenticator, Identity, MemoryStore, ResponseBrowser,
    SurveyDraft, SurveyError, SurveyId, Viewer, browse,
};
use surveyor_dialoguer::{DialoguerBackend, DialoguerError, DraftAction};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "surveyor", version, about = "Create, answer and review surveys")]
struct Cli {
    /// Configuration file (default: ./surveyor.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store snapshot file, overriding the configuration
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Plain prompts without colors
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List surveys
    List {
        /// Log in and list your own surveys with their response counts
        #[arg(long)]
        mine: bool,
    },
    /// Log in and author a new survey
    Create,
    /// Answer a survey
    Answer {
        /// Survey id (pick from the list if omitted)
        survey_id: Option<i64>,
    },
    /// Log in and browse the responses of one of your surveys
    Results {
        /// Survey id (pick from your surveys if omitted)
        survey_id: Option<i64>,
    },
}

/// Everything a command needs.
struct App {
    store: MemoryStore,
    store_path: PathBuf,
    backend: DialoguerBackend,
    config: CliConfig,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        if e
            .downcast_ref::<DialoguerError>()
            .is_some_and(DialoguerError::is_cancelled)
        {
            eprintln!("cancelled");
            process::exit(130);
        }
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = CliConfig::discover(cli.config.as_deref(), &cwd)?;
    let store_path = cli.store.unwrap_or_else(|| config.store.clone());
    let store = storage::open(&store_path, &config.admins)?;
    let backend = if cli.plain || !config.colorful {
        DialoguerBackend::plain()
    } else {
        DialoguerBackend::new()
    };

    let app = App {
        store,
        store_path,
        backend,
        config,
    };

    match cli.command {
        Commands::List { mine } => list(&app, mine).await,
        Commands::Create => create(&app).await,
        Commands::Answer { survey_id } => answer(&app, survey_id.map(SurveyId::new)).await,
        Commands::Results { survey_id } => results(&app, survey_id.map(SurveyId::new)).await,
    }
}

/// Prompt for credentials until the store accepts them.
async fn login(app: &App) -> anyhow::Result<Identity> {
    loop {
        let credentials = app.backend.login()?;
        match app.store.login(&credentials).await {
            Ok(identity) => {
                println!("Welcome, {}!", identity.name);
                return Ok(identity);
            }
            Err(AuthError::Rejected(message)) => println!("{message}"),
            Err(err @ AuthError::Communication(_)) => return Err(err.into()),
        }
    }
}

async fn list(app: &App, mine: bool) -> anyhow::Result<()> {
    let viewer = if mine {
        Viewer::Admin(login(app).await?)
    } else {
        Viewer::Anonymous
    };
    let listing = browse(&app.store, &viewer).await?;
    app.backend.show_listing(&listing);
    Ok(())
}

async fn create(app: &App) -> anyhow::Result<()> {
    let owner = login(app).await?;
    let mut draft = SurveyDraft::with_limits(app.config.limits.clone());

    loop {
        match app.backend.edit_draft(&mut draft)? {
            DraftAction::Discard => {
                println!("Survey discarded.");
                return Ok(());
            }
            DraftAction::Submit => {}
        }

        match draft.submit(&app.store, &owner).await {
            Ok(survey_id) => {
                storage::save(&app.store, &app.store_path).await?;
                info!(%survey_id, "survey saved");
                println!("Survey {survey_id} published.");
                return Ok(());
            }
            Err(err @ SurveyError::PartiallyPersisted { .. }) => {
                storage::save(&app.store, &app.store_path).await?;
                return Err(err.into());
            }
            Err(err) => {
                app.backend.show_error(&err);
                if err.is_retryable() {
                    println!("Nothing was lost; submit again when ready.");
                }
            }
        }
    }
}

async fn answer(app: &App, survey_id: Option<SurveyId>) -> anyhow::Result<()> {
    let survey_id = match survey_id {
        Some(id) => id,
        None => {
            let listing = browse(&app.store, &Viewer::Anonymous).await?;
            match app.backend.pick_survey(&listing)? {
                Some(id) => id,
                None => return Ok(()),
            }
        }
    };

    let mut session = AnsweringSession::with_limits(survey_id, app.config.limits.clone());
    session
        .load(&app.store)
        .await
        .with_context(|| format!("opening survey {survey_id}"))?;
    app.backend.answer(&mut session)?;

    loop {
        let name = app.backend.ask_name()?;
        match session.submit(&app.store, &name).await {
            Ok(_) => {
                storage::save(&app.store, &app.store_path).await?;
                println!("Thank you, {}!", name.trim());
                return Ok(());
            }
            Err(err) if err.is_validation() || err.is_retryable() => app.backend.show_error(&err),
            Err(err) => return Err(err.into()),
        }
    }
}

async fn results(app: &App, survey_id: Option<SurveyId>) -> anyhow::Result<()> {
    let viewer = Viewer::Admin(login(app).await?);
    let survey_id = match survey_id {
        Some(id) => id,
        None => {
            let listing = browse(&app.store, &viewer).await?;
            match app.backend.pick_survey(&listing)? {
                Some(id) => id,
                None => return Ok(()),
            }
        }
    };

    match ResponseBrowser::load(&app.store, survey_id, &viewer).await {
        Ok(mut browser) => app.backend.browse_responses(&mut browser)?,
        Err(SurveyError::NotFound(message)) => println!("Nothing here: {message}"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
