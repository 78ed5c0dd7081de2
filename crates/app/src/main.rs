use std::io;
use std::sync::Arc;

use quiz_core::model::Catalog;
use services::{Clock, HttpQuestionSource, SessionLoopService};
use storage::fs::FsQuestionSource;
use storage::repository::{QuestionSource, Storage};
use tracing_subscriber::EnvFilter;

mod config;
mod presenter;

use config::{Command, Config, Parsed, QuestionOrigin, ScoreStore, prepare_sqlite_file, print_usage};
use presenter::Presenter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn open_storage(store: &ScoreStore) -> Result<Storage, Box<dyn std::error::Error>> {
    match store {
        ScoreStore::Memory => Ok(Storage::in_memory()),
        ScoreStore::Sqlite(db_url) => {
            // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
            prepare_sqlite_file(db_url)?;
            Ok(Storage::sqlite(db_url).await?)
        }
    }
}

fn question_source(origin: &QuestionOrigin) -> Arc<dyn QuestionSource> {
    match origin {
        QuestionOrigin::Dir(root) => Arc::new(FsQuestionSource::new(root)),
        QuestionOrigin::Http(base_url) => Arc::new(HttpQuestionSource::new(base_url.clone())),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let env = |key: &str| std::env::var(key).ok();
    let config = match Config::parse(env, std::env::args().skip(1)).inspect_err(|e| {
        eprintln!("{e}");
        print_usage();
    })? {
        Parsed::Run(config) => config,
        Parsed::Help => {
            print_usage();
            return Ok(());
        }
    };
    tracing::debug!(?config, "starting");

    let storage = open_storage(&config.store).await?;
    let service = SessionLoopService::new(
        Clock::default(),
        Arc::new(Catalog::builtin()),
        question_source(&config.questions),
        Arc::clone(&storage.high_scores),
    )
    .with_sample_size(config.sample_size);

    match config.command {
        Command::HighScore => {
            println!("{}", service.high_score().await?);
            Ok(())
        }
        Command::Play => {
            let stdin = io::stdin();
            let mut presenter = Presenter::new(
                stdin.lock(),
                io::stdout(),
                service,
                config.feedback_pause,
            );
            presenter.run().await
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
