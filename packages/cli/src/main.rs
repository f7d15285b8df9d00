//! `studymate`: command-line front end for the study companion stores.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use store::{Companion, CompanionConfig, FileStore};

mod commands;

use commands::Command;

#[derive(Debug, Parser)]
/// Keep track of subjects, classes, notes, documents and events.
#[command(name = "studymate", version)]
struct Args {
    /// Directory holding the persisted stores and `companion.toml`.
    /// Defaults to the platform data directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studymate")
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);
    tracing::debug!(data_dir = %data_dir.display(), "opening stores");

    let config = CompanionConfig::load_from_dir(&data_dir)
        .with_context(|| format!("could not read config in {}", data_dir.display()))?;
    let mut companion = Companion::open(FileStore::new(data_dir.clone()), config)
        .await
        .with_context(|| format!("could not open stores in {}", data_dir.display()))?;

    let now = chrono::Local::now().naive_local();
    let mut out = std::io::stdout().lock();
    commands::run(&mut companion, args.command, now, &mut out).await
}
