//! filo CLI
//!
//! Organizes directories into a semantic folder taxonomy, learning from
//! every confirmation and correction.

use anyhow::Result;
use clap::Parser;
use filo_core::exit_codes;

mod app;
mod commands;
mod progress;
mod ui;

use app::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let code = match &cli.command {
        Some(Commands::Scan { dir, recursive }) => commands::scan::run(dir, *recursive),
        Some(Commands::Stats) => commands::stats::run(),
        Some(Commands::Undo { batch, list, yes }) => {
            commands::undo::run(batch.as_deref(), *list, *yes)
        }
        Some(Commands::Models { stats }) => commands::models::run(*stats).await,
        Some(Commands::Config { set }) => commands::config::run(set),
        Some(Commands::Reset { target, yes }) => commands::reset::run(*target, *yes),
        Some(Commands::Setup) => commands::setup::run().await,
        None => commands::organize::run(&cli).await,
    }?;

    if code != exit_codes::SUCCESS {
        std::process::exit(code);
    }
    Ok(())
}

/// Open and initialize the database at the configured location
fn open_database() -> filo_core::Result<filo_core::Database> {
    let db = filo_core::Database::open(filo_core::Database::default_path())?;
    db.initialize()?;
    Ok(db)
}
