//! Chefrag CLI
//!
//! Ask questions about dishes, grounded in the knowledge base.

use chefrag_core::{error::exit_codes, ChefError, Database};
use clap::Parser;

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Credentials usually live in a .env next to the working directory
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Open database (use CHEFRAG_DB env var if set, otherwise use default)
    let db_path = std::env::var("CHEFRAG_DB")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| Database::default_path());
    let db = Database::open(&db_path)?;
    db.initialize()?;

    match cli.command {
        Commands::Ask(args) => commands::ask::run(args, &db, cli.format).await,
        Commands::Feedback(args) => commands::feedback::run(args, &db, cli.format).await,
        Commands::Recent(args) => commands::recent::run(args, &db, cli.format).await,
        Commands::Stats => commands::stats::run(&db, cli.format).await,
        Commands::Init(args) => commands::init::run(args, &db, &db_path).await,
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ChefError>()
        .map_or(exit_codes::GENERAL_ERROR, ChefError::exit_code)
}
