//! Gradebook - student, teacher and grade records on SQLite
//!
//! Without a subcommand the built-in demonstration sequence is run.

use anyhow::Result;
use clap::Parser;
use gradebook::app::{App, Command};
use gradebook::database;
use gradebook::utils::{self, Config};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(version)]
struct Args {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database URL, overrides the configuration file
    #[arg(long)]
    database_url: Option<String>,

    /// Log every SQL statement
    #[arg(long)]
    echo: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    config.database.echo |= args.echo;
    config.validate()?;

    // Only the default location needs its directory created up front
    if config.database.url == utils::default_database_url() {
        utils::ensure_data_dir()?;
    }

    // Initialize logging; sqlx reports statements at debug level
    let level = if config.database.echo {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let store = database::create_session(&config.database).await?;
        let app = App::new(store);
        let outcome = app.run(args.command.unwrap_or(Command::Demo)).await;
        app.store().close().await;
        outcome
    })
}
