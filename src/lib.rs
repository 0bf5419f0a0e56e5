//! asmanager library root.
//! Exposes the CLI parser, the async `run()` entry point and the storage,
//! server and export modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod server;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::EnvFilter;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: Config) -> AppResult<()> {
    match &cli.command {
        None | Some(Commands::Serve) => cli::commands::serve::handle(cfg).await,
        Some(Commands::Init) => cli::commands::init::handle(cli),
        Some(Commands::Config { .. }) => cli::commands::config::handle(cli, &cfg),
        Some(cmd @ Commands::Db { .. }) => cli::commands::db::handle(cmd, &cfg),
        Some(cmd @ Commands::Export { .. }) => cli::commands::export::handle(cmd, &cfg),
    }
}

/// Effective configuration: config file (or defaults), then the `--db`
/// override and the root-level server flags / environment.
pub fn load_config(cli: &Cli) -> AppResult<Config> {
    let path = cli.config.clone().unwrap_or_else(Config::config_file);
    let mut cfg = Config::load_from(&path)?;
    if let Some(db) = &cli.db {
        cfg.database = db.clone();
    }
    cli.serve.apply(&mut cfg);
    Ok(cfg)
}

/// Logs go to stderr so CLI output on stdout stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("asmanager=info,tower_http=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing();

    let cfg = load_config(&cli)?;
    dispatch(&cli, cfg).await
}
