use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::SqliteStore;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle the `init` command
///
/// Writes the configuration file (keeping any values already in it, plus
/// the `--db` override) and creates the SQLite schema.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let path = cli.config.clone().unwrap_or_else(Config::config_file);

    let mut cfg = Config::load_from(&path)?;
    if let Some(db) = &cli.db {
        cfg.database = db.clone();
    }

    info("Initializing asmanager…");
    cfg.save_to(&path)?;
    success(format!("Config file: {}", path.display()));

    let store = SqliteStore::open(&cfg.database)?;
    success(format!("Database initialized at {}", store.path()));
    Ok(())
}
