use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::{RecordStore, SqliteStore};
use crate::errors::AppResult;
use crate::export::export_category;
use crate::models::category::Category;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        category,
        format,
        file,
        force,
    } = cmd
    {
        let category = Category::parse(category)?;
        let store = SqliteStore::open(&cfg.database)?;
        let records = store.list(category)?;
        export_category(category, &records, *format, file, *force)?;
    }
    Ok(())
}
