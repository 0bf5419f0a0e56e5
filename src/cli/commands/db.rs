use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::SqliteStore;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        info: show_info,
        check,
    } = cmd
    {
        let store = SqliteStore::open(&cfg.database)?;

        if *show_info {
            stats::print_db_info(&store)?;
        }

        if *check {
            info("Running integrity check…");

            let integrity: String = store.with_conn(|conn| {
                Ok(conn.query_row("PRAGMA integrity_check;", [], |row| row.get(0))?)
            })?;

            if integrity == "ok" {
                success("Integrity check passed.");
            } else {
                error(format!("Integrity check failed: {integrity}"));
            }
        }
    }

    Ok(())
}
