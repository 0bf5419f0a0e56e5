use crate::config::Config;
use crate::db::open_store;
use crate::errors::AppResult;
use crate::server;
use tracing::info;

/// Handle the `serve` subcommand (also the default command).
pub async fn handle(cfg: Config) -> AppResult<()> {
    let store = open_store(&cfg)?;
    let backend = store.backend_name();

    server::serve(&cfg, store).await?;

    // Last handle to the store goes away here; SQLite closes its connection.
    info!(backend, "storage released");
    Ok(())
}
