//! Storage backends.
//!
//! Both variants implement [`RecordStore`] with identical observable
//! behaviour; the server only ever sees a [`SharedStore`].

pub mod initialize;
pub mod memory;
pub mod sqlite;
pub mod stats;

use crate::config::{Config, StorageMode};
use crate::core::dashboard::CategoryStats;
use crate::errors::AppResult;
use crate::models::activity::{ActivityEntry, NewActivity};
use crate::models::category::Category;
use crate::models::record::WireRecord;
use std::sync::Arc;
use tracing::{info, warn};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// How many activities `GET /api/activities` returns.
pub const RECENT_ACTIVITY_LIMIT: usize = 50;

pub trait RecordStore: Send + Sync {
    /// Short name used in logs (`sqlite` / `memory`).
    fn backend_name(&self) -> &'static str;

    /// All records of a category, ascending by `no`.
    fn list(&self, category: Category) -> AppResult<Vec<WireRecord>>;

    fn get(&self, category: Category, id: i64) -> AppResult<WireRecord>;

    /// Store a new record and return it as persisted.
    fn insert(&self, category: Category, input: &WireRecord) -> AppResult<WireRecord>;

    /// Partial update: only fields present in `patch` change.
    fn update(&self, category: Category, id: i64, patch: &WireRecord) -> AppResult<WireRecord>;

    fn delete_one(&self, category: Category, id: i64) -> AppResult<()>;

    fn delete_all(&self, category: Category) -> AppResult<()>;

    /// Insert-or-replace each item by id. Replacement overwrites the whole
    /// row, defaulting missing fields to `""`. Returns `items.len()`.
    fn bulk_upsert(
        &self,
        category: Category,
        items: &[WireRecord],
        clear_first: bool,
    ) -> AppResult<usize>;

    /// Reassign `no` = 1..N in current `no` order.
    fn renumber(&self, category: Category) -> AppResult<()>;

    /// Highest numeric `no` plus one (1 when there is none). Reserves nothing.
    fn next_no(&self, category: Category) -> AppResult<i64>;

    fn status_counts(&self, category: Category) -> AppResult<CategoryStats>;

    fn record_activity(&self, draft: NewActivity) -> AppResult<ActivityEntry>;

    /// Newest first.
    fn recent_activities(&self, limit: usize) -> AppResult<Vec<ActivityEntry>>;
}

pub type SharedStore = Arc<dyn RecordStore>;

/// Pick the backend for this process.
///
/// `auto` probes SQLite (directory, file and schema) and falls back to
/// memory only when that fails.
pub fn open_store(cfg: &Config) -> AppResult<SharedStore> {
    match cfg.storage {
        StorageMode::Memory => {
            info!("using in-memory storage");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageMode::Sqlite => {
            let store = SqliteStore::open(&cfg.database)?;
            info!(database = %cfg.database, "using SQLite storage");
            Ok(Arc::new(store))
        }
        StorageMode::Auto => match SqliteStore::open(&cfg.database) {
            Ok(store) => {
                info!(database = %cfg.database, "using SQLite storage");
                Ok(Arc::new(store))
            }
            Err(e) => {
                warn!(
                    database = %cfg.database,
                    error = %e,
                    "SQLite unavailable, falling back to in-memory storage"
                );
                Ok(Arc::new(MemoryStore::new()))
            }
        },
    }
}
