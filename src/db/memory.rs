//! Process-lifetime backend used when SQLite is unavailable.
//!
//! Rows keep their insertion order; listing sorts by `no` with the same
//! cross-type ordering SQLite applies (NULL < numbers < text).

use crate::core::codec::{self, encode, encode_patch, encode_replacement};
use crate::core::dashboard::CategoryStats;
use crate::db::RecordStore;
use crate::errors::{AppError, AppResult};
use crate::models::activity::{ActivityEntry, NewActivity};
use crate::models::category::Category;
use crate::models::record::{StorageRow, WireRecord};
use crate::utils::time::{next_timestamp_id, now_iso};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Default)]
struct MemoryState {
    tables: HashMap<Category, Vec<StorageRow>>,
    activities: Vec<ActivityEntry>,
}

impl MemoryState {
    fn table(&mut self, category: Category) -> &mut Vec<StorageRow> {
        self.tables.entry(category).or_default()
    }

    fn rows(&self, category: Category) -> &[StorageRow] {
        self.tables.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> AppResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| AppError::Backend("memory store lock poisoned".into()))
    }
}

/// Position of a value in SQLite's ORDER BY.
#[derive(Debug, PartialEq, PartialOrd)]
enum SortKey<'a> {
    Null,
    Number(f64),
    Text(&'a str),
}

fn sort_key(value: Option<&Value>) -> SortKey<'_> {
    match value {
        None | Some(Value::Null) => SortKey::Null,
        Some(Value::Number(n)) => SortKey::Number(n.as_f64().unwrap_or(0.0)),
        Some(Value::String(s)) => SortKey::Text(s),
        Some(_) => SortKey::Text(""),
    }
}

fn by_no(a: &StorageRow, b: &StorageRow) -> Ordering {
    sort_key(a.no())
        .partial_cmp(&sort_key(b.no()))
        .unwrap_or(Ordering::Equal)
}

fn max_id(rows: &[StorageRow]) -> Option<i64> {
    rows.iter().filter_map(|r| r.id).max()
}

fn is_free(rows: &[StorageRow], id: i64) -> bool {
    !rows.iter().any(|r| r.id == Some(id))
}

/// Caller's id when it is free, otherwise a fresh timestamp-derived one.
/// Once the top id is `i64::MAX` the lowest unused positive id is taken
/// instead, like SQLite's rowid search.
fn assign_id(rows: &[StorageRow], requested: Option<i64>) -> i64 {
    match requested {
        Some(id) if is_free(rows, id) => id,
        _ => next_timestamp_id(max_id(rows))
            .unwrap_or_else(|| (1..).find(|&id| is_free(rows, id)).unwrap_or(1)),
    }
}

impl RecordStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn list(&self, category: Category) -> AppResult<Vec<WireRecord>> {
        let state = self.state()?;
        let mut rows: Vec<&StorageRow> = state.rows(category).iter().collect();
        // stable: equal `no` keeps insertion order
        rows.sort_by(|a, b| by_no(a, b));
        Ok(rows.into_iter().map(|r| codec::decode(r, category)).collect())
    }

    fn get(&self, category: Category, id: i64) -> AppResult<WireRecord> {
        let state = self.state()?;
        state
            .rows(category)
            .iter()
            .find(|r| r.id == Some(id))
            .map(|r| codec::decode(r, category))
            .ok_or(AppError::NotFound)
    }

    fn insert(&self, category: Category, input: &WireRecord) -> AppResult<WireRecord> {
        let mut row = encode(input, category);

        let mut state = self.state()?;
        let table = state.table(category);
        let id = assign_id(table, row.id);
        row.id = Some(id);

        let out = codec::decode(&row, category);
        table.push(row);
        debug!(category = %category, id, "record inserted");
        Ok(out)
    }

    fn update(&self, category: Category, id: i64, patch: &WireRecord) -> AppResult<WireRecord> {
        let patch = encode_patch(patch, category);

        let mut state = self.state()?;
        let row = state
            .table(category)
            .iter_mut()
            .find(|r| r.id == Some(id))
            .ok_or(AppError::NotFound)?;

        row.merge(&patch);
        debug!(category = %category, id, "record updated");
        Ok(codec::decode(row, category))
    }

    fn delete_one(&self, category: Category, id: i64) -> AppResult<()> {
        let mut state = self.state()?;
        let table = state.table(category);
        let pos = table
            .iter()
            .position(|r| r.id == Some(id))
            .ok_or(AppError::NotFound)?;
        table.remove(pos);
        debug!(category = %category, id, "record deleted");
        Ok(())
    }

    fn delete_all(&self, category: Category) -> AppResult<()> {
        let mut state = self.state()?;
        state.table(category).clear();
        debug!(category = %category, "category cleared");
        Ok(())
    }

    fn bulk_upsert(
        &self,
        category: Category,
        items: &[WireRecord],
        clear_first: bool,
    ) -> AppResult<usize> {
        let mut state = self.state()?;
        let table = state.table(category);

        if clear_first {
            table.clear();
        }

        for item in items {
            let mut row = encode_replacement(item, category);

            let existing = row
                .id
                .and_then(|id| table.iter().position(|r| r.id == Some(id)));

            match existing {
                Some(pos) => table[pos] = row,
                None => {
                    row.id = Some(assign_id(table, row.id));
                    table.push(row);
                }
            }
        }

        debug!(category = %category, count = items.len(), clear_first, "bulk upsert applied");
        Ok(items.len())
    }

    fn renumber(&self, category: Category) -> AppResult<()> {
        let mut state = self.state()?;
        let table = state.table(category);

        let mut order: Vec<usize> = (0..table.len()).collect();
        order.sort_by(|&a, &b| by_no(&table[a], &table[b]));

        for (seq, idx) in order.into_iter().enumerate() {
            table[idx].set("no", Value::from(seq as i64 + 1));
        }

        debug!(category = %category, rows = table.len(), "renumbered");
        Ok(())
    }

    fn next_no(&self, category: Category) -> AppResult<i64> {
        let state = self.state()?;
        let max = state
            .rows(category)
            .iter()
            .filter_map(|r| match r.no()? {
                Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.floor() as i64)),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        max.checked_add(1).ok_or(AppError::NoExhausted)
    }

    fn status_counts(&self, category: Category) -> AppResult<CategoryStats> {
        let state = self.state()?;
        let mut stats = CategoryStats::default();
        for row in state.rows(category) {
            stats.add(row.status.unwrap_or_default(), 1);
        }
        Ok(stats)
    }

    fn record_activity(&self, draft: NewActivity) -> AppResult<ActivityEntry> {
        let mut state = self.state()?;
        let last = state.activities.iter().map(|a| a.id).max();
        let id = next_timestamp_id(last).ok_or(AppError::IdExhausted)?;
        let entry = ActivityEntry::from_draft(draft, id, now_iso());
        state.activities.push(entry.clone());
        debug!(id = entry.id, "activity recorded");
        Ok(entry)
    }

    fn recent_activities(&self, limit: usize) -> AppResult<Vec<ActivityEntry>> {
        let state = self.state()?;
        let mut out = state.activities.clone();
        out.sort_by(|a, b| b.id.cmp(&a.id));
        out.truncate(limit);
        Ok(out)
    }
}
