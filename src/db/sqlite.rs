//! Relational backend: one SQLite connection shared behind a mutex.

use crate::core::codec::{self, encode, encode_patch, encode_replacement};
use crate::core::dashboard::CategoryStats;
use crate::db::RecordStore;
use crate::db::initialize::init_db;
use crate::errors::{AppError, AppResult};
use crate::models::activity::{ActivityEntry, NewActivity};
use crate::models::category::Category;
use crate::models::record::{Status, StorageRow, WireRecord};
use crate::utils::time::{next_timestamp_id, now_iso};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use serde_json::{Number, Value};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: String,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure the schema exists.
    /// Missing parent directories are created.
    pub fn open(path: &str) -> AppResult<Self> {
        let path_ref = Path::new(path);
        if let Some(dir) = path_ref.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let conn = Connection::open(path_ref)?;
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_string(),
        })
    }

    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: ":memory:".to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Helper to execute a closure with the locked connection.
    pub fn with_conn<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        let mut conn = self.conn()?;
        func(&mut conn)
    }

    fn conn(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Backend("SQLite connection lock poisoned".into()))
    }

    fn fetch(conn: &Connection, category: Category, id: i64) -> AppResult<WireRecord> {
        let sql = format!("SELECT * FROM {} WHERE id = ?1", category.table());
        let row = conn
            .query_row(&sql, [id], |row| map_row(row, category))
            .optional()?
            .ok_or(AppError::NotFound)?;
        Ok(codec::decode(&row, category))
    }
}

/// SQLite row → presence-aware storage row.
fn map_row(row: &Row, category: Category) -> rusqlite::Result<StorageRow> {
    let status: Option<String> = row.get("status")?;

    let mut fields = Vec::with_capacity(category.fields().len());
    for field in category.fields() {
        let value: SqlValue = row.get(field.key)?;
        fields.push((field.key, sql_to_json(value)));
    }

    Ok(StorageRow {
        id: Some(row.get("id")?),
        status: Some(status.as_deref().map(Status::from_db_str).unwrap_or_default()),
        fields,
    })
}

fn map_activity(row: &Row) -> rusqlite::Result<ActivityEntry> {
    Ok(ActivityEntry {
        id: row.get("id")?,
        kind: row.get("type")?,
        message: row.get("message")?,
        item_name: row.get("item_name")?,
        timestamp: row
            .get::<_, Option<String>>("timestamp")?
            .unwrap_or_default(),
        icon: row.get("icon")?,
    })
}

pub(crate) fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map(SqlValue::Real).unwrap_or(SqlValue::Null),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
    }
}

pub(crate) fn sql_to_json(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::from(i),
        SqlValue::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        SqlValue::Text(s) => Value::String(s),
        SqlValue::Blob(b) => Value::String(String::from_utf8_lossy(&b).into_owned()),
    }
}

/// Column list and values of a row to be written, status first.
fn columns_of(row: &StorageRow) -> (Vec<&'static str>, Vec<SqlValue>) {
    let mut names = Vec::with_capacity(row.fields.len() + 1);
    let mut values = Vec::with_capacity(row.fields.len() + 1);

    if let Some(status) = row.status {
        names.push("status");
        values.push(SqlValue::Text(status.to_db_str().to_string()));
    }
    for (key, value) in &row.fields {
        names.push(*key);
        values.push(json_to_sql(value));
    }

    (names, values)
}

impl RecordStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn list(&self, category: Category) -> AppResult<Vec<WireRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT * FROM {} ORDER BY no ASC, id ASC",
            category.table()
        ))?;

        let rows = stmt.query_map([], |row| map_row(row, category))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(codec::decode(&r?, category));
        }
        Ok(out)
    }

    fn get(&self, category: Category, id: i64) -> AppResult<WireRecord> {
        let conn = self.conn()?;
        Self::fetch(&conn, category, id)
    }

    fn insert(&self, category: Category, input: &WireRecord) -> AppResult<WireRecord> {
        let row = encode(input, category);
        let (names, values) = columns_of(&row);
        let placeholders = vec!["?"; names.len()].join(", ");

        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT INTO {} ({}) VALUES ({})",
                category.table(),
                names.join(", "),
                placeholders
            ),
            params_from_iter(values),
        )?;

        let id = conn.last_insert_rowid();
        debug!(category = %category, id, "record inserted");
        Self::fetch(&conn, category, id)
    }

    fn update(&self, category: Category, id: i64, patch: &WireRecord) -> AppResult<WireRecord> {
        let row = encode_patch(patch, category);
        let (names, mut values) = columns_of(&row);

        let conn = self.conn()?;

        // Nothing to set: still report a missing id as NotFound.
        if names.is_empty() {
            return Self::fetch(&conn, category, id);
        }

        let set_clause = names
            .iter()
            .map(|n| format!("{n} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        values.push(SqlValue::Integer(id));

        let changed = conn.execute(
            &format!("UPDATE {} SET {} WHERE id = ?", category.table(), set_clause),
            params_from_iter(values),
        )?;
        if changed == 0 {
            return Err(AppError::NotFound);
        }

        debug!(category = %category, id, columns = names.len(), "record updated");
        Self::fetch(&conn, category, id)
    }

    fn delete_one(&self, category: Category, id: i64) -> AppResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", category.table()),
            [id],
        )?;
        if changed == 0 {
            return Err(AppError::NotFound);
        }
        debug!(category = %category, id, "record deleted");
        Ok(())
    }

    fn delete_all(&self, category: Category) -> AppResult<()> {
        let conn = self.conn()?;
        let removed = conn.execute(&format!("DELETE FROM {}", category.table()), [])?;
        debug!(category = %category, removed, "category cleared");
        Ok(())
    }

    fn bulk_upsert(
        &self,
        category: Category,
        items: &[WireRecord],
        clear_first: bool,
    ) -> AppResult<usize> {
        let keys: Vec<&str> = category.fields().iter().map(|f| f.key).collect();
        let sql = format!(
            "INSERT OR REPLACE INTO {} (id, {}, status) VALUES (?, {}, ?)",
            category.table(),
            keys.join(", "),
            vec!["?"; keys.len()].join(", ")
        );

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        if clear_first {
            tx.execute(&format!("DELETE FROM {}", category.table()), [])?;
        }

        {
            let mut stmt = tx.prepare(&sql)?;
            for item in items {
                let row = encode_replacement(item, category);

                let mut values = Vec::with_capacity(keys.len() + 2);
                values.push(row.id.map(SqlValue::Integer).unwrap_or(SqlValue::Null));
                values.extend(row.fields.iter().map(|(_, v)| json_to_sql(v)));
                values.push(SqlValue::Text(
                    row.status.unwrap_or_default().to_db_str().to_string(),
                ));

                stmt.execute(params_from_iter(values))?;
            }
        }

        tx.commit()?;
        debug!(category = %category, count = items.len(), clear_first, "bulk upsert applied");
        Ok(items.len())
    }

    fn renumber(&self, category: Category) -> AppResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let ids: Vec<i64> = {
            let mut stmt = tx.prepare(&format!(
                "SELECT id FROM {} ORDER BY no ASC, id ASC",
                category.table()
            ))?;
            let ids = stmt
                .query_map([], |row| row.get::<_, i64>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            ids
        };

        {
            let mut stmt = tx.prepare(&format!(
                "UPDATE {} SET no = ?1 WHERE id = ?2",
                category.table()
            ))?;
            for (index, id) in ids.iter().enumerate() {
                stmt.execute(params![index as i64 + 1, id])?;
            }
        }

        tx.commit()?;
        debug!(category = %category, rows = ids.len(), "renumbered");
        Ok(())
    }

    fn next_no(&self, category: Category) -> AppResult<i64> {
        let conn = self.conn()?;
        let max: SqlValue = conn.query_row(
            &format!(
                "SELECT MAX(no) FROM {} WHERE typeof(no) IN ('integer', 'real')",
                category.table()
            ),
            [],
            |row| row.get(0),
        )?;

        let max = match max {
            SqlValue::Integer(i) => i,
            SqlValue::Real(f) => f.floor() as i64,
            _ => 0,
        };
        max.checked_add(1).ok_or(AppError::NoExhausted)
    }

    fn status_counts(&self, category: Category) -> AppResult<CategoryStats> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT status, COUNT(*) FROM {} GROUP BY status",
            category.table()
        ))?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, Option<String>>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut stats = CategoryStats::default();
        for r in rows {
            let (status, count) = r?;
            let status = status.as_deref().map(Status::from_db_str).unwrap_or_default();
            stats.add(status, count as u64);
        }
        Ok(stats)
    }

    fn record_activity(&self, draft: NewActivity) -> AppResult<ActivityEntry> {
        let conn = self.conn()?;

        let last: Option<i64> =
            conn.query_row("SELECT MAX(id) FROM recent_activities", [], |row| row.get(0))?;
        let id = next_timestamp_id(last).ok_or(AppError::IdExhausted)?;
        let entry = ActivityEntry::from_draft(draft, id, now_iso());

        conn.execute(
            "INSERT INTO recent_activities (id, type, message, item_name, timestamp, icon)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.id,
                entry.kind,
                entry.message,
                entry.item_name,
                entry.timestamp,
                entry.icon,
            ],
        )?;

        debug!(id = entry.id, "activity recorded");
        Ok(entry)
    }

    fn recent_activities(&self, limit: usize) -> AppResult<Vec<ActivityEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, type, message, item_name, timestamp, icon
             FROM recent_activities
             ORDER BY id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map([limit as i64], map_activity)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
