use crate::errors::AppResult;
use crate::models::category::{Category, FieldKind};
use rusqlite::Connection;

/// Create the three category tables and `recent_activities` if missing.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    let mut ddl = String::new();

    for category in Category::ALL {
        let columns: Vec<String> = category
            .fields()
            .iter()
            .map(|f| match f.kind {
                FieldKind::Integer => format!("    {} INTEGER", f.key),
                FieldKind::Text => format!("    {} TEXT", f.key),
            })
            .collect();

        ddl.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    id INTEGER PRIMARY KEY,\n{},\n    status TEXT DEFAULT 'incomplete'\n);\n",
            category.table(),
            columns.join(",\n")
        ));
    }

    ddl.push_str(
        r#"
        CREATE TABLE IF NOT EXISTS recent_activities (
            id        INTEGER PRIMARY KEY,
            type      TEXT,
            message   TEXT,
            item_name TEXT,
            timestamp TEXT,
            icon      TEXT
        );
        "#,
    );

    conn.execute_batch(&ddl)?;
    Ok(())
}
