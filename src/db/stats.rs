use crate::core::dashboard::summarize;
use crate::db::{RecordStore, SqliteStore};
use crate::errors::AppResult;
use crate::models::category::Category;
use crate::ui::messages::field;
use std::fs;

pub fn print_db_info(store: &SqliteStore) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(store.path()).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    field("File", store.path());
    field("Size", format!("{:.2} MB", file_mb));

    //
    // 2) PER-CATEGORY COUNTS
    //
    let mut per_category = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        let stats = store.status_counts(category)?;
        field(
            format!("{} ({})", category.key(), category.table()),
            format!(
                "{} records, {} completed, {} incomplete",
                stats.total, stats.completed, stats.incomplete
            ),
        );
        per_category.push((category, stats));
    }

    //
    // 3) TOTALS
    //
    let summary = summarize(per_category);
    field(
        "Total",
        format!(
            "{} records, {}% completed",
            summary.total, summary.completion_rate
        ),
    );

    //
    // 4) ACTIVITY LOG
    //
    let activities: i64 = store.with_conn(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM recent_activities", [], |row| row.get(0))?)
    })?;
    field("Activities", activities);

    println!();
    Ok(())
}
