//! Dashboard aggregation across all categories.

use crate::db::SharedStore;
use crate::errors::AppResult;
use crate::models::category::Category;
use crate::models::record::Status;
use futures::future::try_join_all;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub total: u64,
    pub completed: u64,
    pub incomplete: u64,
}

impl CategoryStats {
    pub fn add(&mut self, status: Status, count: u64) {
        self.total += count;
        if status.is_completed() {
            self.completed += count;
        } else {
            self.incomplete += count;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total: u64,
    pub completed: u64,
    pub incomplete: u64,
    /// Percentage with one decimal, e.g. `"66.7"`; `"0.0"` when empty.
    pub completion_rate: String,
    pub categories: BTreeMap<Category, CategoryStats>,
}

/// Reduce per-category counts into the global summary.
pub fn summarize<I>(per_category: I) -> DashboardSummary
where
    I: IntoIterator<Item = (Category, CategoryStats)>,
{
    let categories: BTreeMap<Category, CategoryStats> = per_category.into_iter().collect();

    let total: u64 = categories.values().map(|s| s.total).sum();
    let completed: u64 = categories.values().map(|s| s.completed).sum();

    DashboardSummary {
        total,
        completed,
        incomplete: total - completed,
        completion_rate: completion_rate(completed, total),
        categories,
    }
}

pub fn completion_rate(completed: u64, total: u64) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", completed as f64 / total as f64 * 100.0)
}

/// Count every category on the blocking pool concurrently.
/// Any failing category fails the whole call; no partial summary is returned.
pub async fn aggregate(store: SharedStore) -> AppResult<DashboardSummary> {
    let tasks = Category::ALL.map(|category| {
        let store = store.clone();
        tokio::task::spawn_blocking(move || {
            store
                .status_counts(category)
                .map(|stats| (category, stats))
        })
    });

    let per_category = try_join_all(tasks)
        .await?
        .into_iter()
        .collect::<AppResult<Vec<_>>>()?;

    Ok(summarize(per_category))
}
