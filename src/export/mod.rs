//! Category export to CSV, JSON or XLSX.
//!
//! CSV and XLSX use the registry's Korean display labels as the header row,
//! which is the only place those labels surface.

mod csv;
mod fs_utils;
mod json;
pub mod model;
mod xlsx;

use crate::errors::AppResult;
use crate::models::category::Category;
use crate::models::record::WireRecord;
use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Shared completion line for every export format.
pub(crate) fn notify_export_success(label: &str, path: &Path, rows: usize) {
    success(format!(
        "{label} export completed: {} ({rows} rows)",
        path.display()
    ));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// Write `records` (already ordered) of `category` to `path`.
pub fn export_category(
    category: Category,
    records: &[WireRecord],
    format: ExportFormat,
    path: &Path,
    force: bool,
) -> AppResult<()> {
    fs_utils::ensure_writable(path, force)?;

    match format {
        ExportFormat::Csv => csv::write_csv(path, category, records)?,
        ExportFormat::Json => json::write_json(path, records)?,
        ExportFormat::Xlsx => xlsx::export_xlsx(path, category, records)?,
    }

    notify_export_success(&format.as_str().to_uppercase(), path, records.len());
    Ok(())
}
