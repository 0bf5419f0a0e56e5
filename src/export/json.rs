use crate::errors::{AppError, AppResult};
use crate::models::record::WireRecord;
use std::path::Path;

/// Pretty-printed JSON, same shape as the list endpoint.
pub(crate) fn write_json(path: &Path, records: &[WireRecord]) -> AppResult<()> {
    let json =
        serde_json::to_string_pretty(records).map_err(|e| AppError::Export(e.to_string()))?;
    std::fs::write(path, json)?;
    Ok(())
}
