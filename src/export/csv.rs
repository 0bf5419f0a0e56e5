use crate::errors::AppResult;
use crate::export::model::{headers, record_to_row};
use crate::models::category::Category;
use crate::models::record::WireRecord;
use csv::Writer;
use std::path::Path;

pub(crate) fn write_csv(path: &Path, category: Category, records: &[WireRecord]) -> AppResult<()> {
    let mut wtr = Writer::from_path(path)?;

    wtr.write_record(headers(category))?;
    for record in records {
        wtr.write_record(record_to_row(category, record))?;
    }

    wtr.flush()?;
    Ok(())
}
