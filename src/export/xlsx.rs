use crate::errors::AppResult;
use crate::export::model::{headers, record_to_row};
use crate::models::category::{Category, FieldKind};
use crate::models::record::WireRecord;
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// XLSX export with a styled header, banded rows and fitted column widths.
pub(crate) fn export_xlsx(path: &Path, category: Category, records: &[WireRecord]) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(category.key())?;

    let headers = headers(category);

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    let mut col_widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();

    // Numeric columns (NO., quantity) are written as numbers when they parse.
    let numeric: Vec<bool> = category
        .fields()
        .iter()
        .map(|f| f.kind == FieldKind::Integer)
        .chain(std::iter::once(false))
        .collect();

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    for (row_index, record) in records.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band = if row_index % 2 == 0 { band1 } else { band2 };

        for (col, value) in record_to_row(category, record).iter().enumerate() {
            write_cell(worksheet, row, col as u16, value, numeric[col], band)?;
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet.set_column_width(c as u16, *w as f64 + 2.0)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &str,
    numeric: bool,
    band: Color,
) -> AppResult<()> {
    let base = Format::new()
        .set_background_color(band)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    match value.parse::<f64>() {
        Ok(num) if numeric => {
            worksheet.write_with_format(row, col, num, &base.set_align(FormatAlign::Right))?;
        }
        _ => {
            worksheet.write_with_format(row, col, value, &base)?;
        }
    }
    Ok(())
}
