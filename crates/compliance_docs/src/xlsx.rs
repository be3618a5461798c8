use anyhow::{Context, Result, bail};
use compliance_core::ExportMetadata;
use rust_xlsxwriter::{Color, DocProperties, Format, Workbook};

use crate::pdf::truncate_chars;
use crate::record::Value;
use crate::table::Table;

/// Excel's sheet limits.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;
/// Longest string a single cell accepts. Longer text is cut.
pub const MAX_CELL_CHARS: usize = 32_767;

pub const SHEET_NAME: &str = "Sheet1";

/// Spreadsheet column name for a zero-based index: `0 -> A`, `25 -> Z`,
/// `26 -> AA`.
pub fn column_letter(col: usize) -> String {
    let mut letters = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A1-style reference for a zero-based row and column.
pub fn cell_reference(row: usize, col: usize) -> String {
    format!("{}{}", column_letter(col), row + 1)
}

/// Used range of a sheet with `rows` rows (header included) and `cols`
/// columns, e.g. `A1:C3`.
pub fn sheet_dimension(rows: usize, cols: usize) -> String {
    let last = cell_reference(rows.saturating_sub(1), cols.saturating_sub(1));
    format!("A1:{last}")
}

/// Generate an XLSX workbook holding `table` on a single sheet.
///
/// Cells keep their type: numbers and booleans are written natively, nulls
/// are left blank. The header row is styled, frozen and carries an
/// autofilter.
pub fn render_xlsx(title: &str, table: &Table, metadata: &ExportMetadata) -> Result<Vec<u8>> {
    let total_rows = table.row_count() + 1;
    if total_rows > MAX_ROWS || table.column_count() > MAX_COLS {
        bail!(
            "Table of {} rows x {} columns exceeds the sheet limit of {MAX_ROWS} x {MAX_COLS}",
            total_rows,
            table.column_count()
        );
    }
    if table.column_count() == 0 {
        bail!("Cannot write a sheet without columns");
    }

    let mut workbook = Workbook::new();
    let properties = DocProperties::new()
        .set_title(title)
        .set_subject(&metadata.subject)
        .set_author(&metadata.author)
        .set_keywords(&metadata.keywords_joined())
        .set_comment(&metadata.description)
        .set_category(&metadata.title);
    workbook.set_properties(&properties);

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .context("Failed to name worksheet")?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x428BCA))
        .set_font_color(Color::White);

    for (col, header) in table.headers().iter().enumerate() {
        worksheet
            .write_string_with_format(
                0,
                col as u16,
                &truncate_chars(header, MAX_CELL_CHARS),
                &header_format,
            )
            .with_context(|| format!("Failed to write header at {}", cell_reference(0, col)))?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            if cell.is_null() {
                continue;
            }
            let col = col_idx as u16;
            let written = match cell {
                Value::Bool(b) => worksheet.write_boolean(excel_row, col, *b).map(|_| ()),
                Value::Integer(i) => worksheet.write_number(excel_row, col, *i as f64).map(|_| ()),
                Value::Float(v) if v.is_finite() => {
                    worksheet.write_number(excel_row, col, *v).map(|_| ())
                }
                other => {
                    let text = truncate_chars(&other.to_string(), MAX_CELL_CHARS);
                    worksheet.write_string(excel_row, col, &text).map(|_| ())
                }
            };
            written.with_context(|| {
                format!(
                    "Failed to write cell {}",
                    cell_reference(row_idx + 1, col_idx)
                )
            })?;
        }
    }

    let last_row = table.row_count() as u32;
    let last_col = (table.column_count() - 1) as u16;
    worksheet
        .set_freeze_panes(1, 0)
        .context("Failed to freeze header row")?;
    worksheet
        .autofilter(0, 0, last_row, last_col)
        .with_context(|| {
            format!(
                "Failed to add autofilter over {}",
                sheet_dimension(total_rows, table.column_count())
            )
        })?;
    worksheet.autofit();

    workbook
        .save_to_buffer()
        .context("Failed to save workbook to buffer")
}
