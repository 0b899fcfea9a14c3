//! Fill a pre-built report template.
//!
//! The template is loaded into memory with `umya-spreadsheet`, mapped rows are appended directly
//! below the highest used row of the target sheet, and the edited workbook is persisted to the
//! destination. Everything else in the template (formulas, merged ranges, styles, column widths,
//! other sheets) is carried over untouched. Headers are neither read nor checked.
//!
//! One physical row is written per [`MappedRow`], with columns in [`ColumnOrder`] starting at
//! column `A`.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use tracing::info;
use umya_spreadsheet::Worksheet;

use crate::error::{ReportError, ReportResult};
use crate::types::{Cell, ColumnOrder, MappedRow};

use super::persist_bytes;

/// What [`populate_template`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulateSummary {
    pub destination: PathBuf,
    /// Sheet the rows were appended to.
    pub sheet: String,
    /// Rows occupied by template content on that sheet (0-based index of the first appended row).
    pub template_rows: u32,
    pub appended_rows: usize,
}

/// Append `rows` beneath the content of `template` and save the result to `destination`.
///
/// - `sheet` selects the target sheet; `None` uses the first one.
/// - Columns absent from a row are left empty.
/// - The template file is never written.
#[tracing::instrument(
    level = "info",
    skip(rows, order),
    fields(template = %template.display(), destination = %destination.display(), rows = rows.len())
)]
pub fn populate_template(
    rows: &[MappedRow],
    template: &Path,
    destination: &Path,
    order: &ColumnOrder,
    sheet: Option<&str>,
) -> ReportResult<PopulateSummary> {
    let template_error = |message: String| ReportError::Template {
        path: template.to_path_buf(),
        message,
    };

    let mut book =
        umya_spreadsheet::reader::xlsx::read(template).map_err(|e| template_error(e.to_string()))?;
    let sheet_names: Vec<String> = book
        .get_sheet_collection()
        .iter()
        .map(|ws| ws.get_name().to_string())
        .collect();

    let target = match sheet {
        Some(name) if sheet_names.iter().any(|s| s == name) => name.to_string(),
        Some(name) => {
            return Err(ReportError::SheetNotFound {
                path: template.to_path_buf(),
                sheet: name.to_string(),
                available: sheet_names,
            });
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ReportError::SchemaMismatch {
                message: format!("template {} has no sheets", template.display()),
            })?,
    };

    let ws = book
        .get_sheet_by_name_mut(&target)
        .ok_or_else(|| template_error(format!("sheet '{target}' could not be loaded")))?;
    let template_rows = ws.get_highest_row();
    for (offset, row) in rows.iter().enumerate() {
        // umya coordinates are 1-based (column, row).
        let row_no = template_rows + offset as u32 + 1;
        for (col_idx, cell) in row.flatten(order).enumerate() {
            write_cell(ws, col_idx as u32 + 1, row_no, cell);
        }
    }

    let mut buf = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buf)
        .map_err(|e| template_error(e.to_string()))?;
    persist_bytes(buf.get_ref(), destination)?;
    info!(
        sheet = %target,
        template_rows,
        appended = rows.len(),
        "template populated"
    );

    Ok(PopulateSummary {
        destination: destination.to_path_buf(),
        sheet: target,
        template_rows,
        appended_rows: rows.len(),
    })
}

fn write_cell(ws: &mut Worksheet, col: u32, row: u32, cell: &Cell) {
    match cell {
        Cell::Empty => {}
        Cell::Text(s) => {
            ws.get_cell_mut((col, row)).set_value_string(s.as_str());
        }
        Cell::Number(n) => {
            ws.get_cell_mut((col, row)).set_value_number(*n);
        }
    }
}
