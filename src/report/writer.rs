//! Write raw records to a fresh workbook.
//!
//! The header row is the union of record keys in first-seen order; each record becomes one row
//! below it.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::info;

use crate::error::{ReportError, ReportResult};
use crate::types::{RawRecord, Value};

use super::{EXCEL_DATE_FORMAT, save_workbook, to_excel_serial};

const DATETIME_FORMAT: &str = "dd/mm/yyyy hh:mm:ss";

/// What [`write_records`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub destination: PathBuf,
    pub columns: usize,
    pub rows: usize,
}

/// Write `records` to `destination` on a sheet called `sheet_name`.
///
/// Returns [`ReportError::EmptyResult`] when there is nothing to write.
#[tracing::instrument(level = "info", skip(records), fields(records = records.len(), destination = %destination.display()))]
pub fn write_records(
    records: &[RawRecord],
    destination: &Path,
    sheet_name: &str,
) -> ReportResult<WriteSummary> {
    if records.is_empty() {
        return Err(ReportError::EmptyResult {
            context: format!("nothing to write to {}", destination.display()),
        });
    }

    let mut header: Vec<&str> = Vec::new();
    for rec in records {
        for name in rec.names() {
            if !header.contains(&name) {
                header.push(name);
            }
        }
    }

    let bold = Format::new().set_bold();
    let date_format = Format::new().set_num_format(EXCEL_DATE_FORMAT);
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name(sheet_name)?;

    for (col, name) in header.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, *name, &bold)?;
    }
    for (idx, rec) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, name) in header.iter().enumerate() {
            if let Some(value) = rec.get(name) {
                write_value(ws, row, col as u16, value, &date_format, &datetime_format)?;
            }
        }
    }

    save_workbook(&mut workbook, destination)?;
    info!(columns = header.len(), rows = records.len(), "records written");

    Ok(WriteSummary {
        destination: destination.to_path_buf(),
        columns: header.len(),
        rows: records.len(),
    })
}

fn write_value(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Value,
    date_format: &Format,
    datetime_format: &Format,
) -> ReportResult<()> {
    match value {
        Value::Null => {}
        Value::Int64(i) => {
            ws.write_number(row, col, *i as f64)?;
        }
        Value::Float64(f) => {
            ws.write_number(row, col, *f)?;
        }
        Value::Utf8(s) => {
            ws.write_string(row, col, s)?;
        }
        Value::Date(d) => {
            let serial = to_excel_serial(d.and_time(NaiveTime::MIN));
            ws.write_number_with_format(row, col, serial, date_format)?;
        }
        Value::DateTime(dt) => {
            ws.write_number_with_format(row, col, to_excel_serial(*dt), datetime_format)?;
        }
    }
    Ok(())
}
