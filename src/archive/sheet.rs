//! Sheet → [`RawRecord`] conversion.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use tracing::debug;

use crate::error::{ReportError, ReportResult};
use crate::report::from_excel_serial;
use crate::types::{RawRecord, Value};

/// Read `sheet` (or the first sheet) of the workbook at `path` into records.
///
/// - The first non-empty row is the header row; blank header cells become `COLUMNA_<n>`, where
///   `n` is the 1-based sheet column (`A` = 1), wherever the used range starts.
/// - Fully empty rows are skipped.
pub fn read_sheet_records(path: &Path, sheet: Option<&str>) -> ReportResult<Vec<RawRecord>> {
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_vec();
    let name = match sheet {
        Some(s) if names.iter().any(|n| n == s) => s.to_string(),
        Some(s) => {
            return Err(ReportError::SheetNotFound {
                path: path.to_path_buf(),
                sheet: s.to_string(),
                available: names,
            });
        }
        None => names.first().cloned().ok_or_else(|| ReportError::SchemaMismatch {
            message: format!("workbook {} has no sheets", path.display()),
        })?,
    };

    let range = workbook.worksheet_range(&name)?;
    let records = range_to_records(&range);
    debug!(sheet = %name, records = records.len(), "sheet parsed");
    Ok(records)
}

fn range_to_records(range: &Range<Data>) -> Vec<RawRecord> {
    let mut rows = range
        .rows()
        .filter(|row| row.iter().any(|c| !is_blank(c)));

    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let width = range.width();
    let first_col = range.start().map_or(0, |(_, col)| col as usize);
    let header: Vec<String> = (0..width)
        .map(|idx| {
            let label = header_row
                .get(idx)
                .map(cell_to_header_string)
                .unwrap_or_default();
            let label = label.trim();
            if label.is_empty() {
                format!("COLUMNA_{}", first_col + idx + 1)
            } else {
                label.to_string()
            }
        })
        .collect();
    let header = dedupe(header);

    rows.map(|row| {
        let mut rec = RawRecord::new();
        for (idx, name) in header.iter().enumerate() {
            let value = row.get(idx).map(cell_to_value).unwrap_or(Value::Null);
            rec.insert(name.as_str(), value);
        }
        rec
    })
    .collect()
}

// Repeated header labels would collapse into one record key.
fn dedupe(header: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(header.len());
    for (idx, name) in header.into_iter().enumerate() {
        if out.contains(&name) {
            out.push(format!("{name}_{}", idx + 1));
        } else {
            out.push(name);
        }
    }
    out
}

fn is_blank(c: &Data) -> bool {
    match c {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_to_value(c: &Data) -> Value {
    match c {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Utf8(if *b { "VERDADERO" } else { "FALSO" }.to_string()),
        Data::DateTime(dt) => match from_excel_serial(dt.as_f64()) {
            Some(ts) if ts.time() == chrono::NaiveTime::MIN => Value::Date(ts.date()),
            Some(ts) => Value::DateTime(ts),
            None => Value::Float64(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Utf8(s.clone()),
    }
}
