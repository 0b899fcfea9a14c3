//! Spreadsheet output.
//!
//! - [`template`]: fill an existing SIAT template with mapped rows.
//! - [`writer`]: write arbitrary records under a header derived from their keys.
//! - [`naming`]: timestamped, collision-free output names.
//!
//! New workbooks are built in memory with `rust_xlsxwriter`; templates are edited in place in
//! memory with `umya-spreadsheet`. Both are persisted through [`persist_bytes`], which writes to a
//! temporary file next to the destination and renames it into place. A failed run leaves no
//! partial file behind.

pub mod naming;
pub mod template;
pub mod writer;

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_xlsxwriter::Workbook;
use tracing::{debug, info};

use crate::error::{ReportError, ReportResult};

pub use naming::{report_output_name, template_output_name, unique_path};
pub use template::{PopulateSummary, populate_template};
pub use writer::{WriteSummary, write_records};

/// Number format applied to date cells.
pub const EXCEL_DATE_FORMAT: &str = "dd/mm/yyyy";

/// Serialize `workbook` and move it to `destination`, creating parent directories as needed.
///
/// Never overwrites an existing file.
pub fn save_workbook(workbook: &mut Workbook, destination: &Path) -> ReportResult<()> {
    let buf = workbook.save_to_buffer()?;
    persist_bytes(&buf, destination)
}

/// Write `bytes` to a temporary file beside `destination`, then link it into place.
///
/// Parent directories are created as needed. Never overwrites an existing file, and leaves no
/// partial file behind on failure.
pub fn persist_bytes(bytes: &[u8], destination: &Path) -> ReportResult<()> {
    let dir = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        info!(dir = %dir.display(), "created output directory");
    }

    let mut tmp = tempfile::Builder::new()
        .prefix(".bancarizacion-")
        .suffix(".xlsx.part")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist_noclobber(destination)
        .map_err(|e| ReportError::Persist {
            path: destination.to_path_buf(),
            source: e.error,
        })?;
    debug!(path = %destination.display(), bytes = bytes.len(), "workbook saved");
    Ok(())
}

fn excel_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}

/// Excel serial number (1900 date system) for a timestamp.
pub fn to_excel_serial(dt: NaiveDateTime) -> f64 {
    let delta = dt - excel_epoch();
    delta.num_milliseconds() as f64 / 86_400_000.0
}

/// Timestamp for an Excel serial number (1900 date system).
pub fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let millis = (serial * 86_400_000.0).round() as i64;
    excel_epoch().checked_add_signed(chrono::Duration::milliseconds(millis))
}
