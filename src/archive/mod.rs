//! Contract archive extraction.
//!
//! [`extract_pending_contracts`] unpacks a zip into a temporary directory, locates the contracts
//! workbook, reads one sheet into [`RawRecord`]s and keeps the pending data rows (see
//! [`filter`]). The temporary directory is removed when the function returns, whatever the
//! outcome.

pub mod extract;
pub mod filter;
pub mod sheet;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ReportResult;
use crate::types::RawRecord;

pub use extract::ExtractedArchive;
pub use filter::ArchiveFilter;
pub use sheet::read_sheet_records;

/// Spreadsheet expected inside the contracts archive.
pub const CONTRACTS_WORKBOOK: &str = "Contratos.xlsx";

/// Where to look inside the archive and how to filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    /// Preferred spreadsheet name; any `.xlsx` is used when absent.
    pub workbook: String,
    /// Sheet to read; `None` reads the first sheet.
    pub sheet: Option<String>,
    pub filter: ArchiveFilter,
    /// Where the temporary extraction directory is created; `None` uses the system temp dir.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for ArchiveRequest {
    fn default() -> Self {
        Self {
            workbook: CONTRACTS_WORKBOOK.to_string(),
            sheet: None,
            filter: ArchiveFilter::default(),
            scratch_dir: None,
        }
    }
}

/// Extract, parse and filter the contracts archive at `archive`.
#[tracing::instrument(level = "info", skip(request), fields(archive = %archive.display()))]
pub fn extract_pending_contracts(
    archive: &Path,
    request: &ArchiveRequest,
) -> ReportResult<Vec<RawRecord>> {
    let extracted = match &request.scratch_dir {
        Some(parent) => ExtractedArchive::unpack_in(archive, parent)?,
        None => ExtractedArchive::unpack(archive)?,
    };
    let workbook = extracted.require_spreadsheet(archive, &request.workbook)?;
    let records = read_sheet_records(&workbook, request.sheet.as_deref())?;
    let total = records.len();
    let kept = request.filter.apply(records);
    info!(
        workbook = %workbook.display(),
        total,
        kept = kept.len(),
        "archive rows filtered"
    );
    Ok(kept)
}
