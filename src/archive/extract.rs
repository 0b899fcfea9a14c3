//! Zip extraction into a scoped temporary directory.

use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::{ReportError, ReportResult};

/// An archive unpacked into a temporary directory.
///
/// The directory and everything in it is removed when this value is dropped.
#[derive(Debug)]
pub struct ExtractedArchive {
    dir: TempDir,
}

impl ExtractedArchive {
    /// Unpack `archive` into a fresh temporary directory under the system temp dir.
    pub fn unpack(archive: &Path) -> ReportResult<Self> {
        Self::unpack_into(archive, None)
    }

    /// Unpack `archive` into a fresh temporary directory created inside `parent`.
    pub fn unpack_in(archive: &Path, parent: &Path) -> ReportResult<Self> {
        Self::unpack_into(archive, Some(parent))
    }

    fn unpack_into(archive: &Path, parent: Option<&Path>) -> ReportResult<Self> {
        let file = File::open(archive)?;
        let mut zip = ZipArchive::new(file)?;
        let mut builder = tempfile::Builder::new();
        builder.prefix("bancarizacion-zip-");
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent)?,
            None => builder.tempdir()?,
        };
        zip.extract(dir.path())?;
        info!(
            archive = %archive.display(),
            entries = zip.len(),
            dir = %dir.path().display(),
            "archive extracted"
        );
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Find the spreadsheet named `wanted` (case-insensitive), or else the first `.xlsx` in
    /// path order. Office lock files (`~$…`) and `__MACOSX` metadata are ignored.
    pub fn find_spreadsheet(&self, wanted: &str) -> Option<PathBuf> {
        let mut candidates: Vec<PathBuf> = WalkDir::new(self.path())
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| !e.path().components().any(|c| c.as_os_str() == "__MACOSX"))
            .map(|e| e.into_path())
            .filter(|p| is_spreadsheet(p))
            .collect();
        debug!(candidates = ?candidates, "spreadsheets in archive");

        let exact = candidates.iter().position(|p| {
            p.file_name()
                .is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case(wanted))
        });
        match exact {
            Some(idx) => Some(candidates.swap_remove(idx)),
            None => candidates.into_iter().next(),
        }
    }

    /// Like [`Self::find_spreadsheet`], but missing is an error.
    pub fn require_spreadsheet(&self, archive: &Path, wanted: &str) -> ReportResult<PathBuf> {
        self.find_spreadsheet(wanted)
            .ok_or_else(|| ReportError::ArchiveEntryNotFound {
                path: archive.to_path_buf(),
                wanted: wanted.to_string(),
            })
    }
}

fn is_spreadsheet(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    !name.starts_with("~$") && name.to_ascii_lowercase().ends_with(".xlsx")
}
