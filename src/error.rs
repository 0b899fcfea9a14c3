use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Error type returned by every stage of a report pipeline.
///
/// Stages propagate this with `?`; containment happens once, at the pipeline boundary
/// (see [`crate::pipeline::Runner`]).
#[derive(Debug, Error)]
pub enum ReportError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A workbook could not be opened or a sheet could not be read.
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// A workbook could not be built or serialized.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The input archive is not a readable zip file.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[cfg(feature = "mysql")]
    /// Connection or query failure (feature-gated behind `mysql`).
    #[error("database error: {0}")]
    Database(#[from] mysql::Error),

    /// Missing configuration file, section, key, or an invalid value.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// The records handed to a stage do not look like the shape it expects.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A template workbook could not be loaded or serialized again.
    #[error("template error in {path}: {message}")]
    Template { path: PathBuf, message: String },

    /// The requested sheet does not exist in the workbook.
    #[error("sheet '{sheet}' not found in {path} (available: {available:?})")]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: Vec<String>,
    },

    /// The archive holds no spreadsheet we can use.
    #[error("no spreadsheet entry in archive {path} (wanted '{wanted}' or any .xlsx)")]
    ArchiveEntryNotFound { path: PathBuf, wanted: String },

    /// A query or filter produced no rows.
    #[error("no records: {context}")]
    EmptyResult { context: String },

    /// The finished workbook could not be moved into its destination.
    #[error("failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
