//! Row selection by embedded status markers.
//!
//! Contract reports exported from the scanning system repeat their sub-report header mid-sheet and
//! tag each data row with a status cell. A row survives when:
//!
//! 1. no cell equals the header marker, and
//! 2. its status is the pending marker and not the concluded marker.
//!
//! Cells are compared after trimming. When [`ArchiveFilter::status_column`] names a column present
//! in the row, status markers are looked up in that column only; otherwise every cell of the row
//! is scanned.

use crate::types::{RawRecord, Value};

pub const HEADER_MARKER: &str = "NRO CONTRATO/ACUERDO :";
pub const PENDING_MARKER: &str = "ESTADO CONTRATO= PENDIENTE";
pub const CONCLUDED_MARKER: &str = "ESTADO CONTRATO=CONCLUIDO";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFilter {
    pub header_marker: String,
    pub pending_marker: String,
    pub concluded_marker: String,
    pub status_column: Option<String>,
}

impl Default for ArchiveFilter {
    fn default() -> Self {
        Self {
            header_marker: HEADER_MARKER.to_string(),
            pending_marker: PENDING_MARKER.to_string(),
            concluded_marker: CONCLUDED_MARKER.to_string(),
            status_column: None,
        }
    }
}

impl ArchiveFilter {
    /// Look status markers up in `column` when the row has it.
    pub fn with_status_column(mut self, column: impl Into<String>) -> Self {
        self.status_column = Some(column.into());
        self
    }

    /// Returns `true` if `record` is a pending data row.
    pub fn keep(&self, record: &RawRecord) -> bool {
        if row_has(record.values(), &self.header_marker) {
            return false;
        }
        match self.status_column.as_deref().and_then(|c| record.get(c)) {
            Some(status) => {
                cell_is(status, &self.pending_marker) && !cell_is(status, &self.concluded_marker)
            }
            None => {
                row_has(record.values(), &self.pending_marker)
                    && !row_has(record.values(), &self.concluded_marker)
            }
        }
    }

    /// Keep the pending data rows, in order.
    pub fn apply(&self, records: Vec<RawRecord>) -> Vec<RawRecord> {
        records.into_iter().filter(|r| self.keep(r)).collect()
    }
}

fn cell_is(value: &Value, marker: &str) -> bool {
    match value {
        Value::Utf8(s) => s.trim() == marker,
        _ => false,
    }
}

fn row_has<'a>(mut values: impl Iterator<Item = &'a Value>, marker: &str) -> bool {
    values.any(|v| cell_is(v, marker))
}
