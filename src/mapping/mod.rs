//! Row mapping: one [`RawRecord`] in, one [`MappedRow`] out.
//!
//! Each report type implements [`RowMapper`]. Mapping a single row never fails; missing source
//! fields fall back to per-column defaults (see [`fields`]). [`map_records`] adds the batch-level
//! rules:
//!
//! - `N°` is the 1-based position of the record in the batch.
//! - A record that carries **none** of the mapper's source fields is rejected with
//!   [`ReportError::SchemaMismatch`]; it almost certainly came from the wrong query.
//! - Records missing only some fields are mapped with defaults, and the missing fields are logged
//!   once per batch.
//!
//! ```rust
//! use bancarizacion::mapping::{map_records, ContractMapper};
//! use bancarizacion::mapping::contracts::{column, source};
//! use bancarizacion::types::{Cell, RawRecord, Value};
//!
//! let records = vec![
//!     RawRecord::from_pairs([(source::CONTRACT_TYPE, Value::Int64(2)), (source::CONTRACT_NUMBER, Value::from("C-1"))]),
//!     RawRecord::from_pairs([(source::CONTRACT_TYPE, Value::Int64(1)), (source::CONTRACT_NUMBER, Value::from("C-2"))]),
//! ];
//! let rows = map_records(&ContractMapper, &records).unwrap();
//! assert_eq!(rows[0].get(column::CONTRACT_NUMBER), Some(&Cell::Empty));
//! assert_eq!(rows[1].get(column::NUMBER), Some(&Cell::Number(2.0)));
//! ```

pub mod contracts;
pub mod fields;
pub mod sales;

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::{ReportError, ReportResult};
use crate::types::{ColumnOrder, MappedRow, RawRecord};

pub use contracts::ContractMapper;
pub use sales::SalesMapper;

/// Synthetic sequence column shared by every report.
pub const NUMBER_COLUMN: &str = "N°";

/// Business rules for one report type.
pub trait RowMapper {
    /// Short report name, used in logs and output file names.
    fn name(&self) -> &'static str;

    /// Report columns, in template order.
    fn column_order(&self) -> ColumnOrder;

    /// Source fields the mapper reads.
    fn source_fields(&self) -> &'static [&'static str];

    /// Map one record. `position` is 1-based.
    ///
    /// The returned row holds every column of [`Self::column_order`].
    fn map_row(&self, position: usize, record: &RawRecord) -> MappedRow;
}

/// Map a batch of records, numbering rows from 1 in input order.
pub fn map_records<M>(mapper: &M, records: &[RawRecord]) -> ReportResult<Vec<MappedRow>>
where
    M: RowMapper + ?Sized,
{
    check_shape(mapper, records)?;
    let rows: Vec<MappedRow> = records
        .iter()
        .enumerate()
        .map(|(idx, rec)| mapper.map_row(idx + 1, rec))
        .collect();
    debug!(report = mapper.name(), rows = rows.len(), "mapped records");
    Ok(rows)
}

fn check_shape<M>(mapper: &M, records: &[RawRecord]) -> ReportResult<()>
where
    M: RowMapper + ?Sized,
{
    let expected = mapper.source_fields();
    let mut missing: BTreeSet<&str> = BTreeSet::new();

    for (idx, rec) in records.iter().enumerate() {
        let absent: Vec<&str> = expected
            .iter()
            .copied()
            .filter(|f| rec.get(f).is_none())
            .collect();
        if absent.len() == expected.len() {
            return Err(ReportError::SchemaMismatch {
                message: format!(
                    "{} record {} has none of the expected fields {:?}; got {:?}",
                    mapper.name(),
                    idx + 1,
                    expected,
                    rec.names().collect::<Vec<_>>()
                ),
            });
        }
        missing.extend(absent);
    }

    if !missing.is_empty() {
        warn!(
            report = mapper.name(),
            missing = ?missing,
            "source rows lack some fields; defaults applied"
        );
    }
    Ok(())
}
