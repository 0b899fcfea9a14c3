//! `bancarizacion` builds the periodic bancarización compliance reports: proof that large
//! transactions were settled through banked channels.
//!
//! Three pipelines are provided (see [`pipeline`]):
//!
//! - **contratos**: contracts from MySQL, reshaped into the SIAT contracts template.
//! - **auxventas**: sales invoices and their bank payments, reshaped into the SIAT auxiliary
//!   sales template.
//! - **zipcontratos**: the scanned contracts report shipped as a zip, filtered down to pending
//!   contracts and written as a plain workbook.
//!
//! Each database pipeline is a straight line: query ([`gateway`]) → per-field rules
//! ([`mapping`]) → template fill ([`report`]) → file. The archive pipeline goes zip →
//! [`archive`] → [`report::write_records`].
//!
//! ## Mapping and filling a template without a database
//!
//! ```no_run
//! use std::path::Path;
//!
//! use bancarizacion::mapping::{map_records, ContractMapper, RowMapper};
//! use bancarizacion::report::populate_template;
//! use bancarizacion::types::{RawRecord, Value};
//!
//! # fn main() -> Result<(), bancarizacion::ReportError> {
//! let records = vec![RawRecord::from_pairs([
//!     ("tipo_contrato", Value::Int64(1)),
//!     ("nro_contrato", Value::from("CT-14")),
//! ])];
//! let rows = map_records(&ContractMapper, &records)?;
//! populate_template(
//!     &rows,
//!     Path::new("plantillas/Contratos.xlsx"),
//!     Path::new("salida/Contratos_SIAT.xlsx"),
//!     &ContractMapper.column_order(),
//!     None,
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: INI configuration (`[mysql]`, optional `[paths]`)
//! - [`gateway`]: database sessions and the in-memory stand-in
//! - [`mapping`]: report-specific row rules
//! - [`report`]: template population, generic writer, output names
//! - [`archive`]: zip extraction and status-marker filtering
//! - [`pipeline`]: named pipelines, outcomes, observers
//! - [`types`]: records, cells, column orders
//! - [`error`]: the shared error type

pub mod archive;
pub mod config;
pub mod error;
pub mod gateway;
pub mod mapping;
pub mod pipeline;
pub mod report;
pub mod types;

pub use error::{ReportError, ReportResult};
