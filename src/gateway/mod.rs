//! Database gateway.
//!
//! A [`Connector`] hands out owned [`RecordSource`] sessions. Pipelines acquire one session, run a
//! single parameterized query through [`fetch_once`], and the session is released when it goes out
//! of scope, on success and on error alike.
//!
//! Implementations:
//! - [`mysql`] (feature `mysql`): live MySQL connections.
//! - [`memory`]: canned rows, for tests and dry runs.

pub mod memory;
#[cfg(feature = "mysql")]
pub mod mysql;

use tracing::{debug, info};

use crate::error::ReportResult;
use crate::types::{RawRecord, Value};

pub use memory::StaticConnector;
#[cfg(feature = "mysql")]
pub use mysql::{MySqlConnector, MySqlSession};

/// An open session able to run parameterized `SELECT` statements.
pub trait RecordSource {
    /// Run `query`, binding `params` positionally to its `?` placeholders, and return every row in
    /// result order.
    fn fetch(&mut self, query: &str, params: &[Value]) -> ReportResult<Vec<RawRecord>>;
}

/// Opens [`RecordSource`] sessions.
pub trait Connector {
    type Source: RecordSource;

    /// Open a new session. Dropping the returned value closes it.
    fn connect(&self) -> ReportResult<Self::Source>;

    /// Human-readable target, for logs. Must not contain credentials.
    fn describe(&self) -> String;
}

/// Acquire a session, run one query, release the session.
#[tracing::instrument(level = "info", skip_all, fields(db = %connector.describe()))]
pub fn fetch_once<C: Connector>(
    connector: &C,
    query: &str,
    params: &[Value],
) -> ReportResult<Vec<RawRecord>> {
    let mut source = connector.connect()?;
    debug!(params = ?params, "executing query");
    let rows = source.fetch(query, params)?;
    info!(rows = rows.len(), "fetched rows");
    Ok(rows)
}
