//! In-memory [`Connector`] returning canned rows.

use std::sync::{Arc, Mutex};

use crate::error::ReportResult;
use crate::types::{RawRecord, Value};

use super::{Connector, RecordSource};

/// A query issued against a [`StaticConnector`].
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedQuery {
    pub query: String,
    pub params: Vec<Value>,
}

/// Serves fixed rows for queries containing a given fragment (usually the table name).
///
/// Queries matching no fragment return no rows.
#[derive(Debug, Clone, Default)]
pub struct StaticConnector {
    tables: Vec<(String, Vec<RawRecord>)>,
    issued: Arc<Mutex<Vec<IssuedQuery>>>,
    open_sessions: Arc<Mutex<usize>>,
}

impl StaticConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `rows` for every query containing `fragment`.
    pub fn with_rows(mut self, fragment: impl Into<String>, rows: Vec<RawRecord>) -> Self {
        self.tables.push((fragment.into(), rows));
        self
    }

    /// Every query issued so far, in order.
    pub fn issued(&self) -> Vec<IssuedQuery> {
        self.issued.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Number of sessions currently open.
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.lock().map(|g| *g).unwrap_or_default()
    }
}

impl Connector for StaticConnector {
    type Source = StaticSession;

    fn connect(&self) -> ReportResult<StaticSession> {
        if let Ok(mut open) = self.open_sessions.lock() {
            *open += 1;
        }
        Ok(StaticSession {
            tables: self.tables.clone(),
            issued: Arc::clone(&self.issued),
            open_sessions: Arc::clone(&self.open_sessions),
        })
    }

    fn describe(&self) -> String {
        format!("memory ({} tables)", self.tables.len())
    }
}

/// Session handed out by [`StaticConnector`].
#[derive(Debug)]
pub struct StaticSession {
    tables: Vec<(String, Vec<RawRecord>)>,
    issued: Arc<Mutex<Vec<IssuedQuery>>>,
    open_sessions: Arc<Mutex<usize>>,
}

impl RecordSource for StaticSession {
    fn fetch(&mut self, query: &str, params: &[Value]) -> ReportResult<Vec<RawRecord>> {
        if let Ok(mut issued) = self.issued.lock() {
            issued.push(IssuedQuery {
                query: query.to_string(),
                params: params.to_vec(),
            });
        }
        Ok(self
            .tables
            .iter()
            .find(|(fragment, _)| query.contains(fragment.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }
}

impl Drop for StaticSession {
    fn drop(&mut self) {
        if let Ok(mut open) = self.open_sessions.lock() {
            *open = open.saturating_sub(1);
        }
    }
}
