//! MySQL sessions via the `mysql` driver.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Params, Row, Value as SqlValue};
use tracing::{debug, info};

use crate::config::DbConfig;
use crate::error::ReportResult;
use crate::types::{RawRecord, Value};

use super::{Connector, RecordSource};

/// Opens MySQL connections from a [`DbConfig`].
#[derive(Debug, Clone)]
pub struct MySqlConnector {
    config: DbConfig,
}

impl MySqlConnector {
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }

    /// Open a session directly, without going through the [`Connector`] trait.
    pub fn open(&self) -> ReportResult<MySqlSession> {
        self.connect()
    }
}

impl Connector for MySqlConnector {
    type Source = MySqlSession;

    fn connect(&self) -> ReportResult<MySqlSession> {
        let c = &self.config;
        info!(
            host = %c.host,
            port = c.port,
            user = %c.user,
            database = %c.database,
            "connecting to mysql"
        );
        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(c.host.clone()))
            .tcp_port(c.port)
            .user(Some(c.user.clone()))
            .pass(Some(c.password.clone()))
            .db_name(Some(c.database.clone()));
        let conn = Conn::new(opts)?;
        Ok(MySqlSession {
            conn,
            database: c.database.clone(),
        })
    }

    fn describe(&self) -> String {
        format!(
            "mysql://{}@{}:{}/{}",
            self.config.user, self.config.host, self.config.port, self.config.database
        )
    }
}

/// An open MySQL connection. Closed on drop.
pub struct MySqlSession {
    conn: Conn,
    database: String,
}

impl MySqlSession {
    /// `(major, minor, patch)` reported by the server.
    pub fn server_version(&self) -> (u16, u16, u16) {
        self.conn.server_version()
    }

    /// Result of `SELECT DATABASE()`.
    pub fn current_database(&mut self) -> ReportResult<Option<String>> {
        let db: Option<Option<String>> = self.conn.query_first("SELECT DATABASE()")?;
        Ok(db.flatten())
    }

    /// Result of `SHOW TABLES`.
    pub fn tables(&mut self) -> ReportResult<Vec<String>> {
        Ok(self.conn.query("SHOW TABLES")?)
    }
}

impl RecordSource for MySqlSession {
    fn fetch(&mut self, query: &str, params: &[Value]) -> ReportResult<Vec<RawRecord>> {
        let params = if params.is_empty() {
            Params::Empty
        } else {
            Params::Positional(params.iter().map(to_sql).collect())
        };
        let rows: Vec<Row> = self.conn.exec(query, params)?;
        Ok(rows.iter().map(row_to_record).collect())
    }
}

impl Drop for MySqlSession {
    fn drop(&mut self) {
        debug!(database = %self.database, "mysql connection closed");
    }
}

fn row_to_record(row: &Row) -> RawRecord {
    let mut rec = RawRecord::new();
    for (idx, column) in row.columns_ref().iter().enumerate() {
        let value = row.as_ref(idx).map(from_sql).unwrap_or(Value::Null);
        rec.insert(column.name_str().into_owned(), value);
    }
    rec
}

fn from_sql(v: &SqlValue) -> Value {
    match v {
        SqlValue::NULL => Value::Null,
        SqlValue::Bytes(b) => Value::Utf8(String::from_utf8_lossy(b).into_owned()),
        SqlValue::Int(i) => Value::Int64(*i),
        SqlValue::UInt(u) => i64::try_from(*u)
            .map(Value::Int64)
            .unwrap_or(Value::Float64(*u as f64)),
        SqlValue::Float(f) => Value::Float64(f64::from(*f)),
        SqlValue::Double(d) => Value::Float64(*d),
        SqlValue::Date(y, mo, d, h, mi, s, us) => {
            // `0000-00-00` and other invalid dates come back as NULL.
            let Some(date) = NaiveDate::from_ymd_opt(i32::from(*y), u32::from(*mo), u32::from(*d))
            else {
                return Value::Null;
            };
            if (*h, *mi, *s, *us) == (0, 0, 0, 0) {
                Value::Date(date)
            } else {
                date.and_hms_micro_opt(u32::from(*h), u32::from(*mi), u32::from(*s), *us)
                    .map(Value::DateTime)
                    .unwrap_or(Value::Date(date))
            }
        }
        SqlValue::Time(neg, days, h, mi, s, _) => {
            let hours = u64::from(*days) * 24 + u64::from(*h);
            let sign = if *neg { "-" } else { "" };
            Value::Utf8(format!("{sign}{hours:02}:{mi:02}:{s:02}"))
        }
    }
}

fn to_sql(v: &Value) -> SqlValue {
    match v {
        Value::Null => SqlValue::NULL,
        Value::Int64(i) => SqlValue::Int(*i),
        Value::Float64(f) => SqlValue::Double(*f),
        Value::Utf8(s) => SqlValue::Bytes(s.as_bytes().to_vec()),
        Value::Date(d) => date_to_sql(d.and_time(chrono::NaiveTime::MIN)),
        Value::DateTime(dt) => date_to_sql(*dt),
    }
}

fn date_to_sql(dt: NaiveDateTime) -> SqlValue {
    SqlValue::Date(
        u16::try_from(dt.year()).unwrap_or(0),
        dt.month() as u8,
        dt.day() as u8,
        dt.hour() as u8,
        dt.minute() as u8,
        dt.second() as u8,
        dt.nanosecond() / 1_000,
    )
}
