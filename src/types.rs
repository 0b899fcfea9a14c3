//! Core data model types.
//!
//! Records flow through a pipeline as [`RawRecord`]s (source column → [`Value`]) and leave it as
//! [`MappedRow`]s (report column → [`Cell`]), flattened by a [`ColumnOrder`].

use chrono::{NaiveDate, NaiveDateTime};

/// A single scalar read from the database or from a sheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
    /// Calendar date without time.
    Date(NaiveDate),
    /// Date and time without zone.
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Utf8(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the value.
    ///
    /// Decimal columns arrive as text from the driver, so numeric strings are parsed too.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(i) => Some(*i as f64),
            Value::Float64(f) => Some(*f),
            Value::Utf8(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Integer view of the value. Floats with a fractional part are rejected.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(i) => Some(*i),
            Value::Float64(f) if f.fract() == 0.0 => Some(*f as i64),
            Value::Utf8(s) => {
                let t = s.trim();
                t.parse::<i64>()
                    .ok()
                    .or_else(|| t.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            }
            _ => None,
        }
    }

    /// Date view of the value. ISO-formatted strings (`YYYY-MM-DD`, optionally followed by a time)
    /// are accepted.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::DateTime(dt) => Some(dt.date()),
            Value::Utf8(s) => {
                let t = s.trim();
                let head = t.get(..10).unwrap_or(t);
                NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
            }
            _ => None,
        }
    }

    /// Text view used for marker matching and free-text columns.
    ///
    /// Returns `None` for [`Value::Null`].
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Utf8(s) => Some(s.clone()),
            Value::Int64(i) => Some(i.to_string()),
            Value::Float64(f) => {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    Some((*f as i64).to_string())
                } else {
                    Some(f.to_string())
                }
            }
            Value::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Value::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Utf8(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Utf8(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int64(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float64(f)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

/// One source row: an ordered mapping from column name to [`Value`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, Value)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(name, value)` pairs, keeping their order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut rec = Self::new();
        for (k, v) in pairs {
            rec.insert(k, v);
        }
        rec
    }

    /// Insert or replace a field. A new name is appended at the end.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Returns `true` if `name` is present with a non-null value.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_null())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A formatted report cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Nothing is written for this column.
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() { Cell::Empty } else { Cell::Text(s) }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Number(f)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Number(i as f64)
    }
}

/// One report row: an ordered mapping from target column name to [`Cell`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedRow {
    cells: Vec<(String, Cell)>,
}

impl MappedRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a cell. A new column is appended at the end.
    pub fn insert(&mut self, column: impl Into<String>, cell: impl Into<Cell>) {
        let column = column.into();
        let cell = cell.into();
        match self.cells.iter_mut().find(|(k, _)| *k == column) {
            Some(slot) => slot.1 = cell,
            None => self.cells.push((column, cell)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.iter().find(|(k, _)| k == column).map(|(_, c)| c)
    }

    /// Flatten the row in `order`, using [`Cell::Empty`] for absent columns.
    pub fn flatten<'a>(&'a self, order: &'a ColumnOrder) -> impl Iterator<Item = &'a Cell> + 'a {
        const EMPTY: &Cell = &Cell::Empty;
        order.names().map(move |name| self.get(name).unwrap_or(EMPTY))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Immutable ordered list of report column names.
///
/// Positions are implicit: the `n`-th name is written to the `n`-th spreadsheet column. Template
/// headers are never read back to check them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnOrder {
    columns: &'static [&'static str],
}

impl ColumnOrder {
    pub const fn new(columns: &'static [&'static str]) -> Self {
        Self { columns }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        let columns: &'static [&'static str] = self.columns;
        columns.iter().copied()
    }

    /// Returns the 0-based position of a column, if present.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_coerce() {
        assert_eq!(Value::from("1500.50").as_f64(), Some(1500.5));
        assert_eq!(Value::from(" 2 ").as_i64(), Some(2));
        assert_eq!(Value::from("2.0").as_i64(), Some(2));
        assert_eq!(Value::Float64(2.5).as_i64(), None);
        assert_eq!(Value::from("abc").as_f64(), None);
    }

    #[test]
    fn iso_strings_parse_as_dates() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(Value::from("2025-03-15").as_date(), Some(d));
        assert_eq!(Value::from("2025-03-15 10:20:00").as_date(), Some(d));
        assert_eq!(Value::from("15/03/2025").as_date(), None);
    }

    #[test]
    fn record_insert_replaces_in_place() {
        let mut rec = RawRecord::from_pairs([("a", Value::Int64(1)), ("b", Value::Int64(2))]);
        rec.insert("a", 9i64);
        assert_eq!(rec.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(rec.get("a"), Some(&Value::Int64(9)));
        assert!(!rec.has("missing"));
    }

    #[test]
    fn blank_text_counts_as_null() {
        let rec = RawRecord::from_pairs([("a", "   ")]);
        assert!(!rec.has("a"));
    }

    #[test]
    fn flatten_fills_absent_columns() {
        const ORDER: ColumnOrder = ColumnOrder::new(&["x", "y", "z"]);
        let mut row = MappedRow::new();
        row.insert("z", 3i64);
        row.insert("x", Cell::text("a"));
        let flat: Vec<&Cell> = row.flatten(&ORDER).collect();
        assert_eq!(
            flat,
            vec![&Cell::Text("a".to_string()), &Cell::Empty, &Cell::Number(3.0)]
        );
    }
}
