use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{Error, Result};

/// Canonical header of the time role in cleaned data and exports.
pub const TIME_COLUMN: &str = "time";
/// Canonical header of the value role in cleaned data and exports.
pub const VALUE_COLUMN: &str = "value";

// ---------------------------------------------------------------------------
// RawCell – a single untyped cell as read from the CSV
// ---------------------------------------------------------------------------

/// An untyped cell. CSV input only ever yields `Text` and `Missing`;
/// `Number` exists for tables built in memory by other callers.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Text(String),
    Number(f64),
    Missing,
}

impl RawCell {
    /// Build a cell from a CSV field: empty fields are missing.
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            RawCell::Missing
        } else {
            RawCell::Text(field.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, RawCell::Missing)
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        RawCell::from_field(s)
    }
}

impl From<f64> for RawCell {
    fn from(v: f64) -> Self {
        RawCell::Number(v)
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Text(s) => write!(f, "{s}"),
            RawCell::Number(v) => write!(f, "{v}"),
            RawCell::Missing => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – ordered named columns, all the same length
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: String,
    pub cells: Vec<RawCell>,
}

/// Unparsed tabular input. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    columns: Vec<RawColumn>,
    row_count: usize,
}

impl RawTable {
    /// Build a table, rejecting ragged columns.
    pub fn new(columns: Vec<RawColumn>) -> Result<Self> {
        let row_count = columns.first().map(|c| c.cells.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.cells.len() != row_count) {
            return Err(Error::MalformedCsv(format!(
                "column '{}' has {} cells, expected {row_count}",
                bad.name,
                bad.cells.len()
            )));
        }
        Ok(RawTable { columns, row_count })
    }

    /// Convenience constructor from a header and row-major cells.
    pub fn from_rows<H, R, C>(headers: H, rows: R) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<RawCell>,
    {
        let mut columns: Vec<RawColumn> = headers
            .into_iter()
            .map(|h| RawColumn {
                name: h.into(),
                cells: Vec::new(),
            })
            .collect();

        for (row_no, row) in rows.into_iter().enumerate() {
            let cells: Vec<RawCell> = row.into_iter().map(Into::into).collect();
            if cells.len() != columns.len() {
                return Err(Error::MalformedCsv(format!(
                    "row {row_no} has {} fields, expected {}",
                    cells.len(),
                    columns.len()
                )));
            }
            for (col, cell) in columns.iter_mut().zip(cells) {
                col.cells.push(cell);
            }
        }
        RawTable::new(columns)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    /// Position of a column by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&RawColumn> {
        self.position(name).map(|i| &self.columns[i])
    }

    /// Look up a column, failing with [`Error::ColumnNotFound`].
    pub fn require(&self, name: &str) -> Result<usize> {
        self.position(name).ok_or_else(|| Error::ColumnNotFound {
            column: name.to_string(),
            available: self.column_names(),
        })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

// ---------------------------------------------------------------------------
// ColumnSelection
// ---------------------------------------------------------------------------

/// Which raw columns play the time and value roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    pub time_column: Option<String>,
    pub value_column: String,
}

impl ColumnSelection {
    /// Label the UI shows for "no time column".
    pub const NO_TIME_COLUMN: &'static str = "(no time column)";

    pub fn new(time_column: Option<&str>, value_column: &str) -> Self {
        ColumnSelection {
            time_column: time_column.map(str::to_string),
            value_column: value_column.to_string(),
        }
    }

    /// Build from selector labels, mapping the sentinel to `None`.
    pub fn from_labels(time_label: &str, value_column: &str) -> Self {
        let time = (time_label != Self::NO_TIME_COLUMN).then_some(time_label);
        Self::new(time, value_column)
    }
}

// ---------------------------------------------------------------------------
// CleanedDataset
// ---------------------------------------------------------------------------

/// One surviving row: parsed value, optional parsed time, and the raw text of
/// the passthrough columns (in [`DatasetSchema::passthrough`] order).
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub time: Option<NaiveDateTime>,
    pub value: f64,
    pub passthrough: Vec<String>,
}

/// Column layout shared by a dataset and every view derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSchema {
    /// Original header of the time column, if one was selected.
    pub time_source: Option<String>,
    /// Original header of the value column.
    pub value_source: String,
    /// Headers of the remaining raw columns, in input order.
    pub passthrough: Vec<String>,
}

impl DatasetSchema {
    pub fn has_time(&self) -> bool {
        self.time_source.is_some()
    }

    /// Output header: canonical roles first, then passthrough columns with
    /// collisions against canonical names suffixed (`value.1`).
    pub fn export_headers(&self) -> Vec<String> {
        let mut headers = Vec::with_capacity(self.passthrough.len() + 2);
        if self.has_time() {
            headers.push(TIME_COLUMN.to_string());
        }
        headers.push(VALUE_COLUMN.to_string());
        for name in &self.passthrough {
            let mut candidate = name.clone();
            let mut n = 1;
            while headers.contains(&candidate) {
                candidate = format!("{name}.{n}");
                n += 1;
            }
            headers.push(candidate);
        }
        headers
    }
}

/// Why a raw row did not make it into a [`CleanedDataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    TimeParseFailure,
    ValueParseFailure,
}

/// Counters for rows silently dropped during cleaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub dropped_time: usize,
    pub dropped_value: usize,
    pub kept: usize,
}

impl CleaningReport {
    pub fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::TimeParseFailure => self.dropped_time += 1,
            DropReason::ValueParseFailure => self.dropped_value += 1,
        }
    }

    pub fn dropped(&self) -> usize {
        self.dropped_time + self.dropped_value
    }
}

/// Validated, time-ordered (when a time column exists) non-empty dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedDataset {
    schema: DatasetSchema,
    rows: Vec<Row>,
    report: CleaningReport,
}

impl CleanedDataset {
    /// Callers must uphold the invariants; only the normalizer builds these.
    pub(crate) fn new(schema: DatasetSchema, rows: Vec<Row>, report: CleaningReport) -> Self {
        debug_assert!(!rows.is_empty());
        CleanedDataset {
            schema,
            rows,
            report,
        }
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn report(&self) -> &CleaningReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false for a dataset built by the normalizer.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.value).collect()
    }

    pub fn min(&self) -> f64 {
        self.rows.iter().map(|r| r.value).fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| r.value)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Every value identical: range filtering is meaningless.
    pub fn is_degenerate(&self) -> bool {
        self.min() == self.max()
    }

    /// First and last timestamp, if a time column was selected.
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.rows.first()?.time?;
        let last = self.rows.last()?.time?;
        Some((first, last))
    }

    pub fn head(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_are_rejected() {
        let err = RawTable::from_rows(["a", "b"], vec![vec!["1", "2"], vec!["3"]]).unwrap_err();
        assert!(matches!(err, Error::MalformedCsv(_)));
    }

    #[test]
    fn empty_fields_become_missing() {
        let table = RawTable::from_rows(["a"], vec![vec![""], vec!["x"]]).unwrap();
        let col = table.column("a").unwrap();
        assert!(col.cells[0].is_missing());
        assert_eq!(col.cells[1], RawCell::Text("x".into()));
    }

    #[test]
    fn require_reports_missing_column() {
        let table = RawTable::from_rows(["Time", "temp"], Vec::<Vec<&str>>::new()).unwrap();
        assert_eq!(table.require("temp").unwrap(), 1);
        match table.require("rh") {
            Err(Error::ColumnNotFound { column, available }) => {
                assert_eq!(column, "rh");
                assert_eq!(available, vec!["Time", "temp"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn sentinel_label_means_no_time_column() {
        let sel = ColumnSelection::from_labels(ColumnSelection::NO_TIME_COLUMN, "temp");
        assert_eq!(sel.time_column, None);
        let sel = ColumnSelection::from_labels("Time", "temp");
        assert_eq!(sel.time_column.as_deref(), Some("Time"));
    }

    #[test]
    fn export_headers_suffix_collisions() {
        let schema = DatasetSchema {
            time_source: Some("Time".into()),
            value_source: "temp".into(),
            passthrough: vec!["value".into(), "site".into(), "time".into()],
        };
        assert_eq!(
            schema.export_headers(),
            vec!["time", "value", "value.1", "site", "time.1"]
        );
    }

    #[test]
    fn cleaning_report_serializes_its_counters() {
        let mut report = CleaningReport {
            input_rows: 4,
            kept: 1,
            ..Default::default()
        };
        report.record_drop(DropReason::TimeParseFailure);
        report.record_drop(DropReason::ValueParseFailure);
        report.record_drop(DropReason::ValueParseFailure);
        assert_eq!(
            serde_json::to_value(report).unwrap(),
            serde_json::json!({
                "input_rows": 4,
                "dropped_time": 1,
                "dropped_value": 2,
                "kept": 1
            })
        );
    }
}
