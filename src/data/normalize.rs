use super::coerce::{to_timestamp, to_value};
use super::model::{
    CleanedDataset, CleaningReport, ColumnSelection, DatasetSchema, DropReason, RawTable, Row,
};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Dataset normalizer
// ---------------------------------------------------------------------------

/// Coerce the selected columns of `raw` into a [`CleanedDataset`].
///
/// Rows whose time (when selected) or value cannot be parsed are dropped and
/// counted, never reported as errors. With a time column the result is sorted
/// by time (stable, so ties keep input order); without one, input order is
/// kept. An empty result is [`Error::EmptyAfterCleaning`].
pub fn normalize(raw: &RawTable, selection: &ColumnSelection) -> Result<CleanedDataset> {
    log::debug!(
        "Normalizing {} rows: time={:?} value={:?}",
        raw.row_count(),
        selection.time_column,
        selection.value_column
    );

    let value_idx = raw.require(&selection.value_column)?;
    let time_idx = selection
        .time_column
        .as_deref()
        .map(|name| raw.require(name))
        .transpose()?;

    let columns = raw.columns();
    let passthrough_idx: Vec<usize> = (0..columns.len())
        .filter(|&i| i != value_idx && Some(i) != time_idx)
        .collect();

    let schema = DatasetSchema {
        time_source: time_idx.map(|i| columns[i].name.clone()),
        value_source: columns[value_idx].name.clone(),
        passthrough: passthrough_idx
            .iter()
            .map(|&i| columns[i].name.clone())
            .collect(),
    };

    let mut report = CleaningReport {
        input_rows: raw.row_count(),
        ..CleaningReport::default()
    };
    let mut rows = Vec::with_capacity(raw.row_count());

    for row_idx in 0..raw.row_count() {
        let time = match time_idx {
            Some(ti) => match to_timestamp(&columns[ti].cells[row_idx]) {
                Some(t) => Some(t),
                None => {
                    report.record_drop(DropReason::TimeParseFailure);
                    continue;
                }
            },
            None => None,
        };

        let Some(value) = to_value(&columns[value_idx].cells[row_idx]) else {
            report.record_drop(DropReason::ValueParseFailure);
            continue;
        };

        let passthrough = passthrough_idx
            .iter()
            .map(|&i| columns[i].cells[row_idx].to_string())
            .collect();

        rows.push(Row {
            time,
            value,
            passthrough,
        });
    }

    if time_idx.is_some() {
        // `sort_by_key` is stable.
        rows.sort_by_key(|r| r.time);
    }

    report.kept = rows.len();

    if report.dropped() > 0 {
        log::warn!(
            "Dropped {} of {} rows ({} invalid time, {} non-numeric value)",
            report.dropped(),
            report.input_rows,
            report.dropped_time,
            report.dropped_value
        );
    }

    if rows.is_empty() {
        return Err(Error::EmptyAfterCleaning {
            input_rows: report.input_rows,
            dropped_time: report.dropped_time,
            dropped_value: report.dropped_value,
        });
    }

    log::info!(
        "Normalized '{}': {} rows kept",
        schema.value_source,
        report.kept
    );
    log::debug!(
        "Cleaning report: {}",
        serde_json::to_string(&report).unwrap_or_default()
    );

    Ok(CleanedDataset::new(schema, rows, report))
}
