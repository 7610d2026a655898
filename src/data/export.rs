use chrono::{NaiveDate, NaiveDateTime, Timelike};

use super::filter::FilteredView;
use crate::error::{Error, Result};

/// MIME type for exported files.
pub const CSV_MIME: &str = "text/csv";

/// Serialize a view to UTF-8 CSV: `time` (if present), `value`, then the
/// passthrough columns. Re-parsing the output with
/// `ColumnSelection::new(Some("time"), "value")` reproduces the rows.
pub fn export_csv(view: &FilteredView) -> Result<Vec<u8>> {
    let schema = view.schema();
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(schema.export_headers())?;

    let mut record: Vec<String> = Vec::with_capacity(schema.passthrough.len() + 2);
    for row in view.rows() {
        record.clear();
        if schema.has_time() {
            record.push(row.time.map(format_timestamp).unwrap_or_default());
        }
        record.push(row.value.to_string());
        record.extend(row.passthrough.iter().cloned());
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    log::debug!(
        "Exported {} rows ({} bytes)",
        view.filtered_count(),
        bytes.len()
    );
    Ok(bytes)
}

/// `YYYY-MM-DD HH:MM:SS`, with fractional seconds only when present.
pub fn format_timestamp(t: NaiveDateTime) -> String {
    if t.nanosecond() == 0 {
        t.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        t.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    }
}

/// `<prefix>_<valueColumn>_<YYYYMMDD>.csv`, with path separators in the
/// column name replaced so the result is a single file name.
pub fn export_file_name(prefix: &str, value_column: &str, date: NaiveDate) -> String {
    let column: String = value_column
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{prefix}_{column}_{}.csv", date.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter_range;
    use crate::data::loader::parse_csv;
    use crate::data::model::ColumnSelection;
    use crate::data::normalize::normalize;

    #[test]
    fn writes_canonical_header_and_passthrough() {
        let raw = parse_csv(b"site,Time,temp\nA,2024-01-02,2.5\nB,2024-01-01,1\nC,2024-01-03,9\n")
            .unwrap();
        let ds = normalize(&raw, &ColumnSelection::new(Some("Time"), "temp")).unwrap();
        let view = filter_range(&ds, 0.0, 5.0).unwrap();
        let text = String::from_utf8(export_csv(&view).unwrap()).unwrap();
        assert_eq!(
            text,
            "time,value,site\n2024-01-01 00:00:00,1,B\n2024-01-02 00:00:00,2.5,A\n"
        );
    }

    #[test]
    fn without_time_there_is_no_time_column() {
        let raw = parse_csv(b"v,note\n1,\"a,b\"\n").unwrap();
        let ds = normalize(&raw, &ColumnSelection::new(None, "v")).unwrap();
        let view = filter_range(&ds, 0.0, 1.0).unwrap();
        let text = String::from_utf8(export_csv(&view).unwrap()).unwrap();
        assert_eq!(text, "value,note\n1,\"a,b\"\n");
    }

    #[test]
    fn file_name_pattern() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 7).unwrap();
        assert_eq!(
            export_file_name("datos_filtrados", "PM2.5", date),
            "datos_filtrados_PM2.5_20240507.csv"
        );
        assert_eq!(
            export_file_name("out", "a/b", date),
            "out_a_b_20240507.csv"
        );
    }

    #[test]
    fn fractional_seconds_only_when_present() {
        let t = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_milli_opt(8, 0, 0, 250)
            .unwrap();
        assert_eq!(format_timestamp(t), "2024-01-01 08:00:00.250");
    }
}
