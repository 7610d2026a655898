use std::collections::HashSet;
use std::path::Path;

use super::model::{RawCell, RawColumn, RawTable};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read and parse a CSV file from disk.
pub fn load_file(path: &Path) -> Result<RawTable> {
    let bytes = std::fs::read(path)?;
    let table = parse_csv(&bytes)?;
    log::debug!(
        "Parsed {} ({} rows x {} columns)",
        path.display(),
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

/// Parse comma-delimited CSV bytes whose first row is the header.
///
/// * A leading UTF-8 BOM is ignored; invalid UTF-8 is decoded lossily.
/// * Empty fields become [`RawCell::Missing`].
/// * Rows shorter than the header are padded with missing cells; longer rows
///   are a [`Error::MalformedCsv`].
/// * Duplicate header names are disambiguated as `name.1`, `name.2`, ...
pub fn parse_csv(bytes: &[u8]) -> Result<RawTable> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let raw_headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_string())
        .collect();

    if raw_headers.is_empty() || raw_headers.iter().all(String::is_empty) {
        return Err(Error::MalformedCsv("missing header row".into()));
    }

    let headers = dedupe_headers(raw_headers);
    let width = headers.len();
    let mut columns: Vec<RawColumn> = headers
        .into_iter()
        .map(|name| RawColumn {
            name,
            cells: Vec::new(),
        })
        .collect();

    for result in reader.byte_records() {
        let record = result?;
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(Error::MalformedCsv(format!(
                "expected {width} fields in line {line}, saw {}",
                record.len()
            )));
        }
        for (col_idx, column) in columns.iter_mut().enumerate() {
            let cell = record
                .get(col_idx)
                .map(|field| RawCell::from_field(&String::from_utf8_lossy(field)))
                .unwrap_or(RawCell::Missing);
            column.cells.push(cell);
        }
    }

    RawTable::new(columns)
}

fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    headers
        .into_iter()
        .map(|name| {
            let mut candidate = name.clone();
            let mut n = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{name}.{n}");
                n += 1;
            }
            candidate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_cells() {
        let table = parse_csv(b"Time,temp\n2024-01-01,10\n2024-01-02,\n").unwrap();
        assert_eq!(table.column_names(), vec!["Time", "temp"]);
        assert_eq!(table.row_count(), 2);
        let temp = table.column("temp").unwrap();
        assert_eq!(temp.cells[0], RawCell::Text("10".into()));
        assert!(temp.cells[1].is_missing());
    }

    #[test]
    fn strips_bom_and_pads_short_rows() {
        let table = parse_csv("\u{feff}a,b,c\n1,2\n".as_bytes()).unwrap();
        assert_eq!(table.column_names(), vec!["a", "b", "c"]);
        assert!(table.column("c").unwrap().cells[0].is_missing());
    }

    #[test]
    fn long_rows_are_malformed() {
        let err = parse_csv(b"a,b\n1,2,3\n").unwrap_err();
        match err {
            Error::MalformedCsv(msg) => assert!(msg.contains("line 2"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_malformed() {
        assert!(matches!(parse_csv(b""), Err(Error::MalformedCsv(_))));
    }

    #[test]
    fn header_only_has_zero_rows() {
        let table = parse_csv(b"Time,temp\n").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn duplicate_headers_are_renamed() {
        let table = parse_csv(b"x,x,x\n1,2,3\n").unwrap();
        assert_eq!(table.column_names(), vec!["x", "x.1", "x.2"]);
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let table = parse_csv(b"site,v\n\"Medellin, CO\",1\n").unwrap();
        assert_eq!(
            table.column("site").unwrap().cells[0],
            RawCell::Text("Medellin, CO".into())
        );
    }
}
