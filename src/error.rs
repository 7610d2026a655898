use thiserror::Error;

// ---------------------------------------------------------------------------
// Dataset-level failures
// ---------------------------------------------------------------------------

/// Failures that stop the pipeline. Per-cell parse problems are not errors:
/// they drop the row and are counted in a [`CleaningReport`].
///
/// [`CleaningReport`]: crate::data::model::CleaningReport
#[derive(Debug, Error)]
pub enum Error {
    #[error("column '{column}' not found (available: {})", .available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    #[error(
        "no valid rows left after cleaning ({input_rows} read, {dropped_time} with invalid time, \
         {dropped_value} with non-numeric value)"
    )]
    EmptyAfterCleaning {
        input_rows: usize,
        dropped_time: usize,
        dropped_value: usize,
    },

    #[error("invalid range: lower bound {lower} exceeds upper bound {upper}")]
    InvalidRange { lower: f64, upper: f64 },

    #[error("malformed CSV: {0}")]
    MalformedCsv(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Guidance shown next to the message when the pipeline halts.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InvalidRange { .. } => {
                "Choose a lower bound that does not exceed the upper bound."
            }
            _ => {
                "Check that the CSV file is well-formed and that the correct columns are selected."
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        if !err.is_io_error() {
            return Error::MalformedCsv(err.to_string());
        }
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Error::Io(io),
            other => Error::MalformedCsv(format!("{other:?}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_not_found_lists_available_columns() {
        let err = Error::ColumnNotFound {
            column: "humidity".into(),
            available: vec!["Time".into(), "temp".into()],
        };
        assert_eq!(
            err.to_string(),
            "column 'humidity' not found (available: Time, temp)"
        );
        assert!(err.remediation().contains("well-formed"));
    }

    #[test]
    fn invalid_range_has_its_own_guidance() {
        let err = Error::InvalidRange {
            lower: 5.0,
            upper: 1.0,
        };
        assert!(err.to_string().contains("lower bound 5"));
        assert!(err.remediation().contains("lower bound"));
    }
}
