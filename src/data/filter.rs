use super::model::{CleanedDataset, DatasetSchema, Row};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Range filter: closed interval on the value domain
// ---------------------------------------------------------------------------

/// Inclusive `[lower, upper]` bounds on `value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    lower: f64,
    upper: f64,
}

impl RangeFilter {
    /// Fails with [`Error::InvalidRange`] when `lower > upper` or a bound is NaN.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(Error::InvalidRange { lower, upper });
        }
        Ok(RangeFilter { lower, upper })
    }

    /// The whole `[min, max]` domain of a dataset.
    pub fn full(dataset: &CleanedDataset) -> Self {
        RangeFilter {
            lower: dataset.min(),
            upper: dataset.max(),
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Apply to a dataset. A degenerate domain (min == max) short-circuits
    /// and returns every row whatever the bounds.
    pub fn apply(&self, dataset: &CleanedDataset) -> FilteredView {
        let degenerate = dataset.is_degenerate();
        let rows: Vec<Row> = if degenerate {
            dataset.rows().to_vec()
        } else {
            dataset
                .rows()
                .iter()
                .filter(|r| self.contains(r.value))
                .cloned()
                .collect()
        };

        log::debug!(
            "Range [{}, {}] kept {} of {} rows{}",
            self.lower,
            self.upper,
            rows.len(),
            dataset.len(),
            if degenerate { " (degenerate domain)" } else { "" }
        );

        FilteredView {
            schema: dataset.schema().clone(),
            rows,
            original_count: dataset.len(),
            filter: *self,
            degenerate,
        }
    }
}

/// Validate the bounds and filter in one step.
pub fn filter_range(dataset: &CleanedDataset, lower: f64, upper: f64) -> Result<FilteredView> {
    Ok(RangeFilter::new(lower, upper)?.apply(dataset))
}

// ---------------------------------------------------------------------------
// FilteredView – row subset of a cleaned dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView {
    schema: DatasetSchema,
    rows: Vec<Row>,
    original_count: usize,
    filter: RangeFilter,
    degenerate: bool,
}

impl FilteredView {
    /// A view holding every row of the dataset.
    pub fn unfiltered(dataset: &CleanedDataset) -> Self {
        RangeFilter::full(dataset).apply(dataset)
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn filter(&self) -> RangeFilter {
        self.filter
    }

    pub fn original_count(&self) -> usize {
        self.original_count
    }

    pub fn filtered_count(&self) -> usize {
        self.rows.len()
    }

    pub fn excluded_count(&self) -> usize {
        self.original_count - self.rows.len()
    }

    /// True when filtering was skipped because every value is identical.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.value).collect()
    }

    /// "Showing N of M records in [lo, hi]" for the table caption.
    pub fn caption(&self, decimals: usize) -> String {
        format!(
            "Showing {} of {} records in the range [{:.*}, {:.*}]",
            self.filtered_count(),
            self.original_count,
            decimals,
            self.filter.lower,
            decimals,
            self.filter.upper
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;
    use crate::data::model::ColumnSelection;
    use crate::data::normalize::normalize;

    fn dataset(csv: &str) -> CleanedDataset {
        let raw = parse_csv(csv.as_bytes()).unwrap();
        normalize(&raw, &ColumnSelection::new(None, "v")).unwrap()
    }

    #[test]
    fn keeps_inclusive_bounds_in_order() {
        let ds = dataset("v\n5\n1\n3\n4\n2\n");
        let view = filter_range(&ds, 2.0, 4.0).unwrap();
        assert_eq!(view.values(), vec![3.0, 4.0, 2.0]);
        assert_eq!(view.filtered_count(), 3);
        assert_eq!(view.excluded_count(), 2);
        assert!(!view.is_degenerate());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let ds = dataset("v\n1\n2\n");
        assert!(matches!(
            filter_range(&ds, 3.0, 1.0),
            Err(Error::InvalidRange { .. })
        ));
        assert!(RangeFilter::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn degenerate_domain_returns_every_row() {
        let ds = dataset("v\n1\n1\n1\n");
        let view = filter_range(&ds, 5.0, 5.0).unwrap();
        assert_eq!(view.filtered_count(), 3);
        assert_eq!(view.excluded_count(), 0);
        assert!(view.is_degenerate());
    }

    #[test]
    fn empty_selection_is_not_an_error() {
        let ds = dataset("v\n1\n2\n");
        let view = filter_range(&ds, 10.0, 20.0).unwrap();
        assert_eq!(view.filtered_count(), 0);
        assert_eq!(view.excluded_count(), 2);
    }

    #[test]
    fn unfiltered_covers_the_domain() {
        let ds = dataset("v\n-1.5\n7\n");
        let view = FilteredView::unfiltered(&ds);
        assert_eq!(view.filtered_count(), 2);
        assert_eq!(view.filter().lower(), -1.5);
        assert_eq!(view.filter().upper(), 7.0);
        assert_eq!(
            view.caption(2),
            "Showing 2 of 2 records in the range [-1.50, 7.00]"
        );
    }
}
