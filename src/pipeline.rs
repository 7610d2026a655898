//! One request in, one set of results out. Nothing is cached between calls:
//! every UI interaction re-runs the whole pipeline on the current inputs.

use crate::data::filter::{FilteredView, RangeFilter};
use crate::data::model::{CleanedDataset, ColumnSelection, RawTable};
use crate::data::normalize::normalize;
use crate::error::Result;
use crate::stats::{describe, SummaryStatistics};

/// Inputs for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub selection: ColumnSelection,
    /// `None` filters on the full `[min, max]` domain.
    pub bounds: Option<(f64, f64)>,
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub dataset: CleanedDataset,
    pub stats: SummaryStatistics,
    pub view: FilteredView,
}

/// Normalize, describe and filter. Stops at the first failing stage.
pub fn run(raw: &RawTable, request: &AnalysisRequest) -> Result<AnalysisOutcome> {
    let dataset = normalize(raw, &request.selection)?;
    let stats = describe(&dataset);
    log::debug!(
        "Summary statistics: {}",
        serde_json::to_string(&stats).unwrap_or_default()
    );
    let filter = match request.bounds {
        Some((lower, upper)) => RangeFilter::new(lower, upper)?,
        None => RangeFilter::full(&dataset),
    };
    let view = filter.apply(&dataset);
    Ok(AnalysisOutcome {
        dataset,
        stats,
        view,
    })
}
