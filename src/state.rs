use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use sensor_dashboard::config::DashboardConfig;
use sensor_dashboard::data::model::{ColumnSelection, RawTable};
use sensor_dashboard::pipeline::{self, AnalysisOutcome, AnalysisRequest};
use sensor_dashboard::{export_csv, export_file_name, load_file};

// ---------------------------------------------------------------------------
// UI choices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Chart,
    Statistics,
    FilterExport,
    SiteInfo,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Chart, Tab::Statistics, Tab::FilterExport, Tab::SiteInfo];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Chart => "Chart",
            Tab::Statistics => "Statistics",
            Tab::FilterExport => "Filter & Export",
            Tab::SiteInfo => "Site info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Area,
    Bar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Line, ChartKind::Area, ChartKind::Bar];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Area => "Area",
            ChartKind::Bar => "Bar",
        }
    }
}

/// Outcome of the last file operation, shown in the top bar.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            StatusMessage::Info(text) | StatusMessage::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusMessage::Error(_))
    }
}

/// A failed pipeline run, as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineError {
    pub message: String,
    pub remediation: &'static str,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. Everything derived from the
/// raw table is recomputed by [`AppState::rerun`] on every change.
pub struct AppState {
    pub config: DashboardConfig,

    /// Uploaded table (None until the user opens a file).
    pub raw: Option<Arc<RawTable>>,

    /// File name of the upload, for the top bar.
    pub source_name: Option<String>,

    /// Time selector label; may be [`ColumnSelection::NO_TIME_COLUMN`].
    pub time_choice: String,

    /// Value selector label.
    pub value_choice: String,

    /// Slider bounds; `None` means the full domain.
    pub bounds: Option<(f64, f64)>,

    /// Result of the last successful run.
    pub outcome: Option<AnalysisOutcome>,

    /// Failure of the last run; analysis is hidden while set.
    pub error: Option<PipelineError>,

    /// Status message for file I/O outcomes.
    pub status_message: Option<StatusMessage>,

    pub tab: Tab,
    pub chart_kind: ChartKind,
    pub show_preview: bool,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            raw: None,
            source_name: None,
            time_choice: ColumnSelection::NO_TIME_COLUMN.to_string(),
            value_choice: String::new(),
            bounds: None,
            outcome: None,
            error: None,
            status_message: None,
            tab: Tab::Chart,
            chart_kind: ChartKind::Line,
            show_preview: false,
        }
    }

    /// Read a CSV file and make it the current upload.
    pub fn open_file(&mut self, path: &Path) -> Result<()> {
        let raw = load_file(path).with_context(|| format!("loading {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        log::info!(
            "Loaded {name}: {} rows, columns {:?}",
            raw.row_count(),
            raw.column_names()
        );
        self.set_raw_table(raw, name);
        Ok(())
    }

    /// Ingest a new upload, pick default columns and run the pipeline.
    pub fn set_raw_table(&mut self, raw: RawTable, source_name: String) {
        let (time_choice, value_choice) = default_choices(&raw);
        self.time_choice = time_choice;
        self.value_choice = value_choice;
        self.raw = Some(Arc::new(raw));
        self.source_name = Some(source_name);
        self.bounds = None;
        self.status_message = None;
        self.rerun();
    }

    /// Entries for the time selector: the sentinel, then every column.
    pub fn time_options(&self) -> Vec<String> {
        let mut options = vec![ColumnSelection::NO_TIME_COLUMN.to_string()];
        if let Some(raw) = &self.raw {
            options.extend(raw.column_names());
        }
        options
    }

    pub fn value_options(&self) -> Vec<String> {
        self.raw
            .as_ref()
            .map(|raw| raw.column_names())
            .unwrap_or_default()
    }

    pub fn set_time_choice(&mut self, label: String) {
        self.time_choice = label;
        self.bounds = None;
        self.rerun();
    }

    pub fn set_value_choice(&mut self, label: String) {
        self.value_choice = label;
        self.bounds = None;
        self.rerun();
    }

    pub fn set_bounds(&mut self, lower: f64, upper: f64) {
        self.bounds = Some((lower, upper));
        self.rerun();
    }

    pub fn selection(&self) -> ColumnSelection {
        ColumnSelection::from_labels(&self.time_choice, &self.value_choice)
    }

    /// Re-run normalize → describe → filter on the current inputs.
    pub fn rerun(&mut self) {
        let Some(raw) = &self.raw else {
            return;
        };
        let request = AnalysisRequest {
            selection: self.selection(),
            bounds: self.bounds,
        };
        match pipeline::run(raw, &request) {
            Ok(outcome) => {
                self.outcome = Some(outcome);
                self.error = None;
            }
            Err(e) => {
                log::error!("Pipeline failed: {e}");
                self.outcome = None;
                self.error = Some(PipelineError {
                    message: e.to_string(),
                    remediation: e.remediation(),
                });
            }
        }
    }

    /// Suggested export file name for `date`.
    pub fn export_name(&self, date: NaiveDate) -> String {
        export_file_name(&self.config.export_prefix, &self.value_choice, date)
    }

    /// Write the current filtered view to `path`.
    pub fn save_export(&mut self, path: &Path) -> Result<usize> {
        let outcome = self
            .outcome
            .as_ref()
            .context("nothing to export: no analysed dataset")?;
        let bytes = export_csv(&outcome.view).context("serializing filtered rows")?;
        std::fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
        let rows = outcome.view.filtered_count();
        log::info!("Exported {rows} rows to {}", path.display());
        self.status_message = Some(StatusMessage::Info(format!(
            "Saved {rows} rows to {}",
            path.display()
        )));
        Ok(rows)
    }

    /// Record a failed file operation for the top bar.
    pub fn report_failure(&mut self, err: &anyhow::Error) {
        self.status_message = Some(StatusMessage::Error(format!("Error: {err:#}")));
    }
}

/// Default selector choices: a column literally named `Time` if present,
/// and the second column for the value when the first one is the time.
fn default_choices(raw: &RawTable) -> (String, String) {
    let names = raw.column_names();
    let time = if names.iter().any(|n| n == "Time") {
        "Time".to_string()
    } else {
        ColumnSelection::NO_TIME_COLUMN.to_string()
    };
    let value_idx = if names.len() > 1 && names[0] == time { 1 } else { 0 };
    let value = names.get(value_idx).cloned().unwrap_or_default();
    (time, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensor_dashboard::parse_csv;

    fn state_with(csv: &str) -> AppState {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_raw_table(parse_csv(csv.as_bytes()).unwrap(), "test.csv".into());
        state
    }

    #[test]
    fn defaults_pick_time_and_second_column() {
        let state = state_with("Time,temp,rh\n2024-01-01,1,2\n");
        assert_eq!(state.time_choice, "Time");
        assert_eq!(state.value_choice, "temp");
        assert!(state.outcome.is_some());
    }

    #[test]
    fn defaults_without_time_column() {
        let state = state_with("temp,rh\n1,2\n");
        assert_eq!(state.time_choice, ColumnSelection::NO_TIME_COLUMN);
        assert_eq!(state.value_choice, "temp");
        assert_eq!(state.time_options()[0], ColumnSelection::NO_TIME_COLUMN);
        assert_eq!(state.time_options().len(), 3);
    }

    #[test]
    fn failed_normalization_halts_analysis() {
        let mut state = state_with("Time,temp\n2024-01-01,1\n");
        state.set_value_choice("Time".into());
        assert!(state.outcome.is_none());
        let err = state.error.as_ref().unwrap();
        assert!(err.message.contains("no valid rows"));
        assert!(err.remediation.contains("well-formed"));

        state.set_value_choice("temp".into());
        assert!(state.error.is_none());
        assert!(state.outcome.is_some());
    }

    #[test]
    fn bounds_filter_and_reset_on_column_change() {
        let mut state = state_with("v,w\n1,5\n2,5\n3,5\n");
        state.set_bounds(2.0, 3.0);
        assert_eq!(state.outcome.as_ref().unwrap().view.filtered_count(), 2);
        state.set_value_choice("w".into());
        assert_eq!(state.bounds, None);
        let view = &state.outcome.as_ref().unwrap().view;
        assert!(view.is_degenerate());
        assert_eq!(view.filtered_count(), 3);
    }

    #[test]
    fn export_name_uses_config_prefix() {
        let state = state_with("Time,PM25\n2024-01-01,1\n");
        let date = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();
        assert_eq!(state.export_name(date), "datos_filtrados_PM25_20240203.csv");
    }

    #[test]
    fn saved_export_is_an_info_status() {
        let mut state = state_with("Time,temp\n2024-01-01,1\n2024-01-02,2\n");
        let path = std::env::temp_dir().join(format!(
            "sensor_dashboard_status_{}.csv",
            std::process::id()
        ));
        assert_eq!(state.save_export(&path).unwrap(), 2);
        let status = state.status_message.clone().unwrap();
        assert!(!status.is_error());
        assert!(status.text().starts_with("Saved 2 rows"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("time,value"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn failed_export_is_an_error_status() {
        let mut state = AppState::new(DashboardConfig::default());
        let err = state
            .save_export(Path::new("never-written.csv"))
            .unwrap_err();
        state.report_failure(&err);
        let status = state.status_message.as_ref().unwrap();
        assert!(status.is_error());
        assert!(status.text().contains("nothing to export"));
    }
}
