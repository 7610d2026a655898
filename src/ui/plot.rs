use chrono::DateTime;
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints};

use crate::state::{AppState, ChartKind};
use crate::ui::tabs::rows_table;
use sensor_dashboard::data::model::CleanedDataset;

// ---------------------------------------------------------------------------
// Chart tab (central panel)
// ---------------------------------------------------------------------------

/// Render the value series with the selected chart kind.
pub fn chart_tab(ui: &mut Ui, state: &mut AppState) {
    let Some(outcome) = &state.outcome else {
        return;
    };

    ui.heading(format!("Selected variable: {}", state.value_choice));

    let mut kind = state.chart_kind;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Chart type");
        for k in ChartKind::ALL {
            ui.radio_value(&mut kind, k, k.label());
        }
    });

    series_plot(ui, &outcome.dataset, kind);

    let mut show_preview = state.show_preview;
    ui.checkbox(&mut show_preview, "Show first rows of the cleaned data");
    if show_preview {
        let n = state.config.preview_rows;
        rows_table(ui, "preview", outcome.dataset.schema(), outcome.dataset.head(n));
    }

    state.chart_kind = kind;
    state.show_preview = show_preview;
}

/// X coordinate: epoch seconds when a time column exists, row number otherwise.
fn x_values(dataset: &CleanedDataset) -> Vec<f64> {
    dataset
        .rows()
        .iter()
        .enumerate()
        .map(|(i, r)| match r.time {
            Some(t) => t.and_utc().timestamp() as f64,
            None => i as f64,
        })
        .collect()
}

fn series_plot(ui: &mut Ui, dataset: &CleanedDataset, kind: ChartKind) {
    let xs = x_values(dataset);
    let has_time = dataset.schema().has_time();
    let name = dataset.schema().value_source.clone();

    let mut plot = Plot::new("series_plot")
        .height(ui.available_height() * 0.6)
        .legend(egui_plot::Legend::default())
        .y_axis_label(name.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if has_time {
        plot = plot
            .x_axis_label("Time")
            .x_axis_formatter(|mark, _range| {
                DateTime::from_timestamp(mark.value as i64, 0)
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default()
            });
    } else {
        plot = plot.x_axis_label("Row");
    }

    plot.show(ui, |plot_ui| {
        let color = Color32::from_rgb(38, 179, 160);
        match kind {
            ChartKind::Line | ChartKind::Area => {
                let points: PlotPoints = xs
                    .iter()
                    .zip(dataset.rows())
                    .map(|(&x, r)| [x, r.value])
                    .collect();
                let mut line = Line::new(points).name(&name).color(color).width(1.5);
                if kind == ChartKind::Area {
                    line = line.fill(0.0);
                }
                plot_ui.line(line);
            }
            ChartKind::Bar => {
                let width = bar_width(&xs);
                let bars: Vec<Bar> = xs
                    .iter()
                    .zip(dataset.rows())
                    .map(|(&x, r)| Bar::new(x, r.value).width(width))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(&name).color(color));
            }
        }
    });
}

/// Bars fill 80% of the smallest gap between neighbouring x positions.
fn bar_width(xs: &[f64]) -> f64 {
    let gap = xs
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| *d > 0.0)
        .fold(f64::INFINITY, f64::min);
    if gap.is_finite() {
        gap * 0.8
    } else {
        0.8
    }
}
