use chrono::Local;
use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;
use sensor_dashboard::data::export::{format_timestamp, CSV_MIME};
use sensor_dashboard::data::model::{DatasetSchema, Row};
use sensor_dashboard::stats::format_metric;

// ---------------------------------------------------------------------------
// Statistics tab
// ---------------------------------------------------------------------------

pub fn statistics_tab(ui: &mut Ui, state: &AppState) {
    let Some(outcome) = &state.outcome else {
        return;
    };
    let decimals = state.config.display_decimals;
    let stats = outcome.stats.rounded(state.config.stats_decimals);

    ui.heading("Summary and quick metrics");
    ui.columns(4, |cols| {
        metric(&mut cols[0], "Mean", &format_metric(stats.mean, decimals));
        metric(&mut cols[1], "Maximum", &format_metric(stats.max, decimals));
        metric(&mut cols[2], "Minimum", &format_metric(stats.min, decimals));
        metric(&mut cols[3], "Std. deviation", &format_metric(stats.std, decimals));
    });

    ui.separator();
    ui.strong("Summary statistics");
    egui::Grid::new("stats_table")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.strong("");
            ui.strong(&state.value_choice);
            ui.end_row();
            for (label, value) in stats.rows() {
                ui.label(label);
                ui.label(format_metric(value, state.config.stats_decimals as usize));
                ui.end_row();
            }
        });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.label(label);
    ui.label(
        RichText::new(value)
            .size(28.0)
            .color(Color32::from_rgb(38, 179, 160)),
    );
}

// ---------------------------------------------------------------------------
// Filter & export tab
// ---------------------------------------------------------------------------

pub fn filter_tab(ui: &mut Ui, state: &mut AppState) {
    let Some(outcome) = &state.outcome else {
        return;
    };
    let decimals = state.config.display_decimals;
    let min = outcome.dataset.min();
    let max = outcome.dataset.max();

    ui.heading("Filter by value range");

    if outcome.dataset.is_degenerate() {
        ui.label(
            RichText::new(format!(
                "All values are equal ({min:.decimals$}); a range filter cannot be applied."
            ))
            .color(Color32::from_rgb(200, 140, 0)),
        );
    } else {
        let filter = outcome.view.filter();
        let (mut lower, mut upper) = (filter.lower(), filter.upper());
        let mut changed = false;
        changed |= ui
            .add(
                egui::Slider::new(&mut lower, min..=max)
                    .text("Minimum")
                    .fixed_decimals(decimals),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut upper, min..=max)
                    .text("Maximum")
                    .fixed_decimals(decimals),
            )
            .changed();
        ui.label(format!(
            "Filtered records: {} ({} excluded)",
            outcome.view.filtered_count(),
            outcome.view.excluded_count()
        ));
        if changed {
            // Keep the interval valid while dragging either handle.
            if lower > upper {
                upper = lower;
            }
            state.set_bounds(lower, upper);
            return;
        }
    }

    let view = &outcome.view;
    ui.separator();
    ui.label(view.caption(decimals));

    let mut save_clicked = false;
    ui.horizontal(|ui: &mut Ui| {
        save_clicked = ui.button("Save filtered data (CSV)").clicked();
        ui.label(RichText::new(CSV_MIME).weak());
    });

    rows_table(ui, "filtered_rows", view.schema(), view.rows());

    if save_clicked {
        save_dialog(state);
    }
}

fn save_dialog(state: &mut AppState) {
    let file_name = state.export_name(Local::now().date_naive());
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name(&file_name)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };
    if let Err(e) = state.save_export(&path) {
        log::error!("Export failed: {e:#}");
        state.report_failure(&e);
    }
}

// ---------------------------------------------------------------------------
// Site info tab
// ---------------------------------------------------------------------------

pub fn site_tab(ui: &mut Ui, state: &AppState) {
    let Some(outcome) = &state.outcome else {
        return;
    };
    let site = &state.config.site;

    ui.heading("Measurement site");
    ui.columns(2, |cols| {
        cols[0].strong("Location");
        cols[0].label(format!("Site: {}", site.name));
        cols[0].label(format!("Latitude: {}", site.latitude));
        cols[0].label(format!("Longitude: {}", site.longitude));
        cols[0].label(format!("Altitude: ~{} m above sea level", site.altitude_m));

        cols[1].strong("Sensor and data");
        cols[1].label(format!("Sensor type: {}", site.sensor));
        cols[1].label(format!("Variable: {}", state.value_choice));
        cols[1].label(format!("Total records: {}", outcome.dataset.len()));
        let span = match outcome.dataset.time_span() {
            Some((first, last)) => format!(
                "From {} to {}",
                first.format("%Y-%m-%d %H:%M"),
                last.format("%Y-%m-%d %H:%M")
            ),
            None => "no time column selected".to_string(),
        };
        cols[1].label(format!("Time range: {span}"));
    });
}

// ---------------------------------------------------------------------------
// Shared row table
// ---------------------------------------------------------------------------

/// Virtualized table of rows using the canonical export headers.
pub fn rows_table(ui: &mut Ui, id: &str, schema: &DatasetSchema, rows: &[Row]) {
    let headers = schema.export_headers();
    let has_time = schema.has_time();

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::auto().at_least(80.0), headers.len())
            .header(20.0, |mut header| {
                for name in &headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, rows.len(), |mut table_row| {
                    let row = &rows[table_row.index()];
                    if has_time {
                        table_row.col(|ui: &mut Ui| {
                            ui.label(row.time.map(format_timestamp).unwrap_or_default());
                        });
                    }
                    table_row.col(|ui: &mut Ui| {
                        ui.label(row.value.to_string());
                    });
                    for cell in &row.passthrough {
                        table_row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}
