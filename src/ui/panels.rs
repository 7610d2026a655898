use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – upload and column selection
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data controls");
    ui.separator();

    ui.strong("1. CSV file");
    if ui.button("Open CSV…").clicked() {
        open_file_dialog(state);
    }
    ui.label(
        RichText::new(
            "Tip: the file needs a numeric sensor column and, optionally, a time column.",
        )
        .small()
        .weak(),
    );
    ui.separator();

    if state.raw.is_none() {
        ui.label("No file loaded.");
        return;
    }

    ui.strong("2. Column selection");

    // Clone what we need so we can mutate state inside the closures.
    let time_options = state.time_options();
    let value_options = state.value_options();

    let current_time = state.time_choice.clone();
    let mut new_time = None;
    ui.label("Time column");
    egui::ComboBox::from_id_salt("time_column")
        .selected_text(&current_time)
        .show_ui(ui, |ui: &mut Ui| {
            for opt in &time_options {
                if ui.selectable_label(current_time == *opt, opt).clicked() {
                    new_time = Some(opt.clone());
                }
            }
        });
    if let Some(choice) = new_time.filter(|c| *c != current_time) {
        state.set_time_choice(choice);
    }

    let current_value = state.value_choice.clone();
    let mut new_value = None;
    ui.label("Variable to analyse");
    egui::ComboBox::from_id_salt("value_column")
        .selected_text(&current_value)
        .show_ui(ui, |ui: &mut Ui| {
            for opt in &value_options {
                if ui.selectable_label(current_value == *opt, opt).clicked() {
                    new_value = Some(opt.clone());
                }
            }
        });
    if let Some(choice) = new_value.filter(|c| *c != current_value) {
        state.set_value_choice(choice);
    }

    if let Some(outcome) = &state.outcome {
        let report = outcome.dataset.report();
        ui.separator();
        ui.label(format!("{} of {} rows kept", report.kept, report.input_rows));
        if report.dropped() > 0 {
            ui.label(
                RichText::new(format!(
                    "{} dropped ({} invalid time, {} non-numeric value)",
                    report.dropped(),
                    report.dropped_time,
                    report.dropped_value
                ))
                .color(Color32::from_rgb(200, 140, 0)),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, the tab strip and the status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for tab in Tab::ALL {
            if ui.selectable_label(state.tab == tab, tab.label()).clicked() {
                state.tab = tab;
            }
        }

        ui.separator();

        if let Some(name) = &state.source_name {
            ui.label(name);
        }

        if let Some(msg) = &state.status_message {
            let color = if msg.is_error() {
                Color32::RED
            } else {
                Color32::from_rgb(38, 179, 160)
            };
            ui.label(RichText::new(msg.text()).color(color));
        }
    });
}

/// Show the empty/error state. Returns `true` when analysis can be rendered.
pub fn status_banner(ui: &mut Ui, state: &AppState) -> bool {
    if state.raw.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV file to start the analysis  (File → Open…)");
        });
        return false;
    }
    if let Some(err) = &state.error {
        ui.label(RichText::new(format!("Error: {}", err.message)).color(Color32::RED));
        ui.label(err.remediation);
        return false;
    }
    state.outcome.is_some()
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sensor data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.open_file(&path) {
            log::error!("Failed to load file: {e:#}");
            state.report_failure(&e);
        }
    }
}
