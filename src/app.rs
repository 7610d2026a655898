use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, tabs};
use sensor_dashboard::config::DashboardConfig;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SensorDashboardApp {
    pub state: AppState,
}

impl SensorDashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for SensorDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: upload + column selection ----
        egui::SidePanel::left("controls_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if !panels::status_banner(ui, &self.state) {
                return;
            }
            match self.state.tab {
                Tab::Chart => plot::chart_tab(ui, &mut self.state),
                Tab::Statistics => tabs::statistics_tab(ui, &self.state),
                Tab::FilterExport => tabs::filter_tab(ui, &mut self.state),
                Tab::SiteInfo => tabs::site_tab(ui, &self.state),
            }
        });
    }
}
