mod app;
mod state;
mod ui;

use std::path::Path;

use app::SensorDashboardApp;
use eframe::egui;
use sensor_dashboard::config::{DashboardConfig, CONFIG_FILE_NAME};

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE_NAME));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sensor Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SensorDashboardApp::new(config)))),
    )
}
