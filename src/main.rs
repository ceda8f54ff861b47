mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::FareDashboardApp;
use config::DashboardPaths;
use data::loader::DatasetCache;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let paths = DashboardPaths::resolve(config::project_root(std::env::args()));
    log::info!(
        "Project root {}: dataset {}, forecasts in {}",
        paths.root.display(),
        paths.dataset.display(),
        paths.forecasts_dir.display()
    );
    let cache = DatasetCache::new(&paths.dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Flight Fare Forecast",
        options,
        Box::new(move |_cc| Ok(Box::new(FareDashboardApp::new(AppState::new(paths), &cache)))),
    )
}
