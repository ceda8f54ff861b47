use eframe::egui::{self, ScrollArea, Ui};

use crate::data::loader::DatasetCache;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FareDashboardApp {
    pub state: AppState,
}

impl FareDashboardApp {
    /// Build the app and load the trip table through `cache`.
    pub fn new(mut state: AppState, cache: &DatasetCache) -> Self {
        state.load_dataset(cache);
        Self { state }
    }
}

impl eframe::App for FareDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(message) = self.state.load_error.clone() {
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::load_error(ui, &message, &self.state);
            });
            return;
        }

        // ---- Top panel: title + selectors ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: metrics and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    panels::summary_metrics(ui, &self.state);
                    ui.separator();
                    plot::history_plot(ui, &self.state);
                    ui.separator();
                    plot::forecast_plot(ui, &self.state);
                    ui.separator();
                    plot::airline_plot(ui, &self.state);
                });
        });
    }
}
