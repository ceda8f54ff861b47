use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::report::StatsOutcome;
use crate::state::{AppState, Selector};

// ---------------------------------------------------------------------------
// Top bar – title and selectors
// ---------------------------------------------------------------------------

/// Render the title row and the three selectors.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Flight Fare Forecast Dashboard");
        ui.separator();
        if let Some(table) = &state.table {
            ui.label(format!("{} fares loaded", table.len()));
        }
        if let Some(points) = state.report.as_ref().and_then(|r| r.forecast.points()) {
            ui.separator();
            ui.label(format!("{}-day forecast available", points.len()));
        }
    });

    let Some(key) = state.selection.clone() else {
        return;
    };
    let options = state.options.clone();

    ui.horizontal(|ui: &mut Ui| {
        selector(ui, state, Selector::Origin, "From City", &key.origin, &options.origins);
        selector(
            ui,
            state,
            Selector::Destination,
            "To City",
            &key.destination,
            &options.destinations,
        );
        selector(ui, state, Selector::Class, "Class", &key.class, &options.classes);

        ui.separator();
        if ui
            .button("Reload forecast")
            .on_hover_text("Look for a newly generated forecast file")
            .clicked()
        {
            state.refresh();
        }
    });
}

fn selector(
    ui: &mut Ui,
    state: &mut AppState,
    which: Selector,
    label: &str,
    current: &str,
    values: &[String],
) {
    ui.label(label);
    egui::ComboBox::from_id_salt(label)
        .selected_text(current)
        .show_ui(ui, |ui: &mut Ui| {
            for value in values {
                if ui.selectable_label(current == value.as_str(), value).clicked() {
                    state.select(which, value);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Render the four headline metrics, or the no-data warning.
pub fn summary_metrics(ui: &mut Ui, state: &AppState) {
    let Some(report) = &state.report else {
        if let Some(msg) = state.empty_dataset_message() {
            ui.label(RichText::new(format!("⚠ {msg}")).color(Color32::YELLOW));
        }
        return;
    };

    ui.heading("Summary Metrics");
    match &report.stats {
        StatsOutcome::Ready { summary, .. } => {
            let top = summary.top_airline.clone();
            let cells = [
                ("Average Fare", format!("₹{}", summary.average_price)),
                ("Lowest Fare", format!("₹{}", summary.min_price)),
                ("Highest Fare", format!("₹{}", summary.max_price)),
                ("Top Airline", top.clone()),
            ];
            ui.columns(cells.len(), |cols| {
                for (col, (label, value)) in cols.iter_mut().zip(cells) {
                    col.label(RichText::new(label).small());
                    let mut text = RichText::new(value).size(22.0).strong();
                    if label == "Top Airline" {
                        text = text.color(state.airline_colors.color_for(&top));
                    }
                    col.label(text);
                }
            });
        }
        StatsOutcome::NoData => {
            if let Some(msg) = report.stats_message() {
                ui.label(RichText::new(format!("⚠ {msg}")).color(Color32::YELLOW));
            }
        }
    }
}

/// Full-page message when the dataset could not be loaded.
pub fn load_error(ui: &mut Ui, message: &str, state: &AppState) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(
            RichText::new(format!(
                "{message}\n\nExpected the dataset at {}",
                state.paths.dataset.display()
            ))
            .color(Color32::RED)
            .heading(),
        );
    });
}
