use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, LineStyle, Plot, PlotPoints};

use crate::data::model::{AirlineAverage, DailyAverage, ForecastPoint};
use crate::data::report::{ForecastOutcome, StatsOutcome};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Date axis helpers
// ---------------------------------------------------------------------------

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Label for a plot x value; empty between whole days.
fn format_day(x: f64) -> String {
    if (x - x.round()).abs() > 1e-6 {
        return String::new();
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn hover_label(name: &str, x: f64, y: f64) -> String {
    let day = format_day(x.round());
    if name.is_empty() {
        format!("{day}\n₹{y:.0}")
    } else {
        format!("{name}\n{day}\n₹{y:.0}")
    }
}

// ---------------------------------------------------------------------------
// Historical daily average
// ---------------------------------------------------------------------------

/// Line chart of the daily mean fare for the current selection.
pub fn history_plot(ui: &mut Ui, state: &AppState) {
    let Some(report) = &state.report else {
        return;
    };
    let StatsOutcome::Ready { route, daily, .. } = &report.stats else {
        return;
    };

    ui.heading("Historical Daily Average Fare");
    ui.label(format!("Historical Fare Trend: {route} ({})", report.key.class));
    history_chart(ui, daily);
}

fn history_chart(ui: &mut Ui, daily: &[DailyAverage]) {
    let points: PlotPoints = daily
        .iter()
        .map(|d| [day_number(d.date), d.mean_price])
        .collect();

    Plot::new("history_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Average Price")
        .x_axis_formatter(|mark, _range| format_day(mark.value))
        .label_formatter(|name, point| hover_label(name, point.x, point.y))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("Average Price")
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
        });
}

// ---------------------------------------------------------------------------
// Forecast
// ---------------------------------------------------------------------------

/// Forecast chart, or the informational / error message in its place.
pub fn forecast_plot(ui: &mut Ui, state: &AppState) {
    let Some(report) = &state.report else {
        return;
    };

    ui.heading("Forecast for Next 30 Days");
    match &report.forecast {
        ForecastOutcome::Ready(points) => forecast_chart(ui, points),
        ForecastOutcome::Missing { path } => {
            if let Some(msg) = report.forecast_message() {
                ui.label(RichText::new(format!("ℹ {msg}")).color(Color32::LIGHT_BLUE));
            }
            ui.label(RichText::new(format!("Looked for {}", path.display())).small());
        }
        ForecastOutcome::Malformed(_) => {
            if let Some(msg) = report.forecast_message() {
                ui.label(RichText::new(format!("⚠ {msg}")).color(Color32::RED));
            }
        }
    }
}

fn forecast_chart(ui: &mut Ui, points: &[ForecastPoint]) {
    let predicted: PlotPoints = points
        .iter()
        .map(|p| [day_number(p.date), p.predicted_price])
        .collect();
    let bounds: Vec<(f64, f64, f64)> = points
        .iter()
        .filter_map(|p| p.interval.map(|(lo, hi)| (day_number(p.date), lo, hi)))
        .collect();

    Plot::new("forecast_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Predicted Price")
        .x_axis_formatter(|mark, _range| format_day(mark.value))
        .label_formatter(|name, point| hover_label(name, point.x, point.y))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(predicted)
                    .name("Predicted Price")
                    .color(Color32::from_rgb(255, 160, 60))
                    .width(1.5),
            );
            if !bounds.is_empty() {
                let band = Color32::from_rgb(255, 200, 140);
                let lower: PlotPoints = bounds.iter().map(|&(x, lo, _)| [x, lo]).collect();
                let upper: PlotPoints = bounds.iter().map(|&(x, _, hi)| [x, hi]).collect();
                for (name, line) in [("Lower bound", lower), ("Upper bound", upper)] {
                    plot_ui.line(
                        Line::new(line)
                            .name(name)
                            .color(band)
                            .style(LineStyle::Dashed { length: 8.0 }),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Airline comparison
// ---------------------------------------------------------------------------

/// Bar chart and table of the mean fare per airline.
pub fn airline_plot(ui: &mut Ui, state: &AppState) {
    let Some(StatsOutcome::Ready { airlines, .. }) = state.report.as_ref().map(|r| &r.stats)
    else {
        return;
    };

    ui.heading("Airline-wise Average Fare");
    airline_chart(ui, state, airlines);
    ui.add_space(8.0);
    airline_table(ui, airlines);
}

fn airline_chart(ui: &mut Ui, state: &AppState, airlines: &[AirlineAverage]) {
    let bars: Vec<Bar> = airlines
        .iter()
        .enumerate()
        .map(|(i, a)| {
            Bar::new(i as f64, a.mean_price)
                .name(&a.airline)
                .fill(state.airline_colors.color_for(&a.airline))
                .width(0.6)
        })
        .collect();
    let names: Vec<String> = airlines.iter().map(|a| a.airline.clone()).collect();

    Plot::new("airline_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Airline")
        .y_axis_label("Average Price")
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            names.get(i as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Average Fare by Airline"));
        });
}

fn airline_table(ui: &mut Ui, airlines: &[AirlineAverage]) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(140.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Airline");
            });
            header.col(|ui| {
                ui.strong("Average Price");
            });
        })
        .body(|mut body| {
            for a in airlines {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&a.airline);
                    });
                    row.col(|ui| {
                        ui.label(format!("₹{:.0}", a.mean_price));
                    });
                });
            }
        });
}
