use std::path::{Path, PathBuf};

use super::aggregate::{airline_breakdown, daily_trend, summarize};
use super::filter::filter;
use super::forecast::{forecast_path, lookup_forecast};
use super::model::{
    AirlineAverage, DailyAverage, ForecastPoint, SelectionKey, SummaryStats, TripTable,
};
use crate::error::ForecastParseError;

// ---------------------------------------------------------------------------
// Per-selection outcomes
// ---------------------------------------------------------------------------

/// Historical branch: statistics and grouped aggregates.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsOutcome {
    Ready {
        route: String,
        summary: SummaryStats,
        daily: Vec<DailyAverage>,
        airlines: Vec<AirlineAverage>,
    },
    NoData,
}

/// Forecast branch.
#[derive(Debug)]
pub enum ForecastOutcome {
    Ready(Vec<ForecastPoint>),
    Missing { path: PathBuf },
    Malformed(ForecastParseError),
}

impl ForecastOutcome {
    pub fn points(&self) -> Option<&[ForecastPoint]> {
        match self {
            ForecastOutcome::Ready(points) => Some(points),
            _ => None,
        }
    }
}

/// Everything the dashboard shows for one selection.
#[derive(Debug)]
pub struct SelectionReport {
    pub key: SelectionKey,
    pub stats: StatsOutcome,
    pub forecast: ForecastOutcome,
}

impl SelectionReport {
    /// User-facing message for the historical branch, if it did not complete.
    pub fn stats_message(&self) -> Option<String> {
        match self.stats {
            StatsOutcome::Ready { .. } => None,
            StatsOutcome::NoData => Some("No data available for this route and class.".into()),
        }
    }

    /// User-facing message for the forecast branch, if it did not complete.
    pub fn forecast_message(&self) -> Option<String> {
        match &self.forecast {
            ForecastOutcome::Ready(_) => None,
            ForecastOutcome::Missing { .. } => Some(
                "Forecast not found for this route and class. \
                 Run the forecasting job to generate it."
                    .into(),
            ),
            ForecastOutcome::Malformed(e) => Some(format!("Forecast could not be read: {e}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Run both branches for `key`.
///
/// The historical branch (filter → aggregate) and the forecast branch
/// (lookup) are evaluated independently: a failure in one never prevents the
/// other from producing its result.
pub fn evaluate(table: &TripTable, key: &SelectionKey, forecasts_dir: &Path) -> SelectionReport {
    SelectionReport {
        key: key.clone(),
        stats: evaluate_stats(table, key),
        forecast: evaluate_forecast(forecasts_dir, key),
    }
}

fn evaluate_stats(table: &TripTable, key: &SelectionKey) -> StatsOutcome {
    let view = filter(table, key);
    if view.is_empty() {
        log::warn!(
            "No records for {} → {} ({})",
            key.origin,
            key.destination,
            key.class
        );
        return StatsOutcome::NoData;
    }
    match summarize(&view) {
        Ok(summary) => StatsOutcome::Ready {
            route: view.route().unwrap_or_default().to_string(),
            summary,
            daily: daily_trend(&view),
            airlines: airline_breakdown(&view),
        },
        Err(_) => StatsOutcome::NoData,
    }
}

fn evaluate_forecast(forecasts_dir: &Path, key: &SelectionKey) -> ForecastOutcome {
    match lookup_forecast(forecasts_dir, key) {
        Ok(Some(points)) => ForecastOutcome::Ready(points),
        Ok(None) => ForecastOutcome::Missing {
            path: forecast_path(forecasts_dir, key),
        },
        Err(e) => {
            log::error!("{e}");
            ForecastOutcome::Malformed(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::data::model::TripRecord;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn table() -> TripTable {
        TripTable::from_records(vec![
            TripRecord::new(day(1), "Delhi", "Mumbai", "Economy", "A", 4000.0),
            TripRecord::new(day(2), "Delhi", "Mumbai", "Economy", "B", 5000.0),
            TripRecord::new(day(2), "Delhi", "Mumbai", "Economy", "A", 6000.0),
            TripRecord::new(day(1), "Mumbai", "Delhi", "Business", "C", 9000.0),
        ])
    }

    #[test]
    fn end_to_end_without_forecast() {
        let dir = TempDir::new().unwrap();
        let key = SelectionKey::new("Delhi", "Mumbai", "Economy");
        let report = evaluate(&table(), &key, dir.path());

        match &report.stats {
            StatsOutcome::Ready {
                route,
                summary,
                daily,
                airlines,
            } => {
                assert_eq!(route, "Delhi → Mumbai");
                assert_eq!(summary.average_price, 5000);
                assert_eq!(summary.min_price, 4000);
                assert_eq!(summary.max_price, 6000);
                assert_eq!(summary.top_airline, "A");
                assert_eq!(daily.len(), 2);
                assert_eq!(daily[1].mean_price, 5500.0);
                let names: Vec<&str> = airlines.iter().map(|a| a.airline.as_str()).collect();
                assert_eq!(names, vec!["A", "B"]);
            }
            StatsOutcome::NoData => panic!("expected statistics"),
        }
        assert!(report.stats_message().is_none());

        match &report.forecast {
            ForecastOutcome::Missing { path } => {
                assert!(path.ends_with("forecast_delhi_mumbai_economy.csv"))
            }
            other => panic!("expected missing forecast, got {other:?}"),
        }
        assert!(report.forecast_message().is_some());
        assert!(report.forecast.points().is_none());
    }

    #[test]
    fn no_data_still_loads_the_forecast() {
        let dir = TempDir::new().unwrap();
        let key = SelectionKey::new("Delhi", "Chennai", "Economy");
        std::fs::write(
            forecast_path(dir.path(), &key),
            "ds,yhat\n2024-01-01,5000.0\n2024-01-02,5200.5\n",
        )
        .unwrap();

        let report = evaluate(&table(), &key, dir.path());
        assert_eq!(report.stats, StatsOutcome::NoData);
        assert_eq!(
            report.stats_message().as_deref(),
            Some("No data available for this route and class.")
        );
        assert_eq!(
            report.forecast.points(),
            Some(
                &[
                    ForecastPoint::new(day(1), 5000.0),
                    ForecastPoint::new(day(2), 5200.5),
                ][..]
            )
        );
        assert!(report.forecast_message().is_none());
    }

    #[test]
    fn malformed_forecast_does_not_block_statistics() {
        let dir = TempDir::new().unwrap();
        let key = SelectionKey::new("Delhi", "Mumbai", "Economy");
        std::fs::write(forecast_path(dir.path(), &key), "when,what\n").unwrap();

        let report = evaluate(&table(), &key, dir.path());
        assert!(matches!(report.stats, StatsOutcome::Ready { .. }));
        assert!(matches!(report.forecast, ForecastOutcome::Malformed(_)));
        let msg = report.forecast_message().unwrap();
        assert!(msg.contains("missing column 'ds'"), "{msg}");
    }
}
