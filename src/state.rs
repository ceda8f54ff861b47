use std::sync::Arc;

use crate::color::AirlineColors;
use crate::config::DashboardPaths;
use crate::data::loader::DatasetCache;
use crate::data::model::{SelectionKey, SelectionOptions, TripTable};
use crate::data::report::{SelectionReport, evaluate};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which selector changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Origin,
    Destination,
    Class,
}

/// The full dashboard state, independent of rendering.
pub struct AppState {
    pub paths: DashboardPaths,

    /// Shared read-only snapshot of the trip table (None if loading failed).
    pub table: Option<Arc<TripTable>>,

    /// Fatal load error shown instead of the dashboard.
    pub load_error: Option<String>,

    /// Values offered by the three selectors.
    pub options: SelectionOptions,

    /// Current (origin, destination, class).
    pub selection: Option<SelectionKey>,

    /// Outputs for the current selection (cached until it changes).
    pub report: Option<SelectionReport>,

    /// Colour per airline, stable across selections.
    pub airline_colors: AirlineColors,
}

impl AppState {
    pub fn new(paths: DashboardPaths) -> Self {
        Self {
            paths,
            table: None,
            load_error: None,
            options: SelectionOptions::default(),
            selection: None,
            report: None,
            airline_colors: AirlineColors::default(),
        }
    }

    /// Fetch the table from `cache` and select the first observed values.
    pub fn load_dataset(&mut self, cache: &DatasetCache) {
        if cache.is_loaded() {
            log::debug!("Reusing cached table from {}", cache.path().display());
        }
        match cache.load() {
            Ok(table) => self.set_table(table),
            Err(e) => {
                log::error!("Failed to load dataset {}: {e}", cache.path().display());
                let cause = std::error::Error::source(&e)
                    .map(|s| format!(": {s:#}"))
                    .unwrap_or_default();
                self.load_error = Some(format!("Error: {e}{cause}"));
                self.table = None;
                self.report = None;
            }
        }
    }

    /// Ingest a loaded table, initialise selectors and colours.
    pub fn set_table(&mut self, table: Arc<TripTable>) {
        if table.is_empty() {
            log::warn!("Dataset {} has no records", self.paths.dataset.display());
        }
        self.options = table.options();
        self.airline_colors = AirlineColors::new(&table.airlines());
        self.selection = self.options.default_key();
        self.table = Some(table);
        self.load_error = None;
        self.refresh();
    }

    /// Warning for a loaded table with nothing to select.
    pub fn empty_dataset_message(&self) -> Option<String> {
        match (&self.table, &self.selection) {
            (Some(_), None) => Some(format!(
                "No fares found in {}. There is nothing to select.",
                self.paths.dataset.display()
            )),
            _ => None,
        }
    }

    /// Change one selector and recompute if the key changed.
    pub fn select(&mut self, selector: Selector, value: &str) {
        let Some(key) = &mut self.selection else {
            return;
        };
        let slot = match selector {
            Selector::Origin => &mut key.origin,
            Selector::Destination => &mut key.destination,
            Selector::Class => &mut key.class,
        };
        if *slot == value {
            return;
        }
        *slot = value.to_string();
        self.refresh();
    }

    /// Re-run both branches for the current selection.
    ///
    /// Also picks up forecast artifacts written since the last evaluation.
    pub fn refresh(&mut self) {
        self.report = match (&self.table, &self.selection) {
            (Some(table), Some(key)) => Some(evaluate(table, key, &self.paths.forecasts_dir)),
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::data::report::{ForecastOutcome, StatsOutcome};

    fn setup() -> (TempDir, AppState, DatasetCache) {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("cleaned_flights_data_final.csv"),
            "date,from,to,Class,airline,price\n\
             2024-01-01,Delhi,Mumbai,Economy,A,4000\n\
             2024-01-02,Delhi,Mumbai,Economy,B,5000\n\
             2024-01-03,Mumbai,Delhi,Business,C,9000\n",
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("predictions")).unwrap();
        let paths = DashboardPaths::resolve(dir.path());
        let cache = DatasetCache::new(&paths.dataset);
        (dir, AppState::new(paths), cache)
    }

    #[test]
    fn loading_selects_first_observed_values() {
        let (_dir, mut state, cache) = setup();
        state.load_dataset(&cache);

        assert!(state.load_error.is_none());
        assert_eq!(
            state.selection,
            Some(SelectionKey::new("Delhi", "Delhi", "Business"))
        );
        let report = state.report.as_ref().unwrap();
        assert_eq!(report.stats, StatsOutcome::NoData);
        assert!(matches!(report.forecast, ForecastOutcome::Missing { .. }));
        assert!(state.empty_dataset_message().is_none());
    }

    #[test]
    fn selector_changes_recompute_the_report() {
        let (dir, mut state, cache) = setup();
        state.load_dataset(&cache);
        state.select(Selector::Destination, "Mumbai");
        state.select(Selector::Class, "Economy");

        let report = state.report.as_ref().unwrap();
        assert_eq!(report.key, SelectionKey::new("Delhi", "Mumbai", "Economy"));
        assert!(matches!(report.stats, StatsOutcome::Ready { .. }));
        assert!(matches!(report.forecast, ForecastOutcome::Missing { .. }));

        std::fs::write(
            dir.path().join("predictions/forecast_delhi_mumbai_economy.csv"),
            "ds,yhat\n2024-02-01,4500\n",
        )
        .unwrap();
        state.refresh();
        let points = state.report.as_ref().unwrap().forecast.points().unwrap();
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn header_only_dataset_is_reported_as_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("cleaned_flights_data_final.csv"),
            "date,from,to,Class,airline,price\n",
        )
        .unwrap();
        let paths = DashboardPaths::resolve(dir.path());
        let cache = DatasetCache::new(&paths.dataset);
        let mut state = AppState::new(paths);
        state.load_dataset(&cache);

        assert!(state.load_error.is_none());
        assert!(state.selection.is_none());
        assert!(state.report.is_none());
        let msg = state.empty_dataset_message().unwrap();
        assert!(msg.contains("No fares found"), "{msg}");
    }

    #[test]
    fn load_failure_is_fatal_for_the_session() {
        let dir = TempDir::new().unwrap();
        let paths = DashboardPaths::resolve(dir.path());
        let cache = DatasetCache::new(&paths.dataset);
        let mut state = AppState::new(paths);
        state.load_dataset(&cache);

        assert!(state.table.is_none());
        assert!(state.report.is_none());
        assert!(state.load_error.as_deref().unwrap().contains("dataset not found"));
        assert!(state.empty_dataset_message().is_none());

        state.select(Selector::Origin, "Delhi");
        assert!(state.report.is_none());
    }
}
