use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// TripRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single observed fare.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub date: NaiveDate,
    pub from: String,
    pub to: String,
    pub class: String,
    pub airline: String,
    /// Fare in whole currency units, never negative.
    pub price: f64,
    /// Display label `"{from} → {to}"`, derived at load time.
    pub route: String,
}

impl TripRecord {
    pub fn new(
        date: NaiveDate,
        from: impl Into<String>,
        to: impl Into<String>,
        class: impl Into<String>,
        airline: impl Into<String>,
        price: f64,
    ) -> Self {
        let from = from.into();
        let to = to.into();
        let route = route_label(&from, &to);
        Self {
            date,
            from,
            to,
            class: class.into(),
            airline: airline.into(),
            price,
            route,
        }
    }
}

pub fn route_label(from: &str, to: &str) -> String {
    format!("{from} → {to}")
}

// ---------------------------------------------------------------------------
// TripTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All trip records, immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct TripTable {
    records: Vec<TripRecord>,
}

impl TripTable {
    pub fn from_records(records: Vec<TripRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct airline names.
    pub fn airlines(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.airline.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted distinct values for each selector.
    pub fn options(&self) -> SelectionOptions {
        let mut origins = BTreeSet::new();
        let mut destinations = BTreeSet::new();
        let mut classes = BTreeSet::new();
        for rec in &self.records {
            origins.insert(rec.from.clone());
            destinations.insert(rec.to.clone());
            classes.insert(rec.class.clone());
        }
        SelectionOptions {
            origins: origins.into_iter().collect(),
            destinations: destinations.into_iter().collect(),
            classes: classes.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// The (origin, destination, class) triple chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectionKey {
    pub origin: String,
    pub destination: String,
    pub class: String,
}

impl SelectionKey {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            class: class.into(),
        }
    }
}

/// Values observed in the table, offered by the selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionOptions {
    pub origins: Vec<String>,
    pub destinations: Vec<String>,
    pub classes: Vec<String>,
}

impl SelectionOptions {
    /// First value of each selector, or `None` for an empty table.
    pub fn default_key(&self) -> Option<SelectionKey> {
        Some(SelectionKey::new(
            self.origins.first()?.clone(),
            self.destinations.first()?.clone(),
            self.classes.first()?.clone(),
        ))
    }
}

// ---------------------------------------------------------------------------
// FilteredView – records matching a selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a TripRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn new(records: Vec<&'a TripRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[&'a TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Route label shared by every record of the view.
    pub fn route(&self) -> Option<&'a str> {
        self.records.first().map(|r| r.route.as_str())
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Headline figures for a selection. Prices are truncated, not rounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryStats {
    pub average_price: i64,
    pub min_price: i64,
    pub max_price: i64,
    pub top_airline: String,
}

/// Mean fare for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyAverage {
    pub date: NaiveDate,
    pub mean_price: f64,
}

/// Mean fare for one airline.
#[derive(Debug, Clone, PartialEq)]
pub struct AirlineAverage {
    pub airline: String,
    pub mean_price: f64,
}

/// One row of a forecast artifact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_price: f64,
    /// `(yhat_lower, yhat_upper)` when the artifact carries them.
    pub interval: Option<(f64, f64)>,
}

impl ForecastPoint {
    pub fn new(date: NaiveDate, predicted_price: f64) -> Self {
        Self {
            date,
            predicted_price,
            interval: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a calendar date as written by pandas or Prophet.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `DD-MM-YYYY`, and ISO timestamps whose
/// time part is discarded. The year must have four digits, so `11-02-22` is
/// rejected rather than read as year 11.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let four_digit_year = |d: &NaiveDate| (1000..=9999).contains(&d.year());
    DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .find(four_digit_year)
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
                .find(four_digit_year)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_supported_date_layouts() {
        assert_eq!(parse_date("2024-01-05"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date(" 2024/01/05 "), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("05-01-2024"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 00:00:00"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T13:30:00"), Some(date(2024, 1, 5)));
    }

    #[test]
    fn rejects_invalid_dates() {
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("11-02-22"), None);
        assert_eq!(parse_date("22/02/11"), None);
        assert_eq!(parse_date("0011-02-22 00:00:00"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn route_is_derived_from_cities() {
        let rec = TripRecord::new(date(2024, 1, 1), "Delhi", "Mumbai", "Economy", "A", 10.0);
        assert_eq!(rec.route, "Delhi → Mumbai");
    }

    #[test]
    fn options_are_sorted_and_distinct() {
        let d = date(2024, 1, 1);
        let table = TripTable::from_records(vec![
            TripRecord::new(d, "Mumbai", "Delhi", "Economy", "A", 1.0),
            TripRecord::new(d, "Delhi", "Mumbai", "Business", "B", 2.0),
            TripRecord::new(d, "Delhi", "Chennai", "Economy", "A", 3.0),
        ]);
        let opts = table.options();
        assert_eq!(opts.origins, vec!["Delhi", "Mumbai"]);
        assert_eq!(opts.destinations, vec!["Chennai", "Delhi", "Mumbai"]);
        assert_eq!(opts.classes, vec!["Business", "Economy"]);
        assert_eq!(table.airlines(), vec!["A", "B"]);
        assert_eq!(
            opts.default_key(),
            Some(SelectionKey::new("Delhi", "Chennai", "Business"))
        );
        assert_eq!(SelectionOptions::default().default_key(), None);
    }
}
