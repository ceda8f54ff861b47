use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use super::model::{AirlineAverage, DailyAverage, FilteredView, SummaryStats};
use crate::error::EmptyViewError;

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Headline fares for a non-empty view.
///
/// Average, minimum and maximum are truncated toward zero. `top_airline` is
/// the most frequent airline; on a tie the airline seen first in the view
/// wins.
pub fn summarize(view: &FilteredView<'_>) -> Result<SummaryStats, EmptyViewError> {
    let records = view.records();
    if records.is_empty() {
        return Err(EmptyViewError);
    }

    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for rec in records {
        sum += rec.price;
        min = min.min(rec.price);
        max = max.max(rec.price);
    }
    let mean = sum / records.len() as f64;

    let top_airline = most_frequent(records.iter().map(|r| r.airline.as_str()))
        .ok_or(EmptyViewError)?
        .to_string();

    let stats = SummaryStats {
        average_price: mean.trunc() as i64,
        min_price: min.trunc() as i64,
        max_price: max.trunc() as i64,
        top_airline,
    };
    log::debug!("Summary over {} records: {stats:?}", records.len());
    Ok(stats)
}

/// Mode of `values`, ties resolved in favour of the first value encountered.
fn most_frequent<'a>(values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    // value → (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (pos, v) in values.enumerate() {
        counts.entry(v).or_insert((0, pos)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (ca, pa)), (_, (cb, pb))| ca.cmp(cb).then(pb.cmp(pa)))
        .map(|(v, _)| v)
}

// ---------------------------------------------------------------------------
// Grouped aggregates
// ---------------------------------------------------------------------------

/// Mean fare per calendar date, ascending by date.
pub fn daily_trend(view: &FilteredView<'_>) -> Vec<DailyAverage> {
    let mut groups: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for rec in view.records() {
        let slot = groups.entry(rec.date).or_insert((0.0, 0));
        slot.0 += rec.price;
        slot.1 += 1;
    }
    groups
        .into_iter()
        .map(|(date, (sum, n))| DailyAverage {
            date,
            mean_price: sum / n as f64,
        })
        .collect()
}

/// Mean fare per airline, highest first.
///
/// The sort is stable over first-appearance order, so airlines with equal
/// means keep the order in which the view first mentions them.
pub fn airline_breakdown(view: &FilteredView<'_>) -> Vec<AirlineAverage> {
    let mut order: Vec<(&str, f64, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for rec in view.records() {
        let i = *index.entry(rec.airline.as_str()).or_insert_with(|| {
            order.push((rec.airline.as_str(), 0.0, 0));
            order.len() - 1
        });
        order[i].1 += rec.price;
        order[i].2 += 1;
    }

    let mut averages: Vec<AirlineAverage> = order
        .into_iter()
        .map(|(airline, sum, n)| AirlineAverage {
            airline: airline.to_string(),
            mean_price: sum / n as f64,
        })
        .collect();
    averages.sort_by(|a, b| b.mean_price.total_cmp(&a.mean_price));
    averages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter;
    use crate::data::model::{SelectionKey, TripRecord, TripTable};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn records(rows: &[(u32, &str, f64)]) -> Vec<TripRecord> {
        rows.iter()
            .map(|&(d, airline, price)| {
                TripRecord::new(day(d), "Delhi", "Mumbai", "Economy", airline, price)
            })
            .collect()
    }

    fn view(records: &[TripRecord]) -> FilteredView<'_> {
        FilteredView::new(records.iter().collect())
    }

    #[test]
    fn summary_of_three_fares() {
        let recs = records(&[(1, "A", 4000.0), (2, "B", 5000.0), (3, "A", 6000.0)]);
        let stats = summarize(&view(&recs)).unwrap();
        assert_eq!(
            stats,
            SummaryStats {
                average_price: 5000,
                min_price: 4000,
                max_price: 6000,
                top_airline: "A".into(),
            }
        );
    }

    #[test]
    fn average_is_truncated_not_rounded() {
        let recs = records(&[(1, "A", 100.0), (1, "A", 101.0), (1, "A", 101.0)]);
        // mean = 100.666…
        let stats = summarize(&view(&recs)).unwrap();
        assert_eq!(stats.average_price, 100);
        assert!(stats.min_price <= stats.average_price && stats.average_price <= stats.max_price);
    }

    #[test]
    fn top_airline_tie_goes_to_first_seen() {
        let recs = records(&[(1, "B", 1.0), (1, "A", 1.0), (2, "A", 1.0), (2, "B", 1.0)]);
        assert_eq!(summarize(&view(&recs)).unwrap().top_airline, "B");

        let recs = records(&[(1, "C", 1.0), (1, "A", 1.0), (2, "A", 1.0)]);
        assert_eq!(summarize(&view(&recs)).unwrap().top_airline, "A");
    }

    #[test]
    fn every_observed_selection_has_ordered_summary() {
        let table = TripTable::from_records(vec![
            TripRecord::new(day(1), "Delhi", "Mumbai", "Economy", "A", 4000.9),
            TripRecord::new(day(2), "Delhi", "Mumbai", "Economy", "B", 4001.2),
            TripRecord::new(day(1), "Delhi", "Mumbai", "Business", "A", 9999.99),
            TripRecord::new(day(1), "Mumbai", "Delhi", "Economy", "C", 0.5),
            TripRecord::new(day(2), "Mumbai", "Delhi", "Economy", "C", 0.75),
            TripRecord::new(day(3), "Mumbai", "Delhi", "Economy", "A", 12000.0),
            TripRecord::new(day(1), "New Delhi", "Chennai", "Economy", "B", 3333.3),
        ]);
        for rec in table.records() {
            let key = SelectionKey::new(&rec.from, &rec.to, &rec.class);
            let view = filter(&table, &key);
            let stats = summarize(&view).unwrap();
            assert!(
                stats.min_price <= stats.average_price && stats.average_price <= stats.max_price,
                "{key:?}: {stats:?}"
            );
            assert!(view.records().iter().any(|r| r.airline == stats.top_airline));
            let days = daily_trend(&view).len();
            assert!((1..=view.len()).contains(&days));
        }
    }

    #[test]
    fn summarize_rejects_empty_view() {
        assert_eq!(summarize(&FilteredView::default()), Err(EmptyViewError));
    }

    #[test]
    fn daily_trend_is_ascending_and_unique() {
        let recs = records(&[(3, "A", 300.0), (1, "A", 100.0), (3, "B", 500.0), (2, "A", 200.0)]);
        let trend = daily_trend(&view(&recs));
        assert_eq!(
            trend,
            vec![
                DailyAverage { date: day(1), mean_price: 100.0 },
                DailyAverage { date: day(2), mean_price: 200.0 },
                DailyAverage { date: day(3), mean_price: 400.0 },
            ]
        );
        assert!(trend.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn airline_breakdown_sorts_descending_with_stable_ties() {
        let recs = records(&[(1, "A", 4000.0), (2, "B", 5000.0), (3, "A", 6000.0)]);
        let breakdown = airline_breakdown(&view(&recs));
        assert_eq!(
            breakdown,
            vec![
                AirlineAverage { airline: "A".into(), mean_price: 5000.0 },
                AirlineAverage { airline: "B".into(), mean_price: 5000.0 },
            ]
        );

        let recs = records(&[(1, "C", 10.0), (1, "A", 30.0), (1, "B", 20.0), (2, "C", 50.0)]);
        let breakdown = airline_breakdown(&view(&recs));
        let names: Vec<&str> = breakdown.iter().map(|a| a.airline.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert!(breakdown.windows(2).all(|w| w[0].mean_price >= w[1].mean_price));
    }

    #[test]
    fn grouped_aggregates_of_empty_view_are_empty() {
        assert!(daily_trend(&FilteredView::default()).is_empty());
        assert!(airline_breakdown(&FilteredView::default()).is_empty());
    }
}
