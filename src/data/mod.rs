/// Data layer: core types, loading, filtering, aggregation and forecasts.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TripTable (memoised by DatasetCache)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  SelectionKey → FilteredView
///   └──────────┘
///        │
///        ├──────────────────┐
///        ▼                  ▼
///   ┌───────────┐     ┌───────────┐
///   │ aggregate │     │ forecast  │  predictions/forecast_*.csv
///   └───────────┘     └───────────┘
///        │                  │
///        └──────┬───────────┘
///               ▼
///         ┌──────────┐
///         │  report   │  SelectionReport for the UI
///         └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod forecast;
pub mod loader;
pub mod model;
pub mod report;
