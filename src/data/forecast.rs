use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::model::{ForecastPoint, SelectionKey, parse_date};
use crate::error::ForecastParseError;

/// Columns a forecast artifact must carry.
pub const REQUIRED_COLUMNS: [&str; 2] = ["ds", "yhat"];

// ---------------------------------------------------------------------------
// Artifact naming
// ---------------------------------------------------------------------------

/// File name of the forecast artifact for `key`.
///
/// The city pair is joined with `_`, spaces become `_` and the result is
/// lowercased; the class is only lowercased. Keys that differ only in letter
/// case, or in a space versus an underscore inside a city name, share a file:
/// `("New Delhi", "Mumbai", "Economy")` → `forecast_new_delhi_mumbai_economy.csv`.
pub fn forecast_file_name(key: &SelectionKey) -> String {
    let pair = format!("{}_{}", key.origin, key.destination)
        .replace(' ', "_")
        .to_lowercase();
    format!("forecast_{pair}_{}.csv", key.class.to_lowercase())
}

pub fn forecast_path(forecasts_dir: &Path, key: &SelectionKey) -> PathBuf {
    forecasts_dir.join(forecast_file_name(key))
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ForecastRow {
    ds: String,
    yhat: f64,
    yhat_lower: Option<f64>,
    yhat_upper: Option<f64>,
}

/// Load the precomputed forecast for `key`, if one has been produced.
///
/// `Ok(None)` means no artifact exists yet. Points keep the order in which
/// the artifact stores them.
pub fn lookup_forecast(
    forecasts_dir: &Path,
    key: &SelectionKey,
) -> Result<Option<Vec<ForecastPoint>>, ForecastParseError> {
    let path = forecast_path(forecasts_dir, key);
    if !path.exists() {
        log::warn!("No forecast artifact at {}", path.display());
        return Ok(None);
    }

    let points = read_forecast(&path)?;
    log::info!("Loaded {} forecast points from {}", points.len(), path.display());
    Ok(Some(points))
}

/// Parse a Prophet-style forecast CSV (`ds`, `yhat`, optional
/// `yhat_lower`/`yhat_upper`).
pub fn read_forecast(path: &Path) -> Result<Vec<ForecastPoint>, ForecastParseError> {
    let read_err = |source| ForecastParseError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(read_err)?;
    let headers = reader.headers().map_err(read_err)?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ForecastParseError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    let mut points = Vec::new();
    for (row, result) in reader.deserialize::<ForecastRow>().enumerate() {
        let bad_row = |reason: String| ForecastParseError::BadRow {
            path: path.to_path_buf(),
            row,
            reason,
        };
        let raw = result.map_err(|e| bad_row(e.to_string()))?;
        let date =
            parse_date(&raw.ds).ok_or_else(|| bad_row(format!("'{}' is not a date", raw.ds)))?;
        points.push(ForecastPoint {
            interval: raw.yhat_lower.zip(raw.yhat_upper),
            ..ForecastPoint::new(date, raw.yhat)
        });
    }
    Ok(points)
}
