use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

const CITIES: [&str; 4] = ["Delhi", "Mumbai", "Bangalore", "New Delhi"];
const AIRLINES: [(&str, f64); 4] = [
    ("Indigo", 0.95),
    ("Vistara", 1.10),
    ("Air India", 1.05),
    ("SpiceJet", 0.90),
];
const CLASSES: [(&str, f64); 2] = [("Economy", 1.0), ("Business", 4.5)];
const HISTORY_DAYS: i64 = 60;
const FORECAST_DAYS: i64 = 30;

#[derive(Debug, Serialize)]
struct TripRow {
    date: String,
    airline: String,
    from: String,
    to: String,
    #[serde(rename = "Class")]
    class: String,
    price: i64,
}

#[derive(Debug, Serialize)]
struct ForecastRow {
    ds: String,
    yhat: f64,
    yhat_lower: f64,
    yhat_upper: f64,
}

/// Mirrors `data::forecast::forecast_file_name`, which the dashboard uses to
/// look artifacts up. Both are pinned to the same names by their tests.
fn forecast_file_name(from: &str, to: &str, class: &str) -> String {
    let pair = format!("{from}_{to}").replace(' ', "_").to_lowercase();
    format!("forecast_{pair}_{}.csv", class.to_lowercase())
}

fn base_fare(from: &str, to: &str) -> f64 {
    // Deterministic per-route base derived from the city names.
    let seed: u32 = from.bytes().chain(to.bytes()).map(u32::from).sum();
    3000.0 + (seed % 40) as f64 * 75.0
}

fn write_parquet(path: &Path, rows: &[TripRow], epoch: NaiveDate) -> Result<()> {
    let dates: Vec<i32> = rows
        .iter()
        .map(|r| -> Result<i32> {
            let d = NaiveDate::parse_from_str(&r.date, "%Y-%m-%d")?;
            Ok((d - epoch).num_days() as i32)
        })
        .collect::<Result<_>>()?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("airline", DataType::Utf8, false),
        Field::new("from", DataType::Utf8, false),
        Field::new("to", DataType::Utf8, false),
        Field::new("Class", DataType::Utf8, false),
        Field::new("price", DataType::Float64, false),
    ]));
    let text = |f: fn(&TripRow) -> &str| StringArray::from(rows.iter().map(f).collect::<Vec<_>>());

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Date32Array::from(dates)),
            Arc::new(text(|r| r.airline.as_str())),
            Arc::new(text(|r| r.from.as_str())),
            Arc::new(text(|r| r.to.as_str())),
            Arc::new(text(|r| r.class.as_str())),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.price as f64).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let forecasts_dir = out_dir.join("predictions");
    std::fs::create_dir_all(&forecasts_dir)
        .with_context(|| format!("creating {}", forecasts_dir.display()))?;

    let mut rng = StdRng::seed_from_u64(42);
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch")?;
    let start = NaiveDate::from_ymd_opt(2022, 2, 11).context("start date")?;

    let mut rows = Vec::new();
    let mut forecasts = 0usize;

    for from in CITIES {
        for to in CITIES.iter().copied().filter(|to| *to != from) {
            let base = base_fare(from, to);
            for (class, class_factor) in CLASSES {
                for day in 0..HISTORY_DAYS {
                    let date = start + Duration::days(day);
                    // Fares drift upward over the window.
                    let trend = 1.0 + day as f64 / HISTORY_DAYS as f64 * 0.3;
                    for (airline, airline_factor) in AIRLINES {
                        if rng.gen_bool(0.35) {
                            continue;
                        }
                        let noise = rng.gen_range(0.9..1.1);
                        let price = base * class_factor * airline_factor * trend * noise;
                        rows.push(TripRow {
                            date: date.format("%Y-%m-%d").to_string(),
                            airline: airline.to_string(),
                            from: from.to_string(),
                            to: to.to_string(),
                            class: class.to_string(),
                            price: price.round() as i64,
                        });
                    }
                }

                // Leave some selections without a forecast.
                if rng.gen_bool(0.25) {
                    continue;
                }
                let path = forecasts_dir.join(forecast_file_name(from, to, class));
                let mut writer = csv::Writer::from_path(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                let last = base * class_factor * 1.3;
                for day in 1..=FORECAST_DAYS {
                    let yhat = last * (1.0 + day as f64 * 0.004) + rng.gen_range(-50.0..50.0);
                    let spread = 150.0 + day as f64 * 10.0;
                    writer.serialize(ForecastRow {
                        ds: (start + Duration::days(HISTORY_DAYS - 1 + day))
                            .format("%Y-%m-%d")
                            .to_string(),
                        yhat,
                        yhat_lower: yhat - spread,
                        yhat_upper: yhat + spread,
                    })?;
                }
                writer.flush()?;
                forecasts += 1;
            }
        }
    }

    let csv_path = out_dir.join("cleaned_flights_data_final.csv");
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("creating {}", csv_path.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let parquet_path = out_dir.join("cleaned_flights_data_final.parquet");
    write_parquet(&parquet_path, &rows, epoch)?;

    println!(
        "Wrote {} fares to {} and {}, {forecasts} forecasts to {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display(),
        forecasts_dir.display()
    );
    Ok(())
}
