use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int32Type, Int64Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{TripRecord, TripTable, parse_date};
use crate::error::DataLoadError;

/// Columns every source table must carry. Names are case-sensitive.
pub const REQUIRED_COLUMNS: [&str; 6] = ["date", "from", "to", "Class", "airline", "price"];

// ---------------------------------------------------------------------------
// Memoised access
// ---------------------------------------------------------------------------

/// Process-scoped, load-once handle on the source table.
///
/// The first successful [`DatasetCache::load`] reads the file; every later
/// call hands out the same shared snapshot. There is no invalidation: the
/// table is read-only for the lifetime of the cache. Failed loads are not
/// cached, so the next call retries the read.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    table: OnceLock<Arc<TripTable>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the table has already been read.
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    pub fn load(&self) -> Result<Arc<TripTable>, DataLoadError> {
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load_file(&self.path)?);
        Ok(Arc::clone(self.table.get_or_init(|| table)))
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a trip table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; columns beyond [`REQUIRED_COLUMNS`] are ignored
/// * `.parquet` – same columns; `date` may be Utf8, Date32/Date64 or Timestamp
/// * `.json`    – `[{ "date": "...", "from": "...", ... }, ...]`
pub fn load_file(path: &Path) -> Result<TripTable, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::Missing(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    match &table {
        Ok(t) => log::info!("Loaded {} trip records from {}", t.len(), path.display()),
        Err(e) => log::error!("Failed to load {}: {e}", path.display()),
    }
    table
}

fn read_error(path: &Path, err: impl Into<anyhow::Error>) -> DataLoadError {
    DataLoadError::Read {
        path: path.to_path_buf(),
        source: err.into(),
    }
}

fn malformed(row: usize) -> impl FnOnce(anyhow::Error) -> DataLoadError {
    move |source| DataLoadError::MalformedRecord { row, source }
}

// ---------------------------------------------------------------------------
// Shared record construction
// ---------------------------------------------------------------------------

/// Strip thousands separators and parse a fare.
fn parse_price(s: &str) -> Result<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    cleaned
        .parse::<f64>()
        .with_context(|| format!("price '{s}' is not a number"))
}

fn parse_record_date(s: &str) -> Result<NaiveDate> {
    parse_date(s).with_context(|| format!("date '{s}' is not a calendar date"))
}

fn build_record(
    date: NaiveDate,
    from: String,
    to: String,
    class: String,
    airline: String,
    price: f64,
) -> Result<TripRecord> {
    if !price.is_finite() || price < 0.0 {
        bail!("price {price} must be a non-negative number");
    }
    Ok(TripRecord::new(date, from, to, class, airline, price))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<TripTable, DataLoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| read_error(path, e))?;
    let headers = reader.headers().map_err(|e| read_error(path, e))?.clone();

    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(DataLoadError::MissingColumn(name))
    };
    let date_idx = column("date")?;
    let from_idx = column("from")?;
    let to_idx = column("to")?;
    let class_idx = column("Class")?;
    let airline_idx = column("airline")?;
    let price_idx = column("price")?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.map_err(|e| read_error(path, e))?;
        let field = |i: usize| row.get(i).unwrap_or("").to_string();

        let record = parse_record_date(&field(date_idx))
            .and_then(|date| {
                build_record(
                    date,
                    field(from_idx),
                    field(to_idx),
                    field(class_idx),
                    field(airline_idx),
                    parse_price(&field(price_idx))?,
                )
            })
            .map_err(malformed(row_no))?;
        records.push(record);
    }

    Ok(TripTable::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "date": "2022-02-11", "from": "Delhi", "to": "Mumbai",
///     "Class": "Economy", "airline": "Vistara", "price": 5953 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<TripTable, DataLoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| read_error(path, e))?;
    let rows = root
        .as_array()
        .context("expected a top-level JSON array")
        .map_err(|e| read_error(path, e))?;

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .context("row is not a JSON object")
            .map_err(malformed(row_no))?;
        if let Some(missing) = REQUIRED_COLUMNS.into_iter().find(|c| !obj.contains_key(*c)) {
            return Err(DataLoadError::MissingColumn(missing));
        }

        let text = |key: &str| -> Result<String> {
            match obj.get(key) {
                Some(JsonValue::String(s)) => Ok(s.clone()),
                other => bail!("'{key}' must be a string, got {other:?}"),
            }
        };
        let price = || -> Result<f64> {
            match obj.get("price") {
                Some(JsonValue::Number(n)) => n.as_f64().context("price is out of range"),
                Some(JsonValue::String(s)) => parse_price(s),
                other => bail!("'price' must be a number, got {other:?}"),
            }
        };

        let record = (|| {
            build_record(
                parse_record_date(&text("date")?)?,
                text("from")?,
                text("to")?,
                text("Class")?,
                text("airline")?,
                price()?,
            )
        })()
        .map_err(malformed(row_no))?;
        records.push(record);
    }

    Ok(TripTable::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by pandas (`df.to_parquet()`) or Polars.
///
/// String columns may be Utf8 or LargeUtf8, `date` may also be Date32, Date64
/// or a timestamp of any unit, and `price` any integer or float column.
fn load_parquet(path: &Path) -> Result<TripTable, DataLoadError> {
    let file = std::fs::File::open(path).map_err(|e| read_error(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| read_error(path, e))?;
    let reader = builder.build().map_err(|e| read_error(path, e))?;

    let mut records = Vec::new();
    let mut row_no = 0usize;

    for batch_result in reader {
        let batch = batch_result.map_err(|e| read_error(path, e))?;

        let date_col = required_column(&batch, "date")?;
        let from_col = required_column(&batch, "from")?;
        let to_col = required_column(&batch, "to")?;
        let class_col = required_column(&batch, "Class")?;
        let airline_col = required_column(&batch, "airline")?;
        let price_col = required_column(&batch, "price")?;

        for row in 0..batch.num_rows() {
            let record = (|| {
                build_record(
                    date_at(date_col, row)?,
                    string_at(from_col, row)?,
                    string_at(to_col, row)?,
                    string_at(class_col, row)?,
                    string_at(airline_col, row)?,
                    price_at(price_col, row)?,
                )
            })()
            .map_err(malformed(row_no))?;
            records.push(record);
            row_no += 1;
        }
    }

    Ok(TripTable::from_records(records))
}

// -- Arrow cell helpers --

fn required_column<'a>(
    batch: &'a RecordBatch,
    name: &'static str,
) -> Result<&'a ArrayRef, DataLoadError> {
    batch
        .schema_ref()
        .index_of(name)
        .map(|i| batch.column(i))
        .map_err(|_| DataLoadError::MissingColumn(name))
}

fn string_at(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in string column");
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("expected a string column, got {other:?}"),
    }
}

fn date_at(col: &ArrayRef, row: usize) -> Result<NaiveDate> {
    if col.is_null(row) {
        bail!("null date");
    }
    match col.data_type() {
        DataType::Date32 => col
            .as_primitive::<Date32Type>()
            .value_as_date(row)
            .context("date out of range"),
        DataType::Date64 => col
            .as_primitive::<Date64Type>()
            .value_as_date(row)
            .context("date out of range"),
        // pandas writes `datetime64` columns as timestamps; the time of day is dropped.
        DataType::Timestamp(unit, _) => {
            let datetime = match unit {
                TimeUnit::Second => col
                    .as_primitive::<TimestampSecondType>()
                    .value_as_datetime(row),
                TimeUnit::Millisecond => col
                    .as_primitive::<TimestampMillisecondType>()
                    .value_as_datetime(row),
                TimeUnit::Microsecond => col
                    .as_primitive::<TimestampMicrosecondType>()
                    .value_as_datetime(row),
                TimeUnit::Nanosecond => col
                    .as_primitive::<TimestampNanosecondType>()
                    .value_as_datetime(row),
            };
            datetime.map(|dt| dt.date()).context("timestamp out of range")
        }
        DataType::Utf8 | DataType::LargeUtf8 => parse_record_date(&string_at(col, row)?),
        other => bail!("expected a date, timestamp or string date column, got {other:?}"),
    }
}

fn price_at(col: &ArrayRef, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null price");
    }
    match col.data_type() {
        DataType::Int32 => Ok(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => Ok(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => Ok(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Ok(col.as_primitive::<Float64Type>().value(row)),
        DataType::Utf8 | DataType::LargeUtf8 => parse_price(&string_at(col, row)?),
        other => bail!("expected a numeric price column, got {other:?}"),
    }
}
