use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::de::DeserializeOwned;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use super::error::DatasetError;
use super::model::RawTables;

// ---------------------------------------------------------------------------
// Table names
// ---------------------------------------------------------------------------

pub const CUSTOMERS: &str = "olist_customers_dataset";
pub const ORDERS: &str = "olist_orders_dataset";
pub const ORDER_ITEMS: &str = "olist_order_items_dataset";
pub const PRODUCTS: &str = "olist_products_dataset";
pub const PAYMENTS: &str = "olist_order_payments_dataset";
pub const REVIEWS: &str = "olist_order_reviews_dataset";
pub const CATEGORY_TRANSLATION: &str = "product_category_name_translation";

/// Extensions tried, in order, when resolving a table inside a directory.
const EXTENSIONS: [&str; 4] = ["csv", "json", "parquet", "pq"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every table of the dataset found in `dir`.
///
/// Any missing or unreadable table aborts the whole load.
pub fn load_dataset(dir: &Path) -> Result<RawTables> {
    log::info!("Loading dataset from {}", dir.display());

    let tables = RawTables {
        customers: load_named(dir, CUSTOMERS)?,
        orders: load_named(dir, ORDERS)?,
        items: load_named(dir, ORDER_ITEMS)?,
        products: load_named(dir, PRODUCTS)?,
        payments: load_named(dir, PAYMENTS)?,
        reviews: load_named(dir, REVIEWS)?,
        categories: load_named(dir, CATEGORY_TRANSLATION)?,
    };
    Ok(tables)
}

/// Find the file backing `table` inside `dir`.
pub fn resolve_table(dir: &Path, table: &str) -> Result<PathBuf, DatasetError> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{table}.{ext}")))
        .find(|p| p.is_file())
        .ok_or_else(|| DatasetError::MissingTable {
            table: table.to_string(),
            dir: dir.to_path_buf(),
        })
}

/// Load a single table file into typed rows.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; extra columns are ignored
/// * `.json`    – `[{ "order_id": "...", ... }, ...]`
/// * `.parquet` – flat columns of strings, integers, floats or booleans;
///   dictionary, decimal and date columns are decoded first
pub fn load_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DatasetError::UnsupportedExtension {
            extension: other.to_string(),
        }
        .into()),
    }
}

fn load_named<T: DeserializeOwned>(dir: &Path, table: &str) -> Result<Vec<T>> {
    let path = resolve_table(dir, table)?;
    let rows: Vec<T> =
        load_table(&path).with_context(|| format!("loading table '{table}' from {path:?}"))?;
    log::info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Empty cells become `None` for optional fields; a missing required column
/// fails on the first row.
fn load_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;

    reader
        .deserialize()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "order_id": "e481f51c...", "payment_type": "credit_card", "payment_value": 18.12 },
///   ...
/// ]
/// ```
fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let JsonValue::Array(records) = root else {
        return Err(DatasetError::NotJsonRecords {
            path: path.to_path_buf(),
        }
        .into());
    };

    records
        .into_iter()
        .enumerate()
        .map(|(i, rec)| {
            if !rec.is_object() {
                anyhow::bail!("Row {i} is not a JSON object");
            }
            serde_json::from_value(rec).with_context(|| format!("Row {i}"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet table.
///
/// Each row is bridged through a JSON object so the same serde row types
/// serve every format. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let columns = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(field, col)| -> Result<(String, ArrayRef)> {
                Ok((field.name().clone(), decode_column(field.name(), col)?))
            })
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let mut object = JsonMap::with_capacity(columns.len());
            for (name, col) in &columns {
                object.insert(name.clone(), extract_json_value(name, col, row)?);
            }
            let parsed = serde_json::from_value(JsonValue::Object(object))
                .with_context(|| format!("Parquet row {}", rows.len()))?;
            rows.push(parsed);
        }
    }

    Ok(rows)
}

/// Cast encodings without a direct JSON form to plain columns.
///
/// Pandas writes categorical columns as dictionaries and timestamps as
/// `Timestamp`; both are decoded once per batch.
fn decode_column(name: &str, col: &ArrayRef) -> Result<ArrayRef> {
    let target = match col.data_type() {
        DataType::Dictionary(_, values) => {
            let decoded = cast(col, values)
                .with_context(|| format!("decoding dictionary column '{name}'"))?;
            return decode_column(name, &decoded);
        }
        DataType::Utf8View => DataType::Utf8,
        DataType::Decimal128(..) | DataType::Decimal256(..) => DataType::Float64,
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(..) => DataType::Utf8,
        _ => return Ok(Arc::clone(col)),
    };
    cast(col, &target).with_context(|| format!("casting column '{name}' to {target:?}"))
}

/// Extract a single cell from an Arrow column as a JSON value.
fn extract_json_value(name: &str, col: &ArrayRef, row: usize) -> Result<JsonValue, DatasetError> {
    if col.is_null(row) {
        return Ok(JsonValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => JsonValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => JsonValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => JsonValue::from(col.as_primitive::<Int8Type>().value(row)),
        DataType::Int16 => JsonValue::from(col.as_primitive::<Int16Type>().value(row)),
        DataType::Int32 => JsonValue::from(col.as_primitive::<Int32Type>().value(row)),
        DataType::Int64 => JsonValue::from(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => JsonValue::from(col.as_primitive::<UInt8Type>().value(row)),
        DataType::UInt16 => JsonValue::from(col.as_primitive::<UInt16Type>().value(row)),
        DataType::UInt32 => JsonValue::from(col.as_primitive::<UInt32Type>().value(row)),
        DataType::UInt64 => JsonValue::from(col.as_primitive::<UInt64Type>().value(row)),
        DataType::Float32 => float_value(f64::from(col.as_primitive::<Float32Type>().value(row))),
        DataType::Float64 => float_value(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => JsonValue::Bool(col.as_boolean().value(row)),
        other => {
            return Err(DatasetError::UnsupportedColumn {
                column: name.to_string(),
                data_type: format!("{other:?}"),
            });
        }
    };
    Ok(value)
}

/// Largest magnitude below which every whole f64 is an exact integer.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// NaN has no JSON representation and maps to null, the way Pandas treats it.
/// Whole numbers become JSON integers: Pandas stores an integer column with
/// gaps as float64, and the row types read those cells as integers.
fn float_value(v: f64) -> JsonValue {
    if v.fract() == 0.0 && v.abs() < MAX_EXACT_INT {
        return JsonValue::from(v as i64);
    }
    Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number)
}
