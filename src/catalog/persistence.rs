use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::Result;
use crate::models::Item;

/// Load product records from a JSON array, in file order.
pub fn load_items<P: AsRef<Path>>(path: P) -> Result<Vec<Item>> {
    let content = fs::read_to_string(path)?;
    let items: Vec<Item> = serde_json::from_str(&content)?;
    Ok(items)
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(alias = "identifier")]
    barcode: String,
    price: f64,
}

/// Load a `barcode,price` CSV. Later rows for the same barcode win.
///
/// Rows with a negative or non-finite price are skipped.
pub fn load_prices<P: AsRef<Path>>(path: P) -> Result<HashMap<String, f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut prices = HashMap::new();
    for row in reader.deserialize::<PriceRow>() {
        let row = row?;
        if !row.price.is_finite() || row.price < 0.0 {
            warn!(barcode = %row.barcode, price = row.price, "skipping invalid price row");
            continue;
        }
        prices.insert(row.barcode, row.price);
    }
    Ok(prices)
}
