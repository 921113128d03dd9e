mod enrich;
mod persistence;
mod resolver;

use std::collections::HashMap;
use std::path::Path;

use strsim::jaro_winkler;
use thiserror::Error;
use tracing::info;

use crate::error::Result;
use crate::models::{Item, LookupFailure};

pub use enrich::{enrich_item, estimate_impact, infer_category, score_from_nutriments};
pub use persistence::{load_items, load_prices};
pub use resolver::{resolve_lines, Resolution};

/// Minimum Jaro-Winkler similarity for a fuzzy search hit.
pub const SEARCH_SIMILARITY_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("product not found: {0}")]
    NotFound(String),

    #[error("lookup for {identifier} timed out after {after_ms} ms")]
    Timeout { identifier: String, after_ms: u64 },

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    /// Failure kind reported in response warnings.
    pub fn failure(&self) -> LookupFailure {
        match self {
            CatalogError::NotFound(_) => LookupFailure::NotFound,
            CatalogError::Timeout { .. } => LookupFailure::Timeout,
            CatalogError::Unavailable(_) => LookupFailure::Unavailable,
        }
    }
}

/// Read-only product lookup the planner depends on.
pub trait Catalog: Send + Sync {
    fn lookup(&self, identifier: &str) -> std::result::Result<Item, CatalogError>;
}

/// In-memory product catalog keyed by identifier.
pub struct ProductCatalog {
    items: HashMap<String, Item>,
    /// Identifiers in load order, for deterministic search output.
    order: Vec<String>,
}

impl ProductCatalog {
    /// Build from records; a repeated identifier replaces the earlier record.
    pub fn new(items: Vec<Item>) -> Self {
        let mut map = HashMap::new();
        let mut order = Vec::new();
        for item in items {
            let key = item.identifier.trim().to_string();
            if map.insert(key.clone(), item).is_none() {
                order.push(key);
            }
        }
        Self { items: map, order }
    }

    /// Load records from a JSON file, optionally overlay a price list, then enrich.
    pub fn load<P: AsRef<Path>>(path: P, prices: Option<&Path>) -> Result<Self> {
        let mut catalog = Self::new(load_items(path)?);
        if let Some(prices_path) = prices {
            let applied = catalog.apply_prices(&load_prices(prices_path)?);
            info!(applied, "applied price list");
        }
        catalog.enrich();
        info!(products = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn get(&self, identifier: &str) -> Option<&Item> {
        self.items.get(identifier.trim())
    }

    /// Overwrite prices by identifier; unknown identifiers are ignored.
    pub fn apply_prices(&mut self, prices: &HashMap<String, f64>) -> usize {
        let mut applied = 0;
        for (identifier, price) in prices {
            if let Some(item) = self.items.get_mut(identifier) {
                item.price = *price;
                applied += 1;
            }
        }
        applied
    }

    /// Fill in derived scores and impact estimates for every record.
    pub fn enrich(&mut self) {
        for item in self.items.values_mut() {
            enrich_item(item);
        }
    }

    /// Fuzzy search over name and brand, best match first.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Item> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<(&Item, f64)> = self
            .order
            .iter()
            .filter_map(|id| self.items.get(id))
            .filter_map(|item| {
                let name = item.name.to_lowercase();
                let brand = item.brand.as_deref().unwrap_or_default().to_lowercase();
                let similarity = if name.contains(&query) || brand.contains(&query) {
                    1.0
                } else {
                    jaro_winkler(&name, &query).max(jaro_winkler(&brand, &query))
                };
                (similarity >= SEARCH_SIMILARITY_THRESHOLD).then_some((item, similarity))
            })
            .collect();

        hits.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        hits.into_iter().take(limit).map(|(item, _)| item).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Catalog for ProductCatalog {
    fn lookup(&self, identifier: &str) -> std::result::Result<Item, CatalogError> {
        self.get(identifier)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(identifier.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn item(id: &str, name: &str, brand: Option<&str>, price: f64) -> Item {
        Item {
            identifier: id.to_string(),
            name: name.to_string(),
            brand: brand.map(str::to_string),
            price,
            sustainability_score: Some(50.0),
            category: None,
            impact: None,
            nutriments: BTreeMap::new(),
        }
    }

    fn sample_catalog() -> ProductCatalog {
        ProductCatalog::new(vec![
            item("001", "Whole Milk", Some("Colun"), 1100.0),
            item("002", "Oat Milk", Some("Verde"), 1900.0),
            item("003", "Brown Rice", Some("Tucapel"), 1500.0),
        ])
    }

    #[test]
    fn test_lookup_found_and_missing() {
        let catalog = sample_catalog();
        assert_eq!(catalog.lookup("002").unwrap().name, "Oat Milk");
        assert_eq!(
            catalog.lookup("999"),
            Err(CatalogError::NotFound("999".to_string()))
        );
    }

    #[test]
    fn test_missing_product_surfaces_as_catalog_error() {
        let err: crate::error::BasketError = sample_catalog().lookup("999").unwrap_err().into();
        assert!(matches!(err, crate::error::BasketError::Catalog(CatalogError::NotFound(_))));
        assert_eq!(err.to_string(), "Catalog error: product not found: 999");
    }

    #[test]
    fn test_duplicate_identifier_last_wins() {
        let catalog = ProductCatalog::new(vec![
            item("001", "Old", None, 1.0),
            item("001", "New", None, 2.0),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("001").unwrap().name, "New");
    }

    #[test]
    fn test_apply_prices_ignores_unknown() {
        let mut catalog = sample_catalog();
        let prices = HashMap::from([("001".to_string(), 990.0), ("777".to_string(), 5.0)]);
        assert_eq!(catalog.apply_prices(&prices), 1);
        assert_eq!(catalog.get("001").unwrap().price, 990.0);
    }

    #[test]
    fn test_search_substring_and_fuzzy() {
        let catalog = sample_catalog();

        let milks: Vec<_> = catalog.search("milk", 10).iter().map(|i| i.identifier.clone()).collect();
        assert_eq!(milks, vec!["001", "002"]);

        let fuzzy = catalog.search("brown rise", 10);
        assert_eq!(fuzzy[0].identifier, "003");

        assert!(catalog.search("   ", 10).is_empty());
        assert_eq!(catalog.search("milk", 1).len(), 1);
    }
}
