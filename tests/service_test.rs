use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tempfile::NamedTempFile;

use eco_basket_rs::catalog::{Catalog, CatalogError, ProductCatalog};
use eco_basket_rs::config::EngineConfig;
use eco_basket_rs::models::{
    CartLine, Constraints, ExclusionReason, Item, KnapsackRequest, LookupFailure, Objective,
    OptimizeRequest, SelectionMode,
};
use eco_basket_rs::service::BasketService;

const PRODUCTS: &str = r#"[
    {"barcode": "780001", "name": "Leche Entera", "brand": "Colun", "price": 1100,
     "sustainability_score": 55, "category": "dairy",
     "environmental_impact": {"co2_kg": 1.2, "water_liters": 300, "waste_kg": 0.04, "energy_kwh": 0.9}},
    {"barcode": "780002", "name": "Lentejas", "brand": "Huerto Local", "price": 1600,
     "sustainability_score": 88, "category": "legumes"},
    {"barcode": "780003", "name": "Lomo Vetado", "brand": "Carnes Sur", "price": 9000,
     "sustainability_score": 20, "category": "beef"},
    {"barcode": "780004", "name": "Galletas", "price": 900,
     "nutriments": {"nova_group": 4, "sugars_100g": 30}}
]"#;

fn catalog_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(PRODUCTS.as_bytes()).unwrap();
    file
}

fn load_service() -> BasketService {
    let file = catalog_file();
    let catalog = ProductCatalog::load(file.path(), None).unwrap();
    BasketService::new(Arc::new(catalog), EngineConfig::default())
}

#[test]
fn test_catalog_load_enriches_missing_fields() {
    let file = catalog_file();
    let catalog = ProductCatalog::load(file.path(), None).unwrap();

    assert_eq!(catalog.len(), 4);
    let cookies = catalog.get("780004").unwrap();
    // 100 - 3 * 8 - 30 * 0.5
    assert_eq!(cookies.sustainability_score, Some(61.0));
    assert!(cookies.impact.is_some());

    let lentils = catalog.get("780002").unwrap();
    assert!(lentils.unit_impact().co2_kg > 0.0);
}

#[test]
fn test_price_list_overrides_catalog() {
    let file = catalog_file();
    let mut prices = NamedTempFile::new().unwrap();
    writeln!(prices, "barcode,price\n780001,990\n999999,1").unwrap();

    let catalog = ProductCatalog::load(file.path(), Some(prices.path())).unwrap();
    assert_eq!(catalog.get("780001").unwrap().price, 990.0);
    assert_eq!(catalog.get("780002").unwrap().price, 1600.0);
}

#[tokio::test]
async fn test_optimize_end_to_end() {
    let service = load_service();
    let request = OptimizeRequest {
        items: vec![
            CartLine::new("780001", 2),
            CartLine::new("780002", 1),
            CartLine::new("780003", 1),
            CartLine::new("000000", 1),
        ],
        constraints: Constraints {
            budget: Some(4000.0),
            objective: Objective::Healthiest,
            excluded_categories: vec!["beef".to_string()],
            preferences: vec![],
        },
    };

    let result = service.optimize(&request).await.unwrap();

    assert_eq!(result.mode, SelectionMode::ListOptimization);
    assert_eq!(result.items[0].identifier, "780002");
    assert_eq!(result.quantity_of("780001"), 2);
    assert_eq!(result.total_cost, 3800.0);
    assert_eq!(result.budget_remaining, Some(200.0));
    assert_eq!(result.budget_used_pct, Some(95.0));

    assert_eq!(result.excluded.len(), 1);
    assert_eq!(
        result.excluded[0].reason,
        ExclusionReason::ExcludedCategory {
            category: "beef".to_string()
        }
    );
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].identifier, "000000");
    assert_eq!(result.warnings[0].failure, LookupFailure::NotFound);
}

#[tokio::test]
async fn test_knapsack_end_to_end_serializes() {
    let service = load_service();
    let request: KnapsackRequest = serde_json::from_str(
        r#"{"budget": 3000, "items": [{"barcode": "780001"}, {"barcode": "780002"}, {"barcode": "780004"}]}"#,
    )
    .unwrap();

    let result = service.solve_knapsack(&request).await.unwrap();

    // All three cost 3600; lentils + cookies (88 + 61) beat lentils + milk (88 + 55)
    assert_eq!(result.quantity_of("780002"), 1);
    assert_eq!(result.quantity_of("780004"), 1);
    assert_eq!(result.quantity_of("780001"), 0);
    assert_eq!(result.total_cost, 2500.0);
    assert_eq!(result.total_value, 149.0);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["mode"], "knapsack");
    assert_eq!(json["approximate"], false);
    assert!(json.get("objective").is_none());
}

#[tokio::test]
async fn test_validation_rejected_before_lookup() {
    let service = load_service();
    let request = KnapsackRequest {
        budget: -1.0,
        items: vec![CartLine::new("780001", 1)],
    };
    assert!(service.solve_knapsack(&request).await.is_err());

    let request = OptimizeRequest {
        items: vec![CartLine::new("780001", 0)],
        ..Default::default()
    };
    assert!(service.optimize(&request).await.is_err());
}

struct FlakyCatalog {
    inner: ProductCatalog,
}

impl Catalog for FlakyCatalog {
    fn lookup(&self, identifier: &str) -> Result<Item, CatalogError> {
        match identifier {
            "slow" => {
                std::thread::sleep(Duration::from_millis(400));
                Err(CatalogError::NotFound(identifier.to_string()))
            }
            "down" => Err(CatalogError::Unavailable("backend offline".to_string())),
            _ => self.inner.lookup(identifier),
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_and_failing_lookups_only_drop_their_lines() {
    let file = catalog_file();
    let catalog = FlakyCatalog {
        inner: ProductCatalog::load(file.path(), None).unwrap(),
    };
    let config = EngineConfig {
        lookup_timeout_ms: 50,
        ..EngineConfig::default()
    };
    let service = BasketService::new(Arc::new(catalog), config);

    let request = KnapsackRequest {
        budget: 5000.0,
        items: vec![
            CartLine::new("slow", 1),
            CartLine::new("780002", 1),
            CartLine::new("down", 1),
        ],
    };
    let result = service.solve_knapsack(&request).await.unwrap();

    assert_eq!(result.quantity_of("780002"), 1);
    let failures: Vec<_> = result.warnings.iter().map(|w| w.failure).collect();
    assert_eq!(failures, vec![LookupFailure::Timeout, LookupFailure::Unavailable]);
}
