pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;
pub mod service;
pub mod telemetry;

pub use catalog::{Catalog, CatalogError, ProductCatalog};
pub use config::EngineConfig;
pub use error::{BasketError, Result, ValidationError};
pub use models::{CartLine, Constraints, Item, KnapsackRequest, Objective, OptimizeRequest, SelectionResult};
pub use service::BasketService;
