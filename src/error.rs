use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum BasketError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Telemetry error: {0}")]
    Telemetry(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Request-level validation failures, rejected before any lookup or solving.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("budget must be a positive finite number, got {0}")]
    InvalidBudget(f64),

    #[error("budget {budget} exceeds the maximum of {max}")]
    BudgetTooLarge { budget: f64, max: f64 },

    #[error("at least one item is required")]
    EmptyItems,

    #[error("quantity for '{identifier}' must be at least 1")]
    InvalidQuantity { identifier: String },

    #[error("item identifier must not be empty")]
    EmptyIdentifier,

    #[error("custom objective weights must be non-negative, finite and not both zero")]
    InvalidWeights,
}

pub type Result<T> = std::result::Result<T, BasketError>;
