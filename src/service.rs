use std::sync::Arc;

use tracing::{info, instrument};

use crate::catalog::{resolve_lines, Catalog};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{
    dedupe_lines, merge_duplicate_lines, KnapsackRequest, OptimizeRequest, SelectionResult,
};
use crate::planner;

/// Request/response boundary: validates, resolves cart lines, then runs the planner.
///
/// Holds no per-request state and can be shared across tasks.
#[derive(Clone)]
pub struct BasketService {
    catalog: Arc<dyn Catalog>,
    config: EngineConfig,
}

impl BasketService {
    pub fn new(catalog: Arc<dyn Catalog>, config: EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// List optimization over the requested lines.
    #[instrument(skip_all, fields(lines = request.items.len()))]
    pub async fn optimize(&self, request: &OptimizeRequest) -> Result<SelectionResult> {
        request.validate()?;

        let lines = merge_duplicate_lines(&request.items);
        let resolution =
            resolve_lines(Arc::clone(&self.catalog), &lines, self.config.lookup_timeout()).await;
        info!(
            resolved = resolution.lines.len(),
            dropped = resolution.warnings.len(),
            "cart resolved"
        );

        let mut result = planner::optimize(resolution.lines, &request.constraints, &self.config)?;
        result.warnings = resolution.warnings;
        Ok(result)
    }

    /// Knapsack selection, at most one unit per product.
    #[instrument(skip_all, fields(lines = request.items.len(), budget = request.budget))]
    pub async fn solve_knapsack(&self, request: &KnapsackRequest) -> Result<SelectionResult> {
        request.validate()?;

        let lines = dedupe_lines(&request.items);
        let resolution =
            resolve_lines(Arc::clone(&self.catalog), &lines, self.config.lookup_timeout()).await;
        info!(
            resolved = resolution.lines.len(),
            dropped = resolution.warnings.len(),
            "cart resolved"
        );

        let mut result = planner::solve_knapsack(request.budget, resolution.lines, &self.config)?;
        result.warnings = resolution.warnings;
        Ok(result)
    }
}
