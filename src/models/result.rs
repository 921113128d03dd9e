use serde::{Deserialize, Serialize};

use crate::models::{EnvironmentalImpact, Objective};

/// Which boundary operation produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    ListOptimization,
    Knapsack,
}

/// One selected product and the quantity chosen for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChosenLine {
    pub identifier: String,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub requested_quantity: u32,
    /// May be less than requested when the budget binds.
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
    pub sustainability_score: f64,
    pub unit_value: f64,
    /// Footprint of all chosen units of this line.
    pub impact: EnvironmentalImpact,
}

/// Aggregated footprint of a selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactTotals {
    pub co2_kg: f64,
    pub water_liters: f64,
    pub waste_kg: f64,
    pub energy_kwh: f64,
    pub average_impact_score: f64,
}

/// Why the feasibility filter dropped a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    ExcludedCategory { category: String },
    OverBudget,
    InvalidPrice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedLine {
    pub identifier: String,
    pub name: String,
    #[serde(flatten)]
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupFailure {
    NotFound,
    Timeout,
    Unavailable,
}

/// A cart line dropped because its identifier could not be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupWarning {
    pub identifier: String,
    pub failure: LookupFailure,
    pub message: String,
}

/// Public response of both boundary operations.
///
/// `total_cost <= budget` always holds. An infeasible request yields an
/// empty selection with zero cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub mode: SelectionMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<Objective>,
    pub items: Vec<ChosenLine>,
    pub total_units: u32,
    pub total_cost: f64,
    pub total_value: f64,
    pub average_sustainability: f64,
    pub impact: ImpactTotals,
    pub budget: Option<f64>,
    pub budget_used: f64,
    pub budget_remaining: Option<f64>,
    pub budget_used_pct: Option<f64>,
    /// Set when the exact solver was skipped for the greedy approximation.
    pub approximate: bool,
    pub excluded: Vec<ExcludedLine>,
    pub warnings: Vec<LookupWarning>,
}

impl SelectionResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity chosen for an identifier, 0 when absent.
    pub fn quantity_of(&self, identifier: &str) -> u32 {
        self.items
            .iter()
            .find(|line| line.identifier == identifier)
            .map(|line| line.quantity)
            .unwrap_or(0)
    }
}
