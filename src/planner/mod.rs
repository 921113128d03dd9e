pub mod aggregation;
pub mod compose;
pub mod constants;
pub mod filter;
pub mod scoring;
pub mod selection;

use std::cmp::Ordering;

use tracing::info;

use crate::config::EngineConfig;
use crate::error::ValidationError;
use crate::models::{
    validate_budget, Constraints, Objective, ResolvedLine, SelectionMode, SelectionResult,
};

pub use aggregation::{aggregate, SelectedLine, SelectionTotals};
pub use compose::{compose, ResultContext};
pub use constants::*;
pub use filter::{apply_feasibility, excluded_category, FilterOutcome};
pub use scoring::ObjectiveScorer;
pub use selection::{Candidate, Selection, SelectionEngine, SolveMode};

/// Score, solve and assemble one request over already-resolved lines.
fn run(
    lines: Vec<ResolvedLine>,
    objective: Objective,
    excluded_categories: &[String],
    preferences: &[String],
    budget: Option<f64>,
    mode: SelectionMode,
    config: &EngineConfig,
) -> SelectionResult {
    let outcome = apply_feasibility(lines, excluded_categories, budget);
    let scorer = ObjectiveScorer::new(objective, preferences, config, &outcome.kept);

    let candidates: Vec<Candidate> = outcome
        .kept
        .iter()
        .map(|line| Candidate::new(line.item.price, scorer.score(&line.item), line.quantity))
        .collect();

    let solve_mode = match mode {
        SelectionMode::ListOptimization => SolveMode::Bounded,
        SelectionMode::Knapsack => SolveMode::ZeroOne,
    };

    let selection = match budget {
        Some(budget) => SelectionEngine::from_config(config).select(&candidates, budget, solve_mode),
        // No cap: every feasible line at its full quantity
        None => Selection {
            quantities: candidates.iter().map(|c| c.quantity).collect(),
            approximate: false,
        },
    };

    let mut selected: Vec<SelectedLine> = outcome
        .kept
        .into_iter()
        .zip(candidates.iter().zip(&selection.quantities))
        .filter(|(_, (_, quantity))| **quantity > 0)
        .map(|(line, (candidate, &quantity))| SelectedLine {
            item: line.item,
            requested_quantity: line.quantity,
            quantity,
            unit_value: candidate.unit_value,
        })
        .collect();

    if mode == SelectionMode::ListOptimization {
        // Stable: equal values keep input order
        selected.sort_by(|a, b| {
            b.unit_value
                .partial_cmp(&a.unit_value)
                .unwrap_or(Ordering::Equal)
        });
    }

    let totals = aggregate(&selected, budget);
    info!(
        mode = ?mode,
        chosen = selected.len(),
        excluded = outcome.excluded.len(),
        total_cost = totals.total_cost,
        approximate = selection.approximate,
        "selection complete"
    );

    let objective = (mode == SelectionMode::ListOptimization).then_some(objective);
    let mut context = ResultContext::new(mode, objective, budget);
    context.approximate = selection.approximate;
    context.excluded = outcome.excluded;
    compose(&selected, &totals, context)
}

/// List optimization: choose 0..=requested units per line under the objective.
///
/// Without a budget every feasible line is kept at full quantity, ranked by value.
pub fn optimize(
    lines: Vec<ResolvedLine>,
    constraints: &Constraints,
    config: &EngineConfig,
) -> Result<SelectionResult, ValidationError> {
    constraints.validate()?;
    Ok(run(
        lines,
        constraints.objective,
        &constraints.excluded_categories,
        &constraints.preferences,
        constraints.budget,
        SelectionMode::ListOptimization,
        config,
    ))
}

/// Knapsack: choose each line at most once, maximizing total sustainability.
pub fn solve_knapsack(
    budget: f64,
    lines: Vec<ResolvedLine>,
    config: &EngineConfig,
) -> Result<SelectionResult, ValidationError> {
    validate_budget(budget)?;
    Ok(run(
        lines,
        Objective::Healthiest,
        &[],
        &[],
        Some(budget),
        SelectionMode::Knapsack,
        config,
    ))
}
