use crate::models::{
    ChosenLine, EnvironmentalImpact, ExcludedLine, ImpactTotals, LookupWarning, Objective,
    SelectionMode, SelectionResult,
};
use crate::planner::aggregation::{SelectedLine, SelectionTotals};
use crate::planner::constants::{
    round_to, CO2_DECIMALS, CURRENCY_DECIMALS, ENERGY_DECIMALS, PERCENT_DECIMALS, SCORE_DECIMALS,
    WASTE_DECIMALS, WATER_DECIMALS,
};

/// Request metadata carried into the response unchanged.
#[derive(Debug, Clone)]
pub struct ResultContext {
    pub mode: SelectionMode,
    pub objective: Option<Objective>,
    pub budget: Option<f64>,
    pub approximate: bool,
    pub excluded: Vec<ExcludedLine>,
    pub warnings: Vec<LookupWarning>,
}

impl ResultContext {
    pub fn new(mode: SelectionMode, objective: Option<Objective>, budget: Option<f64>) -> Self {
        Self {
            mode,
            objective,
            budget,
            approximate: false,
            excluded: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

fn round_impact(impact: &EnvironmentalImpact) -> EnvironmentalImpact {
    EnvironmentalImpact {
        co2_kg: round_to(impact.co2_kg, CO2_DECIMALS),
        water_liters: round_to(impact.water_liters, WATER_DECIMALS),
        waste_kg: round_to(impact.waste_kg, WASTE_DECIMALS),
        energy_kwh: round_to(impact.energy_kwh, ENERGY_DECIMALS),
    }
}

fn currency(value: f64) -> f64 {
    round_to(value, CURRENCY_DECIMALS)
}

fn chosen_line(line: &SelectedLine) -> ChosenLine {
    ChosenLine {
        identifier: line.item.identifier.clone(),
        name: line.item.display_name().to_string(),
        brand: line.item.brand.clone(),
        category: line.item.category.clone(),
        requested_quantity: line.requested_quantity,
        quantity: line.quantity,
        unit_price: currency(line.item.price),
        line_total: currency(line.line_total()),
        sustainability_score: round_to(line.item.clamped_score(), SCORE_DECIMALS),
        unit_value: round_to(line.unit_value, SCORE_DECIMALS),
        impact: round_impact(&line.line_impact()),
    }
}

/// Build the public response. Rounding happens here and nowhere earlier.
pub fn compose(
    lines: &[SelectedLine],
    totals: &SelectionTotals,
    context: ResultContext,
) -> SelectionResult {
    let impact = round_impact(&totals.impact);
    // Rounding must not push a within-budget total over the budget
    let total_cost = match context.budget {
        Some(budget) => currency(totals.total_cost).min(budget),
        None => currency(totals.total_cost),
    };

    SelectionResult {
        mode: context.mode,
        objective: context.objective,
        items: lines.iter().map(chosen_line).collect(),
        total_units: totals.total_units,
        total_cost,
        total_value: round_to(totals.total_value, SCORE_DECIMALS),
        average_sustainability: round_to(totals.average_sustainability, SCORE_DECIMALS),
        impact: ImpactTotals {
            co2_kg: impact.co2_kg,
            water_liters: impact.water_liters,
            waste_kg: impact.waste_kg,
            energy_kwh: impact.energy_kwh,
            average_impact_score: round_to(totals.average_impact_score, PERCENT_DECIMALS),
        },
        budget: context.budget,
        budget_used: total_cost,
        budget_remaining: totals.budget_remaining.map(|r| currency(r).max(0.0)),
        budget_used_pct: totals.budget_used_pct.map(|p| round_to(p, PERCENT_DECIMALS)),
        approximate: context.approximate,
        excluded: context.excluded,
        warnings: context.warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use crate::planner::aggregation::aggregate;
    use std::collections::BTreeMap;

    #[test]
    fn test_compose_rounds_only_at_boundary() {
        let line = SelectedLine {
            item: Item {
                identifier: "1".to_string(),
                name: String::new(),
                brand: Some("Verde".to_string()),
                price: 3.333333,
                sustainability_score: Some(66.666666),
                category: None,
                impact: Some(EnvironmentalImpact::new(0.12345, 10.06, 0.0004, 1.005)),
                nutriments: BTreeMap::new(),
            },
            requested_quantity: 3,
            quantity: 3,
            unit_value: 66.666666,
        };
        let lines = vec![line];
        let totals = aggregate(&lines, Some(20.0));
        let result = compose(
            &lines,
            &totals,
            ResultContext::new(SelectionMode::ListOptimization, Some(Objective::Healthiest), Some(20.0)),
        );

        assert_eq!(result.total_cost, 10.0);
        assert_eq!(result.budget_remaining, Some(10.0));
        assert_eq!(result.budget_used_pct, Some(50.0));
        assert_eq!(result.average_sustainability, 66.67);
        assert_eq!(result.items[0].unit_price, 3.33);
        assert_eq!(result.items[0].name, "1");
        assert_eq!(result.impact.co2_kg, 0.37);
        assert_eq!(result.impact.water_liters, 30.2);
        assert!(!result.approximate);
    }

    #[test]
    fn test_compose_empty() {
        let totals = aggregate(&[], Some(50.0));
        let result = compose(
            &[],
            &totals,
            ResultContext::new(SelectionMode::Knapsack, None, Some(50.0)),
        );
        assert!(result.is_empty());
        assert_eq!(result.total_cost, 0.0);
        assert_eq!(result.budget_remaining, Some(50.0));
    }
}
