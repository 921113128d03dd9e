use crate::models::{EnvironmentalImpact, Item};

/// A line with a non-zero chosen quantity.
#[derive(Debug, Clone)]
pub struct SelectedLine {
    pub item: Item,
    pub requested_quantity: u32,
    pub quantity: u32,
    pub unit_value: f64,
}

impl SelectedLine {
    pub fn line_total(&self) -> f64 {
        self.item.price * self.quantity as f64
    }

    pub fn line_impact(&self) -> EnvironmentalImpact {
        self.item.unit_impact().scaled(self.quantity as f64)
    }
}

/// Unrounded totals over a selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionTotals {
    pub total_units: u32,
    pub total_cost: f64,
    pub total_value: f64,
    /// Mean clamped sustainability score, weighted by quantity.
    pub average_sustainability: f64,
    pub impact: EnvironmentalImpact,
    /// Mean per-unit impact score, weighted by quantity.
    pub average_impact_score: f64,
    pub budget_used: f64,
    pub budget_remaining: Option<f64>,
    pub budget_used_pct: Option<f64>,
}

/// Sum cost, value and footprint over the chosen lines.
pub fn aggregate(lines: &[SelectedLine], budget: Option<f64>) -> SelectionTotals {
    let mut totals = lines
        .iter()
        .fold(SelectionTotals::default(), |mut acc, line| {
            let qty = line.quantity as f64;
            acc.total_units += line.quantity;
            acc.total_cost += line.line_total();
            acc.total_value += line.unit_value * qty;
            acc.average_sustainability += line.item.clamped_score() * qty;
            acc.impact = acc.impact.add(&line.line_impact());
            acc.average_impact_score += line.item.unit_impact().impact_score() * qty;
            acc
        });

    if totals.total_units > 0 {
        let units = totals.total_units as f64;
        totals.average_sustainability /= units;
        totals.average_impact_score /= units;
    }

    totals.budget_used = totals.total_cost;
    totals.budget_remaining = budget.map(|b| b - totals.total_cost);
    totals.budget_used_pct = budget
        .filter(|&b| b > 0.0)
        .map(|b| totals.total_cost / b * 100.0);

    totals
}
