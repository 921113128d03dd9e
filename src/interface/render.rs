use crate::models::{ExclusionReason, Item, SelectionMode, SelectionResult};

fn exclusion_label(reason: &ExclusionReason) -> String {
    match reason {
        ExclusionReason::ExcludedCategory { category } => format!("excluded category '{}'", category),
        ExclusionReason::OverBudget => "over budget".to_string(),
        ExclusionReason::InvalidPrice => "invalid price".to_string(),
    }
}

/// Display a selection result as a formatted table.
pub fn display_selection(result: &SelectionResult) {
    let title = match result.mode {
        SelectionMode::ListOptimization => "Optimized Basket",
        SelectionMode::Knapsack => "Knapsack Selection",
    };

    println!();
    println!("=== {} ===", title);
    if let Some(objective) = &result.objective {
        println!("Objective: {}", objective);
    }
    println!();

    if result.is_empty() {
        println!("No products selected (empty cart or nothing fits the budget).");
    } else {
        let max_name_len = result.items.iter().map(|l| l.name.len()).max().unwrap_or(10);

        for (i, line) in result.items.iter().enumerate() {
            let partial = if line.quantity < line.requested_quantity {
                format!("  [{} of {} requested]", line.quantity, line.requested_quantity)
            } else {
                String::new()
            };

            println!(
                "{:>3}. {:<width$} - {:>3} x {:>10.2} = {:>11.2} | score {:>6.2} | CO2 {:.3} kg{}",
                i + 1,
                line.name,
                line.quantity,
                line.unit_price,
                line.line_total,
                line.sustainability_score,
                line.impact.co2_kg,
                partial,
                width = max_name_len
            );
        }
    }

    println!();
    println!("--- Summary ---");
    println!("Total units: {}", result.total_units);
    println!("Total cost: {:.2}", result.total_cost);
    if let (Some(budget), Some(remaining)) = (result.budget, result.budget_remaining) {
        println!(
            "Budget: {:.2} (used {:.1}%, remaining {:.2})",
            budget,
            result.budget_used_pct.unwrap_or(0.0),
            remaining
        );
    }
    println!("Average sustainability: {:.2}", result.average_sustainability);
    println!(
        "Impact: {:.3} kg CO2, {:.1} L water, {:.3} kg waste, {:.2} kWh (score {:.1})",
        result.impact.co2_kg,
        result.impact.water_liters,
        result.impact.waste_kg,
        result.impact.energy_kwh,
        result.impact.average_impact_score
    );
    if result.approximate {
        println!("Note: budget too fine-grained for the exact solver; result is approximate.");
    }

    if !result.excluded.is_empty() {
        println!();
        println!("--- Excluded ---");
        for line in &result.excluded {
            println!("  {} ({}) - {}", line.name, line.identifier, exclusion_label(&line.reason));
        }
    }

    if !result.warnings.is_empty() {
        println!();
        println!("--- Warnings ---");
        for warning in &result.warnings {
            println!("  {}", warning.message);
        }
    }
    println!();
}

/// Display a list of catalog products.
pub fn display_item_list(items: &[&Item], title: &str) {
    if items.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} items) ===", title, items.len());
    println!();

    for item in items {
        println!(
            "  {} [{}] - {:.2}, score {:.2}, {}",
            item.display_name(),
            item.identifier,
            item.price,
            item.clamped_score(),
            item.category.as_deref().unwrap_or("uncategorized")
        );
    }

    println!();
}

/// Display one product in detail.
pub fn display_item(item: &Item) {
    let impact = item.unit_impact();

    println!();
    println!("=== {} ===", item.display_name());
    println!("Identifier: {}", item.identifier);
    if let Some(brand) = &item.brand {
        println!("Brand: {}", brand);
    }
    println!("Category: {}", item.category.as_deref().unwrap_or("uncategorized"));
    println!("Price: {:.2}", item.price);
    println!("Sustainability: {:.2}", item.clamped_score());
    println!(
        "Impact per unit: {:.3} kg CO2, {:.1} L water, {:.3} kg waste, {:.2} kWh (score {:.1})",
        impact.co2_kg,
        impact.water_liters,
        impact.waste_kg,
        impact.energy_kwh,
        impact.impact_score()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusion_labels() {
        assert_eq!(exclusion_label(&ExclusionReason::OverBudget), "over budget");
        assert_eq!(
            exclusion_label(&ExclusionReason::ExcludedCategory {
                category: "meat".to_string()
            }),
            "excluded category 'meat'"
        );
    }
}
