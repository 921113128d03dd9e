use crate::models::{ExcludedLine, ExclusionReason, Item, ResolvedLine};

/// Lines that survived the hard constraints, plus the ones that did not.
#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub kept: Vec<ResolvedLine>,
    pub excluded: Vec<ExcludedLine>,
}

/// First excluded-category string contained in the item's category, if any.
///
/// Matching is a case-insensitive substring test.
pub fn excluded_category<'a>(item: &Item, excluded_categories: &'a [String]) -> Option<&'a str> {
    let category = item.category.as_deref()?.to_lowercase();
    excluded_categories
        .iter()
        .map(|c| c.as_str())
        .find(|c| {
            let c = c.trim().to_lowercase();
            !c.is_empty() && category.contains(&c)
        })
}

/// Drop lines violating hard constraints before scoring.
///
/// Removes invalid prices, excluded categories, and (when a budget is given)
/// items whose single unit already exceeds it. Input order is preserved.
pub fn apply_feasibility(
    lines: Vec<ResolvedLine>,
    excluded_categories: &[String],
    budget: Option<f64>,
) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for line in lines {
        let reason = if !line.item.has_valid_price() {
            Some(ExclusionReason::InvalidPrice)
        } else if let Some(category) = excluded_category(&line.item, excluded_categories) {
            Some(ExclusionReason::ExcludedCategory {
                category: category.to_string(),
            })
        } else if budget.is_some_and(|b| line.item.price > b) {
            Some(ExclusionReason::OverBudget)
        } else {
            None
        };

        match reason {
            Some(reason) => outcome.excluded.push(ExcludedLine {
                identifier: line.item.identifier.clone(),
                name: line.item.display_name().to_string(),
                reason,
            }),
            None => outcome.kept.push(line),
        }
    }

    outcome
}
