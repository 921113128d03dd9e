use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::Item;
use crate::planner::constants::MAX_BUDGET;

fn default_quantity() -> u32 {
    1
}

/// A request to consider an item for selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(alias = "barcode")]
    pub identifier: String,

    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartLine {
    pub fn new(identifier: impl Into<String>, quantity: u32) -> Self {
        Self {
            identifier: identifier.into(),
            quantity,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.identifier.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }
        if self.quantity == 0 {
            return Err(ValidationError::InvalidQuantity {
                identifier: self.identifier.clone(),
            });
        }
        Ok(())
    }
}

/// Parses `ID` or `ID:QTY`.
impl FromStr for CartLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (identifier, quantity) = match s.rsplit_once(':') {
            Some((id, qty)) => {
                let qty: u32 = qty
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid quantity in '{}'", s))?;
                (id.trim(), qty)
            }
            None => (s, 1),
        };
        if identifier.is_empty() {
            return Err("item identifier must not be empty".to_string());
        }
        if quantity == 0 {
            return Err(format!("quantity for '{}' must be at least 1", identifier));
        }
        Ok(Self::new(identifier, quantity))
    }
}

/// Optimization criterion for list optimization.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    /// Maximize sustainability per unit of currency.
    #[default]
    Cheapest,
    /// Maximize sustainability; price only bounds feasibility.
    Healthiest,
    /// Configured blend of price efficiency and sustainability.
    Balanced,
    /// Caller-supplied blend of price efficiency and sustainability.
    Custom {
        price_weight: f64,
        sustainability_weight: f64,
    },
}

impl Objective {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Objective::Custom {
            price_weight,
            sustainability_weight,
        } = *self
        {
            let valid = |w: f64| w.is_finite() && w >= 0.0;
            if !valid(price_weight)
                || !valid(sustainability_weight)
                || price_weight + sustainability_weight <= 0.0
            {
                return Err(ValidationError::InvalidWeights);
            }
        }
        Ok(())
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Objective::Cheapest => write!(f, "cheapest"),
            Objective::Healthiest => write!(f, "healthiest"),
            Objective::Balanced => write!(f, "balanced"),
            Objective::Custom {
                price_weight,
                sustainability_weight,
            } => write!(
                f,
                "custom (price {:.2}, sustainability {:.2})",
                price_weight, sustainability_weight
            ),
        }
    }
}

/// Request-level parameters for list optimization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    /// `None` means no budget cap.
    pub budget: Option<f64>,
    pub objective: Objective,
    pub excluded_categories: Vec<String>,
    pub preferences: Vec<String>,
}

impl Constraints {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(budget) = self.budget {
            validate_budget(budget)?;
        }
        self.objective.validate()
    }
}

/// Rejects non-positive, non-finite and oversized budgets.
pub fn validate_budget(budget: f64) -> Result<(), ValidationError> {
    if !budget.is_finite() || budget <= 0.0 {
        return Err(ValidationError::InvalidBudget(budget));
    }
    if budget > MAX_BUDGET {
        return Err(ValidationError::BudgetTooLarge {
            budget,
            max: MAX_BUDGET,
        });
    }
    Ok(())
}

/// Body of a list optimization request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub items: Vec<CartLine>,

    #[serde(flatten)]
    pub constraints: Constraints,
}

impl OptimizeRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.constraints.validate()?;
        self.items.iter().try_for_each(CartLine::validate)
    }
}

/// Body of a knapsack request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnapsackRequest {
    pub budget: f64,
    pub items: Vec<CartLine>,
}

impl KnapsackRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_budget(self.budget)?;
        if self.items.is_empty() {
            return Err(ValidationError::EmptyItems);
        }
        self.items.iter().try_for_each(CartLine::validate)
    }
}

/// A cart line whose identifier the catalog resolved.
#[derive(Debug, Clone)]
pub struct ResolvedLine {
    pub item: Item,
    pub quantity: u32,
}

impl ResolvedLine {
    pub fn new(item: Item, quantity: u32) -> Self {
        Self { item, quantity }
    }
}

/// Sums the quantities of repeated identifiers (compared trimmed); first
/// occurrence fixes the order.
pub fn merge_duplicate_lines(lines: &[CartLine]) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines {
        let identifier = line.identifier.trim();
        match merged.iter_mut().find(|m| m.identifier == identifier) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(CartLine::new(identifier, line.quantity)),
        }
    }
    merged
}

/// Keeps only the first occurrence of each trimmed identifier.
pub fn dedupe_lines(lines: &[CartLine]) -> Vec<CartLine> {
    let mut seen: Vec<&str> = Vec::with_capacity(lines.len());
    let mut unique = Vec::with_capacity(lines.len());
    for line in lines {
        let identifier = line.identifier.trim();
        if !seen.contains(&identifier) {
            seen.push(identifier);
            unique.push(CartLine::new(identifier, line.quantity));
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_line_parse() {
        assert_eq!("780123".parse::<CartLine>().unwrap(), CartLine::new("780123", 1));
        assert_eq!("780123:4".parse::<CartLine>().unwrap(), CartLine::new("780123", 4));
        assert!("780123:0".parse::<CartLine>().is_err());
        assert!("780123:x".parse::<CartLine>().is_err());
        assert!(":3".parse::<CartLine>().is_err());
    }

    #[test]
    fn test_cart_line_quantity_defaults_to_one() {
        let line: CartLine = serde_json::from_str(r#"{"barcode": "42"}"#).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.identifier, "42");
    }

    #[test]
    fn test_validate_budget() {
        assert!(validate_budget(10.0).is_ok());
        assert_eq!(validate_budget(0.0), Err(ValidationError::InvalidBudget(0.0)));
        assert!(validate_budget(-5.0).is_err());
        assert!(validate_budget(f64::NAN).is_err());
        assert!(matches!(
            validate_budget(MAX_BUDGET * 2.0),
            Err(ValidationError::BudgetTooLarge { .. })
        ));
    }

    #[test]
    fn test_knapsack_requires_items() {
        let request = KnapsackRequest {
            budget: 100.0,
            items: vec![],
        };
        assert_eq!(request.validate(), Err(ValidationError::EmptyItems));
    }

    #[test]
    fn test_custom_objective_weights() {
        let ok = Objective::Custom {
            price_weight: 0.4,
            sustainability_weight: 0.6,
        };
        assert!(ok.validate().is_ok());

        let zero = Objective::Custom {
            price_weight: 0.0,
            sustainability_weight: 0.0,
        };
        assert_eq!(zero.validate(), Err(ValidationError::InvalidWeights));
    }

    #[test]
    fn test_objective_serde_names() {
        let objective: Objective = serde_json::from_str(r#""healthiest""#).unwrap();
        assert_eq!(objective, Objective::Healthiest);

        let custom: Objective =
            serde_json::from_str(r#"{"custom": {"price_weight": 1, "sustainability_weight": 3}}"#)
                .unwrap();
        assert!(matches!(custom, Objective::Custom { .. }));
    }

    #[test]
    fn test_optimize_request_flattened_constraints() {
        let request: OptimizeRequest = serde_json::from_str(
            r#"{"items": [{"barcode": "1", "quantity": 2}], "budget": 5000,
                "objective": "balanced", "excluded_categories": ["beef"]}"#,
        )
        .unwrap();
        assert_eq!(request.constraints.budget, Some(5000.0));
        assert_eq!(request.constraints.objective, Objective::Balanced);
        assert_eq!(request.constraints.excluded_categories, vec!["beef"]);
        assert!(request.constraints.preferences.is_empty());
    }

    #[test]
    fn test_merge_and_dedupe() {
        let lines = vec![
            CartLine::new("a", 1),
            CartLine::new("b", 2),
            CartLine::new("a", 3),
        ];
        let merged = merge_duplicate_lines(&lines);
        assert_eq!(merged, vec![CartLine::new("a", 4), CartLine::new("b", 2)]);

        let unique = dedupe_lines(&lines);
        assert_eq!(unique, vec![CartLine::new("a", 1), CartLine::new("b", 2)]);
    }

    #[test]
    fn test_merge_ignores_surrounding_whitespace() {
        let lines = vec![
            CartLine::new(" a", 1),
            CartLine::new("a", 2),
            CartLine::new("a\t", 3),
        ];
        assert_eq!(merge_duplicate_lines(&lines), vec![CartLine::new("a", 6)]);
        assert_eq!(dedupe_lines(&lines), vec![CartLine::new("a", 1)]);
    }
}
