use crate::config::EngineConfig;
use crate::models::{Item, Objective, ResolvedLine};
use crate::planner::constants::{PRICE_EPSILON, SCORE_MAX};

/// Turns an item into a non-negative per-unit value under an objective.
///
/// Built over the feasible candidate set, since `balanced` normalizes price
/// against the most expensive candidate.
#[derive(Debug, Clone)]
pub struct ObjectiveScorer {
    objective: Objective,
    price_weight: f64,
    sustainability_weight: f64,
    preferences: Vec<String>,
    boost: f64,
    max_price: f64,
}

impl ObjectiveScorer {
    pub fn new(
        objective: Objective,
        preferences: &[String],
        config: &EngineConfig,
        candidates: &[ResolvedLine],
    ) -> Self {
        let (price_weight, sustainability_weight) = match objective {
            Objective::Custom {
                price_weight,
                sustainability_weight,
            } => (price_weight, sustainability_weight),
            _ => (
                config.balanced_price_weight,
                config.balanced_sustainability_weight,
            ),
        };

        let max_price = candidates
            .iter()
            .map(|line| line.item.price)
            .filter(|p| p.is_finite())
            .fold(0.0, f64::max);

        Self {
            objective,
            price_weight,
            sustainability_weight,
            preferences: preferences
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
            boost: config.preference_boost.max(0.0),
            max_price,
        }
    }

    /// Price efficiency on a 0-100 scale: the most expensive candidate scores 0.
    pub fn price_efficiency(&self, price: f64) -> f64 {
        if self.max_price <= 0.0 {
            return SCORE_MAX;
        }
        (SCORE_MAX * (1.0 - price / self.max_price)).clamp(0.0, SCORE_MAX)
    }

    /// Objective value before any preference boost.
    pub fn base_value(&self, item: &Item) -> f64 {
        let sustainability = item.clamped_score();
        match self.objective {
            Objective::Cheapest => sustainability / item.price.max(PRICE_EPSILON),
            Objective::Healthiest => sustainability,
            Objective::Balanced | Objective::Custom { .. } => {
                let total = self.price_weight + self.sustainability_weight;
                if total <= 0.0 {
                    return 0.0;
                }
                (self.price_weight * self.price_efficiency(item.price)
                    + self.sustainability_weight * sustainability)
                    / total
            }
        }
    }

    /// Whether any preference keyword matches the item's category, brand or name.
    pub fn is_preferred(&self, item: &Item) -> bool {
        self.preferences.iter().any(|kw| item.matches_keyword(kw))
    }

    /// Per-unit value including the preference boost.
    pub fn score(&self, item: &Item) -> f64 {
        let base = self.base_value(item);
        let value = if self.is_preferred(item) {
            base * (1.0 + self.boost)
        } else {
            base
        };
        if value.is_finite() { value.max(0.0) } else { 0.0 }
    }
}
