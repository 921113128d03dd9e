use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::planner::constants::{
    IMPACT_CO2_CEILING_KG, IMPACT_CO2_WEIGHT, IMPACT_WASTE_CEILING_KG, IMPACT_WASTE_WEIGHT,
    IMPACT_WATER_CEILING_L, IMPACT_WATER_WEIGHT, SCORE_MAX, SCORE_MIN,
};

/// Environmental footprint of one unit of a product.
///
/// Missing fields deserialize as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentalImpact {
    pub co2_kg: f64,
    pub water_liters: f64,
    pub waste_kg: f64,
    pub energy_kwh: f64,
}

impl EnvironmentalImpact {
    pub fn new(co2_kg: f64, water_liters: f64, waste_kg: f64, energy_kwh: f64) -> Self {
        Self {
            co2_kg,
            water_liters,
            waste_kg,
            energy_kwh,
        }
    }

    /// Footprint of `quantity` units.
    pub fn scaled(&self, quantity: f64) -> Self {
        Self {
            co2_kg: self.co2_kg * quantity,
            water_liters: self.water_liters * quantity,
            waste_kg: self.waste_kg * quantity,
            energy_kwh: self.energy_kwh * quantity,
        }
    }

    /// Field-wise sum.
    pub fn add(&self, other: &Self) -> Self {
        Self {
            co2_kg: self.co2_kg + other.co2_kg,
            water_liters: self.water_liters + other.water_liters,
            waste_kg: self.waste_kg + other.waste_kg,
            energy_kwh: self.energy_kwh + other.energy_kwh,
        }
    }

    /// Negative or non-finite fields become zero.
    pub fn sanitized(&self) -> Self {
        fn clean(v: f64) -> f64 {
            if v.is_finite() && v > 0.0 { v } else { 0.0 }
        }
        Self {
            co2_kg: clean(self.co2_kg),
            water_liters: clean(self.water_liters),
            waste_kg: clean(self.waste_kg),
            energy_kwh: clean(self.energy_kwh),
        }
    }

    /// Impact score on a 0-100 scale, higher is worse.
    ///
    /// Weighted blend of CO2, water and waste, each capped at its reference ceiling.
    pub fn impact_score(&self) -> f64 {
        let co2 = (self.co2_kg / IMPACT_CO2_CEILING_KG * 100.0).min(100.0);
        let water = (self.water_liters / IMPACT_WATER_CEILING_L * 100.0).min(100.0);
        let waste = (self.waste_kg / IMPACT_WASTE_CEILING_KG * 100.0).min(100.0);
        co2 * IMPACT_CO2_WEIGHT + water * IMPACT_WATER_WEIGHT + waste * IMPACT_WASTE_WEIGHT
    }
}

/// A catalog product.
///
/// Immutable once fetched from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(alias = "barcode")]
    pub identifier: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub sustainability_score: Option<f64>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default, alias = "environmental_impact")]
    pub impact: Option<EnvironmentalImpact>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub nutriments: BTreeMap<String, serde_json::Value>,
}

impl Item {
    /// Sustainability score clamped to [0, 100]; missing or NaN counts as 0.
    pub fn clamped_score(&self) -> f64 {
        match self.sustainability_score {
            Some(score) if score.is_finite() => score.clamp(SCORE_MIN, SCORE_MAX),
            _ => SCORE_MIN,
        }
    }

    /// Per-unit impact with missing fields treated as zero.
    pub fn unit_impact(&self) -> EnvironmentalImpact {
        self.impact.unwrap_or_default().sanitized()
    }

    /// Price is usable by the solver.
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0
    }

    /// Display name, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.identifier
        } else {
            &self.name
        }
    }

    /// Case-insensitive substring match against category, brand or name.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return false;
        }
        let fields = [
            self.category.as_deref(),
            self.brand.as_deref(),
            Some(self.name.as_str()),
        ];
        fields
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&keyword))
    }
}
