use tracing::debug;

use crate::models::{EnvironmentalImpact, Item};
use crate::planner::constants::{round_to, SCORE_DECIMALS, SCORE_MAX, SCORE_MIN};

// ─── Nutrient penalties ─────────────────────────────────────────────────────

const NOVA_PENALTY: f64 = 8.0;
const SUGARS_PENALTY: f64 = 0.5;
const SATURATED_FAT_PENALTY: f64 = 0.3;
const SALT_PENALTY: f64 = 2.0;
const ENERGY_PENALTY: f64 = 0.05;

// ─── Category footprint per kg ──────────────────────────────────────────────

/// Packaged weight is estimated from price, never below this (kg).
const MIN_ESTIMATED_WEIGHT_KG: f64 = 0.1;
/// Price units per estimated kg.
const PRICE_PER_KG: f64 = 5000.0;

struct CategoryFactors {
    key: &'static str,
    co2_kg: f64,
    water_liters: f64,
    waste_kg: f64,
    energy_kwh: f64,
}

const fn row(key: &'static str, co2: f64, water: f64, waste: f64, energy: f64) -> CategoryFactors {
    CategoryFactors {
        key,
        co2_kg: co2,
        water_liters: water,
        waste_kg: waste,
        energy_kwh: energy,
    }
}

const DEFAULT_FACTORS: CategoryFactors = row("default", 1.5, 1000.0, 0.1, 0.5);

const CATEGORY_FACTORS: &[CategoryFactors] = &[
    row("beef", 27.0, 15000.0, 0.3, 20.0),
    row("lamb", 24.0, 10000.0, 0.1, 0.5),
    row("cheese", 12.0, 5000.0, 0.1, 0.5),
    row("pork", 12.0, 6000.0, 0.1, 0.5),
    row("fish", 10.0, 3000.0, 0.1, 0.5),
    row("eggs", 4.6, 2700.0, 0.1, 0.5),
    row("chicken", 6.9, 4300.0, 0.1, 0.5),
    row("nuts", 0.4, 2500.0, 0.1, 0.5),
    row("oils", 2.5, 6000.0, 0.1, 0.5),
    row("cereals", 1.0, 1500.0, 0.05, 0.5),
    row("rice", 2.7, 2500.0, 0.1, 0.5),
    row("pasta", 1.5, 1800.0, 0.1, 0.5),
    row("bread", 1.2, 2400.0, 0.1, 0.5),
    row("vegetables", 0.9, 400.0, 0.2, 0.3),
    row("fruits", 0.7, 700.0, 0.15, 0.2),
    row("legumes", 0.4, 4000.0, 0.1, 0.5),
    row("dairy", 3.2, 1000.0, 0.15, 4.5),
    row("processed", 2.5, 800.0, 0.25, 3.0),
    row("drinks", 0.8, 300.0, 0.1, 0.5),
];

/// Name keywords per category, checked in order. Keywords match whole words,
/// optionally pluralized with `s` or `es`.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("beef", &["beef", "steak", "carne", "vacuno"]),
    ("dairy", &["milk", "yogurt", "butter", "cream", "leche", "yogur", "mantequilla"]),
    ("cheese", &["cheese", "queso"]),
    ("chicken", &["chicken", "pollo"]),
    ("eggs", &["egg", "huevo"]),
    ("pork", &["pork", "ham", "cerdo", "jamón"]),
    ("fish", &["salmon", "tuna", "fish", "salmón", "atún", "pescado"]),
    ("cereals", &["cereal", "oat", "wheat", "avena", "trigo"]),
    ("bread", &["bread", "pan"]),
    ("pasta", &["pasta", "noodle", "fideos"]),
    ("rice", &["rice", "arroz"]),
    ("vegetables", &["vegetable", "carrot", "broccoli", "verdura", "zanahoria"]),
    ("fruits", &["fruit", "apple", "orange", "fruta", "manzana", "naranja"]),
    ("legumes", &["lentil", "bean", "chickpea", "lenteja", "porotos"]),
    ("oils", &["oil", "aceite"]),
    ("nuts", &["almond", "walnut", "nuez", "almendra"]),
    ("drinks", &["juice", "soda", "coffee", "tea", "jugo", "bebida", "café"]),
    ("processed", &["cookie", "snack", "chips", "galleta"]),
];

fn nutrient(item: &Item, key: &str) -> f64 {
    item.nutriments
        .get(key)
        .and_then(serde_json::Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Derive a 0-100 score from nutrient facts, or `None` when there are none.
pub fn score_from_nutriments(item: &Item) -> Option<f64> {
    if item.nutriments.is_empty() {
        return None;
    }

    let mut score = SCORE_MAX;

    let nova = nutrient(item, "nova_group").max(nutrient(item, "nova-group"));
    if nova > 0.0 {
        score -= (nova - 1.0) * NOVA_PENALTY;
    }
    score -= nutrient(item, "sugars_100g") * SUGARS_PENALTY;
    score -= nutrient(item, "saturated-fat_100g") * SATURATED_FAT_PENALTY;
    score -= nutrient(item, "salt_100g") * SALT_PENALTY;
    score -= nutrient(item, "energy-kcal_100g") * ENERGY_PENALTY;

    Some(round_to(score.clamp(SCORE_MIN, SCORE_MAX), SCORE_DECIMALS))
}

/// Guess a footprint category from the product name.
pub fn infer_category(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();
    let words: Vec<&str> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| has_word(&words, k)))
        .map(|(category, _)| *category)
}

fn has_word(words: &[&str], keyword: &str) -> bool {
    words.iter().any(|w| {
        w.strip_prefix(keyword)
            .is_some_and(|rest| matches!(rest, "" | "s" | "es"))
    })
}

fn factors_for(item: &Item) -> &'static CategoryFactors {
    let category = item
        .category
        .as_deref()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty());
    let by_category = category.as_deref().and_then(|c| {
        CATEGORY_FACTORS
            .iter()
            .find(|f| c.contains(f.key))
    });

    by_category
        .or_else(|| {
            infer_category(&item.name)
                .and_then(|key| CATEGORY_FACTORS.iter().find(|f| f.key == key))
        })
        .unwrap_or(&DEFAULT_FACTORS)
}

/// Estimate a per-unit footprint from category factors and a price-based weight.
pub fn estimate_impact(item: &Item) -> EnvironmentalImpact {
    let factors = factors_for(item);
    let price = if item.has_valid_price() { item.price } else { 0.0 };
    let weight_kg = (price / PRICE_PER_KG).max(MIN_ESTIMATED_WEIGHT_KG);

    EnvironmentalImpact::new(
        factors.co2_kg * weight_kg,
        factors.water_liters * weight_kg,
        factors.waste_kg * weight_kg,
        factors.energy_kwh * weight_kg,
    )
}

/// Fill a missing score and impact. Existing values are never overwritten.
pub fn enrich_item(item: &mut Item) {
    if item.sustainability_score.is_none() {
        item.sustainability_score = Some(score_from_nutriments(item).unwrap_or(SCORE_MIN));
    }
    if item.impact.is_none() {
        let impact = estimate_impact(item);
        debug!(identifier = %item.identifier, co2_kg = impact.co2_kg, "estimated impact");
        item.impact = Some(impact);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn bare(name: &str, category: Option<&str>, price: f64) -> Item {
        Item {
            identifier: "x".to_string(),
            name: name.to_string(),
            brand: None,
            price,
            sustainability_score: None,
            category: category.map(str::to_string),
            impact: None,
            nutriments: BTreeMap::new(),
        }
    }

    #[test]
    fn test_score_from_nutriments() {
        let mut item = bare("Cookies", None, 1000.0);
        item.nutriments.insert("nova_group".into(), json!(4));
        item.nutriments.insert("sugars_100g".into(), json!(30.0));
        item.nutriments.insert("salt_100g".into(), json!(1.0));
        // 100 - 24 - 15 - 2
        assert_eq!(score_from_nutriments(&item), Some(59.0));
    }

    #[test]
    fn test_score_clamped_at_zero() {
        let mut item = bare("Candy", None, 1000.0);
        item.nutriments.insert("sugars_100g".into(), json!(250.0));
        assert_eq!(score_from_nutriments(&item), Some(0.0));
    }

    #[test]
    fn test_no_nutriments_no_score() {
        assert_eq!(score_from_nutriments(&bare("Water", None, 500.0)), None);
    }

    #[test]
    fn test_infer_category() {
        assert_eq!(infer_category("Leche Entera 1L"), Some("dairy"));
        assert_eq!(infer_category("Red Lentils"), Some("legumes"));
        assert_eq!(infer_category("Mystery Box"), None);
    }

    #[test]
    fn test_infer_category_matches_whole_words() {
        assert_eq!(infer_category("Champagne Brut"), None);
        assert_eq!(infer_category("Goat Stew"), None);
        assert_eq!(infer_category("Boiled Potatoes"), None);
        assert_eq!(infer_category("Boiled Eggs"), Some("eggs"));
        assert_eq!(infer_category("Rolled Oats"), Some("cereals"));
        assert_eq!(infer_category("Pan Amasado"), Some("bread"));
        assert_eq!(infer_category("Jamón Serrano"), Some("pork"));
    }

    #[test]
    fn test_short_category_does_not_match_longer_key() {
        // "ice" is inside "rice" but is not a rice category
        let impact = estimate_impact(&bare("Vanilla Cone", Some("Ice"), 0.0));
        assert!((impact.co2_kg - 0.15).abs() < 1e-9);

        let rice = estimate_impact(&bare("Vanilla Cone", Some("Rice, White"), 0.0));
        assert!((rice.co2_kg - 0.27).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_impact_uses_category_and_weight() {
        let impact = estimate_impact(&bare("Steak", Some("Beef"), 10000.0));
        // 2 kg of beef
        assert!((impact.co2_kg - 54.0).abs() < 1e-9);
        assert!((impact.water_liters - 30000.0).abs() < 1e-9);

        let fallback = estimate_impact(&bare("Mystery Box", None, 0.0));
        assert!((fallback.co2_kg - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_enrich_keeps_existing_values() {
        let mut item = bare("Oat Milk", None, 2000.0);
        item.sustainability_score = Some(77.0);
        item.impact = Some(EnvironmentalImpact::new(1.0, 2.0, 3.0, 4.0));
        enrich_item(&mut item);
        assert_eq!(item.sustainability_score, Some(77.0));
        assert_eq!(item.impact, Some(EnvironmentalImpact::new(1.0, 2.0, 3.0, 4.0)));

        let mut missing = bare("Oat Milk", None, 2000.0);
        enrich_item(&mut missing);
        assert_eq!(missing.sustainability_score, Some(0.0));
        assert!(missing.impact.is_some());
    }
}
