/// Sustainability score bounds.
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

/// Floor on price when dividing by it in the `cheapest` objective.
pub const PRICE_EPSILON: f64 = 0.01;

/// Default multiplicative boost for preference matches (+10%).
pub const DEFAULT_PREFERENCE_BOOST: f64 = 0.10;

/// Default `balanced` weights, applied on a common 0-100 scale.
pub const DEFAULT_BALANCED_PRICE_WEIGHT: f64 = 0.5;
pub const DEFAULT_BALANCED_SUSTAINABILITY_WEIGHT: f64 = 0.5;

// ─────────────────────────────────────────────────────────────────────────────
// Solver limits
// ─────────────────────────────────────────────────────────────────────────────

/// Budget axis granularity in currency units.
pub const DEFAULT_CURRENCY_UNIT: f64 = 1.0;

/// DP memory ceiling before falling back to greedy: one take flag per
/// (instance, budget cell) plus one best-row cell per budget cell.
pub const DEFAULT_MAX_TABLE_CELLS: usize = 20_000_000;

/// How many times the budget grid may be refined tenfold below `currency_unit`
/// so that fractional prices land exactly on it.
pub const MAX_GRID_REFINEMENTS: u32 = 2;

/// Float noise tolerated when snapping a grid position to an integer.
pub const SNAP_TOLERANCE: f64 = 1e-6;

/// Relative slack on exact-price budget checks, absorbing summation noise.
pub const BUDGET_TOLERANCE: f64 = 1e-9;

/// Hard ceiling on any requested budget.
pub const MAX_BUDGET: f64 = 1e12;

/// Tolerance for value comparisons inside the solver.
pub const VALUE_EPSILON: f64 = 1e-9;

/// Per-lookup catalog timeout.
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 2_000;

// ─────────────────────────────────────────────────────────────────────────────
// Impact score (0-100, higher is worse)
// ─────────────────────────────────────────────────────────────────────────────

pub const IMPACT_CO2_CEILING_KG: f64 = 30.0;
pub const IMPACT_WATER_CEILING_L: f64 = 15_000.0;
pub const IMPACT_WASTE_CEILING_KG: f64 = 0.3;

pub const IMPACT_CO2_WEIGHT: f64 = 0.5;
pub const IMPACT_WATER_WEIGHT: f64 = 0.3;
pub const IMPACT_WASTE_WEIGHT: f64 = 0.2;

// ─────────────────────────────────────────────────────────────────────────────
// Display rounding (applied only when composing results)
// ─────────────────────────────────────────────────────────────────────────────

pub const CURRENCY_DECIMALS: u32 = 2;
pub const SCORE_DECIMALS: u32 = 2;
pub const PERCENT_DECIMALS: u32 = 1;
pub const CO2_DECIMALS: u32 = 3;
pub const WATER_DECIMALS: u32 = 1;
pub const WASTE_DECIMALS: u32 = 3;
pub const ENERGY_DECIMALS: u32 = 2;

/// Round a value to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}
