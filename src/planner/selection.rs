use std::cmp::Ordering;
use std::mem::size_of;

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::planner::constants::{BUDGET_TOLERANCE, MAX_GRID_REFINEMENTS, SNAP_TOLERANCE, VALUE_EPSILON};

/// How requested quantities are treated by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMode {
    /// Choose 0..=quantity units per line.
    Bounded,
    /// Choose each line at most once, whatever its quantity.
    ZeroOne,
}

/// Solver input for one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub unit_price: f64,
    pub unit_value: f64,
    pub quantity: u32,
}

impl Candidate {
    pub fn new(unit_price: f64, unit_value: f64, quantity: u32) -> Self {
        Self {
            unit_price,
            unit_value,
            quantity,
        }
    }

    /// Value per unit of currency; free items with value rank first.
    fn density(&self) -> f64 {
        if self.unit_price <= 0.0 {
            f64::INFINITY
        } else {
            self.unit_value / self.unit_price
        }
    }

    fn max_units(&self, mode: SolveMode) -> u32 {
        match mode {
            SolveMode::Bounded => self.quantity,
            SolveMode::ZeroOne => self.quantity.min(1),
        }
    }

    fn is_selectable(&self) -> bool {
        self.unit_value > 0.0 && self.unit_price.is_finite()
    }
}

/// Chosen quantity per candidate, index-aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub quantities: Vec<u32>,
    pub approximate: bool,
}

impl Selection {
    fn empty(len: usize) -> Self {
        Self {
            quantities: vec![0; len],
            approximate: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.iter().all(|&q| q == 0)
    }

    pub fn total_cost(&self, candidates: &[Candidate]) -> f64 {
        spent(candidates, &self.quantities)
    }

    pub fn total_value(&self, candidates: &[Candidate]) -> f64 {
        candidates
            .iter()
            .zip(&self.quantities)
            .map(|(c, &q)| c.unit_value * q as f64)
            .sum()
    }
}

/// A group of `count` units of one line, treated as a single 0/1 choice.
#[derive(Debug, Clone, Copy)]
struct Instance {
    line: usize,
    count: u32,
    units: usize,
    value: f64,
    cost: f64,
}

/// Best (value, cost) reachable within a budget cell.
#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    value: f64,
    cost: f64,
}

impl Cell {
    /// Higher value wins; equal value falls back to lower cost.
    fn beats(&self, other: &Cell) -> bool {
        if self.value > other.value + VALUE_EPSILON {
            return true;
        }
        (self.value - other.value).abs() <= VALUE_EPSILON && self.cost < other.cost - VALUE_EPSILON
    }
}

/// Integer budget axis the DP runs on.
struct Grid {
    unit: f64,
    budget_units: f64,
    instances: Vec<Instance>,
}

impl Grid {
    /// Take flags for every instance plus the best row, in bytes.
    fn table_size(&self) -> f64 {
        let width = self.budget_units + 1.0;
        width * (self.instances.len() as f64 + size_of::<Cell>() as f64)
    }
}

/// Snap values within float noise of an integer before rounding.
fn snap(x: f64) -> Option<f64> {
    let rounded = x.round();
    ((x - rounded).abs() < SNAP_TOLERANCE).then_some(rounded)
}

fn ceil_units(x: f64) -> f64 {
    snap(x).unwrap_or_else(|| x.ceil())
}

fn floor_units(x: f64) -> f64 {
    snap(x).unwrap_or_else(|| x.floor())
}

/// Exact-price budget check, tolerant of summation noise (0.1 + 0.2 fits 0.3).
fn fits(total: f64, budget: f64) -> bool {
    total <= budget + BUDGET_TOLERANCE * budget.abs().max(1.0)
}

fn spent(candidates: &[Candidate], quantities: &[u32]) -> f64 {
    candidates
        .iter()
        .zip(quantities)
        .map(|(c, &q)| c.unit_price * q as f64)
        .sum()
}

/// Selectable lines by value density, highest first, ties in input order.
fn density_order(candidates: &[Candidate]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..candidates.len())
        .filter(|&i| candidates[i].is_selectable())
        .collect();
    order.sort_by(|&a, &b| {
        candidates[b]
            .density()
            .partial_cmp(&candidates[a].density())
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Budget-constrained value maximization over a discretized currency axis.
///
/// The axis is `currency_unit`, refined tenfold (at most
/// `MAX_GRID_REFINEMENTS` times) until every affordable price lands on it.
/// Off-grid prices round up and the budget rounds down, so any
/// table-feasible selection fits the exact budget; a final fill pass adds
/// back units that fit at exact prices but not on the grid.
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    currency_unit: f64,
    max_table_cells: usize,
}

impl SelectionEngine {
    pub fn new(currency_unit: f64, max_table_cells: usize) -> Self {
        Self {
            currency_unit,
            max_table_cells,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.currency_unit, config.max_table_cells)
    }

    /// Select quantities maximizing total value with total cost <= `budget`.
    ///
    /// Ties on value prefer the cheaper selection, then earlier candidates.
    pub fn select(&self, candidates: &[Candidate], budget: f64, mode: SolveMode) -> Selection {
        if candidates.is_empty() || !budget.is_finite() || budget <= 0.0 {
            return Selection::empty(candidates.len());
        }

        let ceiling = self.max_table_cells as f64;
        let mut grid = self.grid(candidates, budget, mode, self.grid_unit(candidates, budget));
        if grid.table_size() > ceiling && grid.unit < self.currency_unit {
            debug!(unit = grid.unit, "refined grid over ceiling, using currency unit");
            grid = self.grid(candidates, budget, mode, self.currency_unit);
        }

        let mut selection = if grid.instances.is_empty() {
            Selection::empty(candidates.len())
        } else if grid.table_size() > ceiling {
            warn!(
                table_size = grid.table_size(),
                ceiling = self.max_table_cells,
                "DP table over ceiling, using greedy approximation"
            );
            Selection {
                quantities: solve_greedy(candidates, budget, mode),
                approximate: true,
            }
        } else {
            debug!(
                instances = grid.instances.len(),
                unit = grid.unit,
                budget_units = grid.budget_units,
                "solving with exact DP"
            );
            Selection {
                quantities: solve_exact(&grid.instances, grid.budget_units as usize, candidates.len()),
                approximate: false,
            }
        };

        trim_to_budget(candidates, &mut selection.quantities, budget);
        fill_remaining(candidates, &mut selection.quantities, budget, mode);
        selection
    }

    /// Coarsest grid, from `currency_unit` down by tenths, on which every
    /// affordable price is a whole number of cells.
    fn grid_unit(&self, candidates: &[Candidate], budget: f64) -> f64 {
        let prices: Vec<f64> = candidates
            .iter()
            .filter(|c| c.is_selectable() && c.unit_price > 0.0 && fits(c.unit_price, budget))
            .map(|c| c.unit_price)
            .collect();

        (0..=MAX_GRID_REFINEMENTS)
            .map(|step| self.currency_unit / 10f64.powi(step as i32))
            .find(|&unit| prices.iter().all(|price| snap(price / unit).is_some()))
            .unwrap_or(self.currency_unit)
    }

    fn grid(&self, candidates: &[Candidate], budget: f64, mode: SolveMode, unit: f64) -> Grid {
        let budget_units = floor_units(budget / unit);
        Grid {
            unit,
            budget_units,
            instances: expand(candidates, mode, unit, budget_units),
        }
    }
}

/// Split lines into 0/1 instances; bounded lines use binary splitting
/// (1, 2, 4, ..., remainder) so any quantity up to the request is reachable.
fn expand(candidates: &[Candidate], mode: SolveMode, unit: f64, budget_units: f64) -> Vec<Instance> {
    let mut instances = Vec::new();

    for (line, candidate) in candidates.iter().enumerate() {
        if !candidate.is_selectable() {
            continue;
        }

        let mut remaining = candidate.max_units(mode);
        let mut chunk = 1u32;
        while remaining > 0 {
            let count = chunk.min(remaining);
            let cost = candidate.unit_price.max(0.0) * count as f64;
            let units = ceil_units(cost / unit);
            if units > budget_units {
                // No total of `count` or more units fits; smaller totals are covered
                break;
            }
            instances.push(Instance {
                line,
                count,
                units: units as usize,
                value: candidate.unit_value * count as f64,
                cost,
            });
            remaining -= count;
            chunk = chunk.saturating_mul(2);
        }
    }

    instances
}

/// 0/1 DP over instances: `best[w]` holds the best cell with cost <= w units.
fn solve_exact(instances: &[Instance], budget_units: usize, lines: usize) -> Vec<u32> {
    let width = budget_units + 1;
    let mut best = vec![Cell::default(); width];
    let mut take = vec![false; instances.len() * width];

    for (i, instance) in instances.iter().enumerate() {
        let row = &mut take[i * width..(i + 1) * width];
        // Decreasing w keeps each instance single-use
        for w in (instance.units..width).rev() {
            let prev = best[w - instance.units];
            let candidate = Cell {
                value: prev.value + instance.value,
                cost: prev.cost + instance.cost,
            };
            if candidate.beats(&best[w]) {
                best[w] = candidate;
                row[w] = true;
            }
        }
    }

    let mut quantities = vec![0u32; lines];
    let mut w = budget_units;
    for (i, instance) in instances.iter().enumerate().rev() {
        if take[i * width + w] {
            quantities[instance.line] += instance.count;
            w -= instance.units;
        }
    }
    quantities
}

/// Fill by value density, highest first, ties in input order.
fn solve_greedy(candidates: &[Candidate], budget: f64, mode: SolveMode) -> Vec<u32> {
    let mut quantities = vec![0u32; candidates.len()];
    let mut remaining = budget;

    for idx in density_order(candidates) {
        let candidate = &candidates[idx];
        let max_units = candidate.max_units(mode);
        let mut count = if candidate.unit_price <= 0.0 {
            max_units
        } else {
            (remaining / candidate.unit_price)
                .floor()
                .min(max_units as f64)
                .max(0.0) as u32
        };
        while count > 0 && candidate.unit_price.max(0.0) * count as f64 > remaining {
            count -= 1;
        }
        quantities[idx] = count;
        remaining -= candidate.unit_price.max(0.0) * count as f64;
    }

    quantities
}

/// Drop units from the least dense lines until the exact total fits.
fn trim_to_budget(candidates: &[Candidate], quantities: &mut [u32], budget: f64) {
    loop {
        let total = spent(candidates, quantities);
        if fits(total, budget) {
            return;
        }

        let worst = (0..candidates.len())
            .filter(|&i| quantities[i] > 0 && candidates[i].unit_price > 0.0)
            .min_by(|&a, &b| {
                candidates[a]
                    .density()
                    .partial_cmp(&candidates[b].density())
                    .unwrap_or(Ordering::Equal)
                    .then(b.cmp(&a))
            });

        match worst {
            Some(i) => {
                warn!(line = i, total, budget, "trimming selection back under budget");
                quantities[i] -= 1;
            }
            None => return,
        }
    }
}

/// Add units that still fit at exact prices, densest lines first.
fn fill_remaining(candidates: &[Candidate], quantities: &mut [u32], budget: f64, mode: SolveMode) {
    for idx in density_order(candidates) {
        let candidate = &candidates[idx];
        let room = candidate.max_units(mode).saturating_sub(quantities[idx]);
        if room == 0 {
            continue;
        }

        let total = spent(candidates, quantities);
        let price = candidate.unit_price.max(0.0);
        let mut add = if price <= 0.0 {
            room
        } else {
            ((budget - total) / price + SNAP_TOLERANCE)
                .floor()
                .clamp(0.0, room as f64) as u32
        };
        while add > 0 && !fits(total + price * add as f64, budget) {
            add -= 1;
        }

        if add > 0 {
            debug!(line = idx, add, "filling leftover budget at exact prices");
            quantities[idx] += add;
        }
    }
}
