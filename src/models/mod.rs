mod cart;
mod item;
mod result;

pub use cart::{
    dedupe_lines, merge_duplicate_lines, validate_budget, CartLine, Constraints, KnapsackRequest,
    Objective, OptimizeRequest, ResolvedLine,
};
pub use item::{EnvironmentalImpact, Item};
pub use result::{
    ChosenLine, ExcludedLine, ExclusionReason, ImpactTotals, LookupFailure, LookupWarning,
    SelectionMode, SelectionResult,
};
