use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::models::{CartLine, Objective};

/// eco_basket: budget-constrained sustainable shopping basket planner.
#[derive(Parser, Debug)]
#[command(name = "eco_basket")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the product catalog JSON file.
    #[arg(short, long, global = true, default_value = "products.json")]
    pub catalog: PathBuf,

    /// Optional `barcode,price` CSV overriding catalog prices.
    #[arg(long, global = true)]
    pub prices: Option<PathBuf>,

    /// Engine config JSON file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Per-lookup catalog timeout in milliseconds.
    #[arg(long, global = true)]
    pub lookup_timeout_ms: Option<u64>,

    /// Log filter (overridden by RUST_LOG).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show one product.
    Product {
        identifier: String,
    },

    /// Fuzzy search products by name or brand.
    Search {
        query: String,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Choose quantities per cart line under an objective and optional budget.
    Optimize(OptimizeArgs),

    /// Choose at most one unit per product, maximizing total sustainability.
    Knapsack(KnapsackArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectiveArg {
    #[default]
    Cheapest,
    Healthiest,
    Balanced,
    Custom,
}

#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// Cart line as ID or ID:QTY (repeatable).
    #[arg(short, long = "item", value_name = "ID[:QTY]")]
    pub items: Vec<CartLine>,

    #[arg(short, long)]
    pub budget: Option<f64>,

    #[arg(short, long, value_enum, default_value_t)]
    pub objective: ObjectiveArg,

    /// Price weight for the custom objective.
    #[arg(long, default_value_t = 0.5)]
    pub price_weight: f64,

    /// Sustainability weight for the custom objective.
    #[arg(long, default_value_t = 0.5)]
    pub sustainability_weight: f64,

    /// Category to exclude (repeatable, substring match).
    #[arg(long = "exclude", value_name = "CATEGORY")]
    pub excluded_categories: Vec<String>,

    /// Preference keyword to boost (repeatable).
    #[arg(long = "prefer", value_name = "KEYWORD")]
    pub preferences: Vec<String>,

    /// Read the whole request from a JSON file instead of flags.
    #[arg(long, conflicts_with_all = ["items", "budget"])]
    pub request: Option<PathBuf>,

    /// Also write the selection as CSV.
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl OptimizeArgs {
    pub fn objective(&self) -> Objective {
        match self.objective {
            ObjectiveArg::Cheapest => Objective::Cheapest,
            ObjectiveArg::Healthiest => Objective::Healthiest,
            ObjectiveArg::Balanced => Objective::Balanced,
            ObjectiveArg::Custom => Objective::Custom {
                price_weight: self.price_weight,
                sustainability_weight: self.sustainability_weight,
            },
        }
    }
}

#[derive(Args, Debug)]
pub struct KnapsackArgs {
    #[arg(short, long, required_unless_present = "request")]
    pub budget: Option<f64>,

    /// Candidate product identifier (repeatable).
    #[arg(short, long = "item", value_name = "ID")]
    pub items: Vec<CartLine>,

    /// Read the whole request from a JSON file instead of flags.
    #[arg(long, conflicts_with_all = ["items", "budget"])]
    pub request: Option<PathBuf>,

    /// Also write the selection as CSV.
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_optimize() {
        let cli = Cli::try_parse_from([
            "eco_basket",
            "optimize",
            "--item",
            "780001:3",
            "--item",
            "780002",
            "--budget",
            "5000",
            "--objective",
            "custom",
            "--price-weight",
            "0.2",
            "--exclude",
            "meat",
        ])
        .unwrap();

        let Command::Optimize(args) = cli.command else {
            panic!("expected optimize");
        };
        assert_eq!(args.items, vec![CartLine::new("780001", 3), CartLine::new("780002", 1)]);
        assert_eq!(args.budget, Some(5000.0));
        assert_eq!(
            args.objective(),
            Objective::Custom {
                price_weight: 0.2,
                sustainability_weight: 0.5
            }
        );
        assert_eq!(args.excluded_categories, vec!["meat"]);
        assert_eq!(cli.catalog, PathBuf::from("products.json"));
    }

    #[test]
    fn test_knapsack_requires_budget() {
        assert!(Cli::try_parse_from(["eco_basket", "knapsack", "--item", "1"]).is_err());
        let cli = Cli::try_parse_from(["eco_basket", "--json", "knapsack", "-b", "80", "-i", "1"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn test_bad_cart_line_rejected() {
        assert!(Cli::try_parse_from(["eco_basket", "optimize", "--item", "x:0"]).is_err());
    }
}
