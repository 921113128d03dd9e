use std::fs;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tracing::debug;

use eco_basket_rs::catalog::{Catalog, ProductCatalog};
use eco_basket_rs::cli::{Cli, Command, KnapsackArgs, OptimizeArgs};
use eco_basket_rs::config::EngineConfig;
use eco_basket_rs::error::{BasketError, Result};
use eco_basket_rs::interface::{display_item, display_item_list, display_selection, write_selection_csv};
use eco_basket_rs::models::{Constraints, KnapsackRequest, OptimizeRequest, SelectionResult};
use eco_basket_rs::service::BasketService;
use eco_basket_rs::telemetry;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(timeout_ms) = cli.lookup_timeout_ms {
        config.lookup_timeout_ms = timeout_ms;
        config.validate()?;
    }
    telemetry::init(&config.log_level)?;
    debug!(?config, "configuration loaded");

    let catalog = ProductCatalog::load(&cli.catalog, cli.prices.as_deref())?;

    match &cli.command {
        Command::Product { identifier } => cmd_product(&catalog, identifier, cli.json),
        Command::Search { query, limit } => cmd_search(&catalog, query, *limit, cli.json),
        Command::Optimize(args) => {
            let service = BasketService::new(Arc::new(catalog), config);
            cmd_optimize(&service, args, cli.json).await
        }
        Command::Knapsack(args) => {
            let service = BasketService::new(Arc::new(catalog), config);
            cmd_knapsack(&service, args, cli.json).await
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_request<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Show a single product.
fn cmd_product(catalog: &ProductCatalog, identifier: &str, json: bool) -> Result<()> {
    let item = catalog.lookup(identifier)?;

    if json {
        print_json(&item)
    } else {
        display_item(&item);
        Ok(())
    }
}

/// Search the catalog.
fn cmd_search(catalog: &ProductCatalog, query: &str, limit: usize, json: bool) -> Result<()> {
    let hits = catalog.search(query, limit);
    if json {
        print_json(&hits)
    } else {
        display_item_list(&hits, &format!("Results for '{}'", query));
        Ok(())
    }
}

fn emit(result: &SelectionResult, csv: Option<&Path>, json: bool) -> Result<()> {
    if let Some(path) = csv {
        write_selection_csv(result, path)?;
        eprintln!("Wrote {}", path.display());
    }
    if json {
        print_json(result)
    } else {
        display_selection(result);
        Ok(())
    }
}

/// Run list optimization from flags or a request file.
async fn cmd_optimize(service: &BasketService, args: &OptimizeArgs, json: bool) -> Result<()> {
    let request = match &args.request {
        Some(path) => read_request::<OptimizeRequest>(path)?,
        None => OptimizeRequest {
            items: args.items.clone(),
            constraints: Constraints {
                budget: args.budget,
                objective: args.objective(),
                excluded_categories: args.excluded_categories.clone(),
                preferences: args.preferences.clone(),
            },
        },
    };

    let result = service.optimize(&request).await?;
    emit(&result, args.csv.as_deref(), json)
}

/// Run the knapsack selection from flags or a request file.
async fn cmd_knapsack(service: &BasketService, args: &KnapsackArgs, json: bool) -> Result<()> {
    let request = match (&args.request, args.budget) {
        (Some(path), _) => read_request::<KnapsackRequest>(path)?,
        (None, Some(budget)) => KnapsackRequest {
            budget,
            items: args.items.clone(),
        },
        (None, None) => {
            return Err(BasketError::InvalidInput(
                "--budget is required without --request".to_string(),
            ))
        }
    };

    let result = service.solve_knapsack(&request).await?;
    emit(&result, args.csv.as_deref(), json)
}
