use std::sync::Arc;
use std::time::Duration;

use tokio::task::{self, JoinHandle};
use tokio::time;
use tracing::{debug, warn};

use crate::catalog::{Catalog, CatalogError};
use crate::models::{CartLine, Item, LookupWarning, ResolvedLine};

/// Cart lines that resolved, plus one warning per line that did not.
#[derive(Debug, Default)]
pub struct Resolution {
    pub lines: Vec<ResolvedLine>,
    pub warnings: Vec<LookupWarning>,
}

fn spawn_lookup(
    catalog: Arc<dyn Catalog>,
    identifier: String,
    limit: Duration,
) -> JoinHandle<Result<Item, CatalogError>> {
    tokio::spawn(async move {
        let lookup_id = identifier.clone();
        let blocking = task::spawn_blocking(move || catalog.lookup(&lookup_id));
        match time::timeout(limit, blocking).await {
            Ok(Ok(found)) => found,
            Ok(Err(join_err)) => Err(CatalogError::Unavailable(join_err.to_string())),
            Err(_) => Err(CatalogError::Timeout {
                identifier,
                after_ms: limit.as_millis() as u64,
            }),
        }
    })
}

/// Look up every line concurrently, each bounded by `limit`.
///
/// Results keep cart order. A failed lookup drops its line and records a warning;
/// it never fails the batch.
pub async fn resolve_lines(
    catalog: Arc<dyn Catalog>,
    lines: &[CartLine],
    limit: Duration,
) -> Resolution {
    let pending: Vec<(&CartLine, JoinHandle<Result<Item, CatalogError>>)> = lines
        .iter()
        .map(|line| {
            let handle = spawn_lookup(Arc::clone(&catalog), line.identifier.trim().to_string(), limit);
            (line, handle)
        })
        .collect();

    let mut resolution = Resolution::default();
    for (line, handle) in pending {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(join_err) => Err(CatalogError::Unavailable(join_err.to_string())),
        };

        match outcome {
            Ok(item) => {
                debug!(identifier = %line.identifier, "resolved");
                resolution.lines.push(ResolvedLine::new(item, line.quantity));
            }
            Err(err) => {
                warn!(identifier = %line.identifier, error = %err, "lookup failed, dropping line");
                resolution.warnings.push(LookupWarning {
                    identifier: line.identifier.clone(),
                    failure: err.failure(),
                    message: err.to_string(),
                });
            }
        }
    }
    resolution
}
