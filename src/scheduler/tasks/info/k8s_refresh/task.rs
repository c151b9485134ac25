use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::domain::inventory::model::ClusterSnapshot;
use crate::domain::inventory::service::inventory_service::InventoryService;
use crate::errors::InventoryResult;

#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub clusters: usize,
    pub namespaces: usize,
    pub collect_ms: u128,
    pub store_ms: u128,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Completed(RefreshReport),
    /// Another cycle held the refresh slot
    Skipped,
}

/// One full refresh cycle: collect every cluster, then store every cluster.
///
/// Nothing is stored unless every cluster was collected, and all clusters
/// are stored in a single transaction, so a failure anywhere leaves the
/// previously stored inventory untouched.
pub async fn refresh_inventory(service: &InventoryService) -> InventoryResult<RefreshOutcome> {
    let Some(_cycle) = service.try_begin_cycle() else {
        warn!("Refresh cycle already running, skipping trigger");
        return Ok(RefreshOutcome::Skipped);
    };

    info!("Task for loading resources from clusters has started");

    // ---------------------------
    // 1. COLLECT
    // ---------------------------
    let started = Instant::now();
    let collected = match service.collect_clusters().await {
        Ok(collected) => collected,
        Err(e) => {
            error!("collection failed, nothing stored: {e}");
            service.runtime().mark_error(e.to_string()).await;
            return Err(e);
        }
    };
    let collect_ms = started.elapsed().as_millis();

    let snapshots: Vec<ClusterSnapshot> = collected.iter().map(|c| c.to_snapshot()).collect();
    service.runtime().update_collection(collected).await;

    // ---------------------------
    // 2. STORE
    // ---------------------------
    let store_started = Instant::now();
    if let Err(e) = service.store_all_in_db(&snapshots).await {
        error!("storing failed, previous inventory kept: {e}");
        service.runtime().mark_error(e.to_string()).await;
        return Err(e);
    }
    let store_ms = store_started.elapsed().as_millis();

    let report = RefreshReport {
        clusters: snapshots.len(),
        namespaces: snapshots.iter().map(|s| s.namespace_count()).sum(),
        collect_ms,
        store_ms,
        finished_at: Utc::now(),
    };

    info!("Task completed. Total clusters loaded: {}", report.clusters);
    info!("Loading Duration = {} ms", report.collect_ms);
    info!("Storing Duration = {} ms", report.store_ms);

    Ok(RefreshOutcome::Completed(report))
}
