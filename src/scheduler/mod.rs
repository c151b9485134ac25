pub mod tasks;
pub mod trigger;

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::domain::inventory::service::inventory_service::InventoryService;
use crate::scheduler::tasks::info::k8s_refresh::task::{refresh_inventory, RefreshOutcome};
use crate::scheduler::trigger::Trigger;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSummary {
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Run a refresh cycle on every trigger until the trigger ends or
/// `shutdown` resolves. A running cycle is always allowed to finish.
///
/// Failed cycles are logged and the loop carries on; the next trigger
/// starts from scratch.
pub async fn run_scheduler<T, S>(
    service: Arc<InventoryService>,
    mut trigger: T,
    shutdown: S,
) -> SchedulerSummary
where
    T: Trigger,
    S: Future<Output = ()>,
{
    let mut summary = SchedulerSummary::default();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Scheduler shutting down");
                break;
            }
            fired = trigger.next() => {
                if !fired {
                    debug!("Trigger exhausted, scheduler stopping");
                    break;
                }
                match refresh_inventory(&service).await {
                    Ok(RefreshOutcome::Completed(_)) => summary.completed += 1,
                    Ok(RefreshOutcome::Skipped) => summary.skipped += 1,
                    Err(e) => {
                        error!(?e, "Refresh cycle failed");
                        summary.failed += 1;
                    }
                }
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::fake_cluster::{FakeCluster, FakeConnector, ResourceKind, StaticAccessProvider};
    use crate::core::persistence::inventory::inventory_fs_adapter::InventoryFsAdapter;
    use crate::core::persistence::inventory::inventory_repository::InventoryRepository;
    use crate::scheduler::trigger::manual_trigger;

    fn service(dir: &tempfile::TempDir, connector: Arc<FakeConnector>) -> Arc<InventoryService> {
        let repo = InventoryRepository::open(InventoryFsAdapter::new(dir.path())).unwrap();
        Arc::new(InventoryService::new(
            Arc::new(StaticAccessProvider::new(&["c1"])),
            connector,
            repo.shared(),
        ))
    }

    #[tokio::test]
    async fn runs_one_cycle_per_trigger() {
        let dir = tempfile::tempdir().unwrap();
        let connector = Arc::new(FakeConnector::new());
        connector.insert("c1", FakeCluster::new().namespace("ns-a", "u-a", &[]));
        let service = service(&dir, connector);

        let (tx, trigger) = manual_trigger(4);
        tx.send(()).await.unwrap();
        tx.send(()).await.unwrap();
        drop(tx);

        let summary = run_scheduler(service.clone(), trigger, std::future::pending()).await;
        assert_eq!(summary.completed, 2);
        assert_eq!(service.get_clusters_from_db().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_cycle_does_not_stop_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let connector = Arc::new(FakeConnector::new());
        connector.insert(
            "c1",
            FakeCluster::new()
                .namespace("ns", "u", &[])
                .fail_on(ResourceKind::Pods, None),
        );
        let service = service(&dir, connector);

        let (tx, trigger) = manual_trigger(4);
        tx.send(()).await.unwrap();
        tx.send(()).await.unwrap();
        drop(tx);

        let summary = run_scheduler(service.clone(), trigger, std::future::pending()).await;
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.completed, 0);
        assert!(service.get_clusters_from_db().await.is_empty());
    }

    #[tokio::test]
    async fn shutdown_stops_a_waiting_scheduler() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir, Arc::new(FakeConnector::new()));

        let (_tx, trigger) = manual_trigger(1);
        let summary = run_scheduler(service, trigger, async {}).await;
        assert_eq!(summary, SchedulerSummary::default());
    }
}
