use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::core::client::access_provider::ClusterAccessProvider;
use crate::core::client::cluster_api::ClusterConnector;
use crate::core::persistence::inventory::inventory_repository::InventoryRepository;
use crate::core::state::runtime::k8s::k8s_runtime_state_manager::K8sRuntimeStateManager;
use crate::core::state::runtime::k8s::k8s_runtime_state_repository::K8sRuntimeStateRepository;
use crate::domain::inventory::model::{ClusterSnapshot, CollectedCluster, Environment};
use crate::domain::inventory::service::resource_collector::collect_all;
use crate::domain::inventory::service::snapshot_store_service::SnapshotStore;
use crate::errors::InventoryResult;

/// Entry points of the inventory: collection, storage and the two read
/// paths (live environments and stored snapshots).
pub struct InventoryService {
    provider: Arc<dyn ClusterAccessProvider>,
    connector: Arc<dyn ClusterConnector>,
    store: SnapshotStore<InventoryRepository>,
    runtime: K8sRuntimeStateManager<K8sRuntimeStateRepository>,
    /// Held for the duration of a refresh cycle
    cycle: Mutex<()>,
}

impl InventoryService {
    pub fn new(
        provider: Arc<dyn ClusterAccessProvider>,
        connector: Arc<dyn ClusterConnector>,
        repository: Arc<InventoryRepository>,
    ) -> Self {
        Self {
            provider,
            connector,
            store: SnapshotStore::new(repository),
            runtime: K8sRuntimeStateManager::new(K8sRuntimeStateRepository::new().shared()),
            cycle: Mutex::new(()),
        }
    }

    /// Collect every configured cluster, in provider order.
    pub async fn collect_clusters(&self) -> InventoryResult<Vec<CollectedCluster>> {
        collect_all(self.provider.as_ref(), self.connector.as_ref()).await
    }

    /// Replace one cluster's stored inventory.
    pub async fn store_in_db(&self, snapshot: &ClusterSnapshot) -> InventoryResult<()> {
        self.store.store_snapshot(snapshot).await
    }

    /// Replace several clusters' stored inventory atomically.
    pub async fn store_all_in_db(&self, snapshots: &[ClusterSnapshot]) -> InventoryResult<()> {
        self.store.store_snapshots(snapshots).await
    }

    /// Stored snapshots, ordered by cluster name.
    pub async fn get_clusters_from_db(&self) -> Vec<ClusterSnapshot> {
        self.store.list_snapshots().await
    }

    pub async fn get_cluster_from_db(&self, name: &str) -> Option<ClusterSnapshot> {
        self.store.find_snapshot(name).await
    }

    /// Environments recomputed from the last collection walk.
    ///
    /// May differ from [`Self::get_clusters_from_db`] when the last store
    /// failed or has not happened yet.
    pub async fn get_environments(&self) -> Vec<Environment> {
        self.runtime.get_environments().await
    }

    pub fn runtime(&self) -> &K8sRuntimeStateManager<K8sRuntimeStateRepository> {
        &self.runtime
    }

    /// Claim the refresh slot, or `None` when a cycle is already running.
    pub(crate) fn try_begin_cycle(&self) -> Option<MutexGuard<'_, ()>> {
        self.cycle.try_lock().ok()
    }
}
