use std::sync::Arc;
use crate::core::state::runtime::k8s::k8s_runtime_state::K8sRuntimeState;
use crate::core::state::runtime::k8s::k8s_runtime_state_repository_trait::K8sRuntimeStateRepositoryTrait;
use crate::domain::inventory::environment_aggregator::aggregate_environments;
use crate::domain::inventory::model::{CollectedCluster, Environment};

pub struct K8sRuntimeStateManager<R: K8sRuntimeStateRepositoryTrait> {
    pub(crate) repo: Arc<R>,
}

impl<R: K8sRuntimeStateRepositoryTrait> K8sRuntimeStateManager<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn state(&self) -> Arc<K8sRuntimeState> {
        self.repo.get().await
    }

    /// Replace the collected clusters with a fresh walk.
    pub async fn update_collection(&self, clusters: Vec<CollectedCluster>) {
        self.repo.update(move |state| state.update(clusters)).await;
    }

    /// Record a cycle failure (collected clusters remain intact).
    pub async fn mark_error(&self, message: String) {
        self.repo.update(|state| state.mark_error(message)).await;
    }

    /// Environments recomputed from the last collected namespaces.
    ///
    /// Clusters are grouped independently and concatenated in collection
    /// order. This reflects the last walk, which may not be stored yet.
    pub async fn get_environments(&self) -> Vec<Environment> {
        let state = self.repo.get().await;
        state
            .clusters
            .iter()
            .flat_map(|cluster| aggregate_environments(cluster.namespaces.iter().cloned()))
            .collect()
    }
}
