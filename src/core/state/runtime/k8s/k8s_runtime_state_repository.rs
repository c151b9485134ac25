use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::state::runtime::k8s::k8s_runtime_state::K8sRuntimeState;
use crate::core::state::runtime::k8s::k8s_runtime_state_repository_trait::K8sRuntimeStateRepositoryTrait;

/// Holds the live collection behind a swappable `Arc`.
///
/// Readers keep whatever collection they were handed even if a newer walk
/// lands while they are still using it.
#[derive(Default)]
pub struct K8sRuntimeStateRepository {
    current: RwLock<Arc<K8sRuntimeState>>,
}

impl K8sRuntimeStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait::async_trait]
impl K8sRuntimeStateRepositoryTrait for K8sRuntimeStateRepository {
    async fn get(&self) -> Arc<K8sRuntimeState> {
        Arc::clone(&*self.current.read().await)
    }

    async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut K8sRuntimeState) + Send + Sync,
    {
        let mut current = self.current.write().await;
        let mut next = K8sRuntimeState::clone(&current);
        f(&mut next);
        // the write lock is held until the new collection is in place
        *current = Arc::new(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inventory::model::CollectedCluster;

    fn cluster(name: &str) -> CollectedCluster {
        CollectedCluster {
            name: name.to_string(),
            namespaces: vec![],
        }
    }

    #[tokio::test]
    async fn earlier_readers_keep_their_collection() {
        let repo = K8sRuntimeStateRepository::new();
        repo.update(|s| s.update(vec![cluster("c1")])).await;
        let before = repo.get().await;

        repo.update(|s| s.update(vec![cluster("c2"), cluster("c3")])).await;

        assert_eq!(before.clusters.len(), 1);
        assert_eq!(repo.get().await.clusters.len(), 2);
    }

    #[tokio::test]
    async fn starts_without_a_collection() {
        let state = K8sRuntimeStateRepository::new().get().await;
        assert!(state.clusters.is_empty());
        assert!(state.last_collected_at.is_none());
    }
}
