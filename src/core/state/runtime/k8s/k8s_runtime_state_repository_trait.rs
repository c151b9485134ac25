use std::sync::Arc;
use async_trait::async_trait;

use crate::core::state::runtime::k8s::k8s_runtime_state::K8sRuntimeState;

#[async_trait]
pub trait K8sRuntimeStateRepositoryTrait: Send + Sync {

    /// Return the current state as an Arc.
    /// Raw manifests make this large, so it is never cloned for reads.
    async fn get(&self) -> Arc<K8sRuntimeState>;

    /// Mutate the internal state using a closure.
    async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut K8sRuntimeState) + Send + Sync;
}
