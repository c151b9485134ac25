use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use kube::Client;

use crate::core::client::access_provider::ClusterAccess;
use crate::core::client::config_maps::fetch_config_maps_by_namespace;
use crate::core::client::deployments::fetch_deployments_by_namespace;
use crate::core::client::kube_client::build_kube_client;
use crate::core::client::kube_resources::{ConfigMap, Deployment, Namespace, Pod};
use crate::core::client::namespaces::fetch_namespaces;
use crate::core::client::pods::fetch_pods_by_namespace;

/// Read-only listing capability for a single cluster.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn list_namespaces(&self) -> Result<Vec<Namespace>>;

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<Deployment>>;

    async fn list_config_maps(&self, namespace: &str) -> Result<Vec<ConfigMap>>;

    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>>;
}

/// Opens a [`ClusterApi`] handle for one cluster.
#[async_trait]
pub trait ClusterConnector: Send + Sync {
    async fn connect(&self, access: &ClusterAccess) -> Result<Arc<dyn ClusterApi>>;
}

/// [`ClusterApi`] backed by a kube-rs client.
#[derive(Clone)]
pub struct KubeClusterApi {
    client: Client,
}

impl KubeClusterApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClusterApi for KubeClusterApi {
    async fn list_namespaces(&self) -> Result<Vec<Namespace>> {
        fetch_namespaces(&self.client).await
    }

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<Deployment>> {
        fetch_deployments_by_namespace(&self.client, namespace).await
    }

    async fn list_config_maps(&self, namespace: &str) -> Result<Vec<ConfigMap>> {
        fetch_config_maps_by_namespace(&self.client, namespace).await
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>> {
        fetch_pods_by_namespace(&self.client, namespace).await
    }
}

#[derive(Debug, Default, Clone)]
pub struct KubeClusterConnector;

#[async_trait]
impl ClusterConnector for KubeClusterConnector {
    async fn connect(&self, access: &ClusterAccess) -> Result<Arc<dyn ClusterApi>> {
        let client = build_kube_client(access).await?;
        Ok(Arc::new(KubeClusterApi::new(client)))
    }
}
