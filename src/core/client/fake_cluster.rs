//! In-memory stand-ins for the cluster-facing traits.
//!
//! Used to drive the collection walk and refresh cycles deterministically
//! without a live API server.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use kube::config::{Cluster, Kubeconfig, NamedCluster};

use crate::core::client::access_provider::{ClusterAccess, ClusterAccessProvider};
use crate::core::client::cluster_api::{ClusterApi, ClusterConnector};
use crate::core::client::kube_resources::{
    ConfigMap, Deployment, DeploymentSpec, Namespace, ObjectMeta, Pod, PodStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Namespaces,
    Deployments,
    ConfigMaps,
    Pods,
}

/// A cluster whose objects live in memory.
///
/// Listing calls can be made to fail per kind and namespace, and every call
/// is recorded so tests can assert on the walk order.
#[derive(Default)]
pub struct FakeCluster {
    namespaces: Vec<Namespace>,
    deployments: HashMap<String, Vec<Deployment>>,
    config_maps: HashMap<String, Vec<ConfigMap>>,
    pods: HashMap<String, Vec<Pod>>,
    failures: HashSet<(ResourceKind, Option<String>)>,
    calls: Mutex<Vec<String>>,
}

fn meta(name: Option<&str>, uid: &str, namespace: Option<&str>) -> ObjectMeta {
    ObjectMeta {
        name: name.map(String::from),
        uid: Some(uid.to_string()),
        namespace: namespace.map(String::from),
        ..Default::default()
    }
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(mut self, name: &str, uid: &str, labels: &[(&str, &str)]) -> Self {
        let mut metadata = meta(Some(name), uid, None);
        if !labels.is_empty() {
            metadata.labels = Some(
                labels
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            );
        }
        self.namespaces.push(Namespace {
            metadata,
            ..Default::default()
        });
        self
    }

    /// Namespace whose metadata carries a uid but no name.
    pub fn unnamed_namespace(mut self, uid: &str) -> Self {
        self.namespaces.push(Namespace {
            metadata: meta(None, uid, None),
            ..Default::default()
        });
        self
    }

    pub fn deployment(mut self, namespace: &str, name: &str, uid: &str, replicas: i32) -> Self {
        self.deployments
            .entry(namespace.to_string())
            .or_default()
            .push(Deployment {
                metadata: meta(Some(name), uid, Some(namespace)),
                spec: Some(DeploymentSpec {
                    replicas: Some(replicas),
                    ..Default::default()
                }),
                ..Default::default()
            });
        self
    }

    pub fn config_map(
        mut self,
        namespace: &str,
        name: &str,
        uid: &str,
        data: &[(&str, &str)],
    ) -> Self {
        let data: BTreeMap<String, String> = data
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.config_maps
            .entry(namespace.to_string())
            .or_default()
            .push(ConfigMap {
                metadata: meta(Some(name), uid, Some(namespace)),
                data: Some(data),
                ..Default::default()
            });
        self
    }

    pub fn pod(mut self, namespace: &str, name: &str, uid: &str, phase: &str) -> Self {
        self.pods.entry(namespace.to_string()).or_default().push(Pod {
            metadata: meta(Some(name), uid, Some(namespace)),
            status: Some(PodStatus {
                phase: Some(phase.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });
        self
    }

    /// Make listing `kind` fail; `namespace = None` fails it everywhere.
    pub fn fail_on(mut self, kind: ResourceKind, namespace: Option<&str>) -> Self {
        self.failures.insert((kind, namespace.map(String::from)));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, kind: ResourceKind, namespace: Option<&str>) -> Result<()> {
        let entry = match namespace {
            Some(ns) => format!("{:?}:{}", kind, ns),
            None => format!("{:?}", kind),
        };
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(entry.clone());
        }

        let scoped = (kind, namespace.map(String::from));
        if self.failures.contains(&scoped) || self.failures.contains(&(kind, None)) {
            bail!("injected API failure: {}", entry);
        }
        Ok(())
    }
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn list_namespaces(&self) -> Result<Vec<Namespace>> {
        self.record(ResourceKind::Namespaces, None)?;
        Ok(self.namespaces.clone())
    }

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<Deployment>> {
        self.record(ResourceKind::Deployments, Some(namespace))?;
        Ok(self.deployments.get(namespace).cloned().unwrap_or_default())
    }

    async fn list_config_maps(&self, namespace: &str) -> Result<Vec<ConfigMap>> {
        self.record(ResourceKind::ConfigMaps, Some(namespace))?;
        Ok(self.config_maps.get(namespace).cloned().unwrap_or_default())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>> {
        self.record(ResourceKind::Pods, Some(namespace))?;
        Ok(self.pods.get(namespace).cloned().unwrap_or_default())
    }
}

/// Hands out [`FakeCluster`]s by declared cluster name.
#[derive(Default)]
pub struct FakeConnector {
    clusters: Mutex<HashMap<String, Arc<FakeCluster>>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the cluster served under `name`.
    pub fn insert(&self, name: &str, cluster: FakeCluster) -> Arc<FakeCluster> {
        let cluster = Arc::new(cluster);
        if let Ok(mut clusters) = self.clusters.lock() {
            clusters.insert(name.to_string(), cluster.clone());
        }
        cluster
    }
}

#[async_trait]
impl ClusterConnector for FakeConnector {
    async fn connect(&self, access: &ClusterAccess) -> Result<Arc<dyn ClusterApi>> {
        let clusters = self
            .clusters
            .lock()
            .map_err(|_| anyhow!("fake connector lock poisoned"))?;
        let cluster = clusters
            .get(&access.declared_name)
            .cloned()
            .ok_or_else(|| anyhow!("no fake cluster named '{}'", access.declared_name))?;
        Ok(cluster as Arc<dyn ClusterApi>)
    }
}

/// Fixed list of cluster access entries, or a configured load failure.
pub struct StaticAccessProvider {
    configurations: Vec<ClusterAccess>,
    failure: Option<String>,
}

impl StaticAccessProvider {
    pub fn new(names: &[&str]) -> Self {
        Self {
            configurations: names.iter().map(|n| fake_access(n)).collect(),
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            configurations: Vec::new(),
            failure: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl ClusterAccessProvider for StaticAccessProvider {
    async fn list_configurations(&self) -> Result<Vec<ClusterAccess>> {
        match &self.failure {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(self.configurations.clone()),
        }
    }
}

/// Access entry for a cluster that only exists in memory.
pub fn fake_access(name: &str) -> ClusterAccess {
    let server = format!("https://{}.invalid:6443", name);
    ClusterAccess {
        declared_name: name.to_string(),
        server_address: Some(server.clone()),
        kubeconfig: Kubeconfig {
            clusters: vec![NamedCluster {
                name: name.to_string(),
                cluster: Some(Cluster {
                    server: Some(server),
                    ..Default::default()
                }),
            }],
            ..Default::default()
        },
    }
}
