use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Placeholder used whenever the source object carries no name.
pub const EMPTY_NAME: &str = "<empty_name>";

/// Namespace label that assigns a namespace to an environment.
pub const ENVIRONMENT_NAME_LABEL: &str = "environmentName";

/// Point-in-time inventory of one cluster, keyed by cluster name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub name: String,
    pub environments: Vec<Environment>,
}

/// Namespaces grouped under one derived environment name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub namespaces: Vec<Namespace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub uid: String,
    pub name: String,
    pub deployments: Vec<Deployment>,
    pub config_maps: Vec<ConfigMap>,
    pub pods: Vec<Pod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub uid: String,
    pub name: String,
    /// Desired replica count from `spec.replicas`
    pub replicas: Option<i32>,
    /// Full manifest as returned by the API server
    pub raw_json: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMap {
    pub uid: String,
    pub name: String,
    pub data: BTreeMap<String, String>,
    pub raw_json: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pod {
    pub uid: String,
    pub name: String,
    /// Textual status (`Running`, `Pending`, ...)
    pub phase: Option<String>,
    pub raw_json: String,
}

/// A namespace as it came out of the collection walk, together with the
/// environment name derived from its labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedNamespace {
    pub environment_name: String,
    pub namespace: Namespace,
}

/// Raw collection result for one cluster, in API order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedCluster {
    pub name: String,
    pub namespaces: Vec<CollectedNamespace>,
}

impl CollectedCluster {
    /// Fold the collected namespaces into environments.
    pub fn to_snapshot(&self) -> ClusterSnapshot {
        ClusterSnapshot {
            name: self.name.clone(),
            environments: super::environment_aggregator::aggregate_environments(
                self.namespaces.iter().cloned(),
            ),
        }
    }

    pub fn into_snapshot(self) -> ClusterSnapshot {
        ClusterSnapshot {
            name: self.name,
            environments: super::environment_aggregator::aggregate_environments(self.namespaces),
        }
    }
}

impl ClusterSnapshot {
    pub fn namespace_count(&self) -> usize {
        self.environments.iter().map(|e| e.namespaces.len()).sum()
    }
}
