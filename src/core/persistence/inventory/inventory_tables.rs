use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::inventory::model::{
    ClusterSnapshot, ConfigMap, Deployment, Environment, Namespace, Pod,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRow {
    pub name: String,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentRow {
    /// Generated on every insert; environments have no natural key
    pub id: String,
    pub cluster_name: String,
    pub name: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceRow {
    pub uid: String,
    pub environment_id: String,
    pub name: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRow {
    pub uid: String,
    pub namespace_uid: String,
    pub name: String,
    pub replicas: Option<i32>,
    pub raw_json: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMapRow {
    pub uid: String,
    pub namespace_uid: String,
    pub name: String,
    pub data: BTreeMap<String, String>,
    pub raw_json: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodRow {
    pub uid: String,
    pub namespace_uid: String,
    pub name: String,
    pub phase: Option<String>,
    pub raw_json: String,
    pub position: usize,
}

/// Row-level view of every stored cluster inventory.
///
/// Each table is keyed by its primary key; children point at their parent
/// through an explicit key column. Cascading deletes are done here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryTables {
    pub clusters: BTreeMap<String, ClusterRow>,
    pub environments: BTreeMap<String, EnvironmentRow>,
    pub namespaces: BTreeMap<String, NamespaceRow>,
    pub deployments: BTreeMap<String, DeploymentRow>,
    pub config_maps: BTreeMap<String, ConfigMapRow>,
    pub pods: BTreeMap<String, PodRow>,
}

fn insert_unique<R>(table: &mut BTreeMap<String, R>, kind: &str, key: &str, row: R) -> Result<()> {
    if table.contains_key(key) {
        bail!("duplicate {} key '{}'", kind, key);
    }
    table.insert(key.to_string(), row);
    Ok(())
}

/// Sort children by position and group them under their parent key.
fn group_by_parent<'a, R, K, P>(rows: impl Iterator<Item = &'a R>, parent: K, position: P) -> HashMap<&'a str, Vec<&'a R>>
where
    R: 'a,
    K: Fn(&'a R) -> &'a str,
    P: Fn(&R) -> usize,
{
    let mut grouped: HashMap<&str, Vec<&R>> = HashMap::new();
    for row in rows {
        grouped.entry(parent(row)).or_default().push(row);
    }
    for children in grouped.values_mut() {
        children.sort_by_key(|r| position(r));
    }
    grouped
}

impl InventoryTables {
    pub fn find_cluster(&self, name: &str) -> Option<&ClusterRow> {
        self.clusters.get(name)
    }

    /// Delete a cluster and everything it owns.
    ///
    /// Returns `false` when no cluster with that name was stored.
    pub fn delete_cluster(&mut self, name: &str) -> bool {
        if self.clusters.remove(name).is_none() {
            return false;
        }

        let environment_ids: HashSet<String> = self
            .environments
            .values()
            .filter(|e| e.cluster_name == name)
            .map(|e| e.id.clone())
            .collect();

        let namespace_uids: HashSet<String> = self
            .namespaces
            .values()
            .filter(|n| environment_ids.contains(&n.environment_id))
            .map(|n| n.uid.clone())
            .collect();

        self.deployments
            .retain(|_, d| !namespace_uids.contains(&d.namespace_uid));
        self.config_maps
            .retain(|_, c| !namespace_uids.contains(&c.namespace_uid));
        self.pods.retain(|_, p| !namespace_uids.contains(&p.namespace_uid));
        self.namespaces.retain(|uid, _| !namespace_uids.contains(uid));
        self.environments.retain(|id, _| !environment_ids.contains(id));

        true
    }

    /// Insert a whole cluster tree. Fails on any primary-key clash, leaving
    /// `self` partially written; callers run this inside a transaction.
    pub fn insert_cluster(&mut self, snapshot: &ClusterSnapshot, stored_at: DateTime<Utc>) -> Result<()> {
        insert_unique(
            &mut self.clusters,
            "cluster",
            &snapshot.name,
            ClusterRow {
                name: snapshot.name.clone(),
                stored_at,
            },
        )?;

        for (env_pos, env) in snapshot.environments.iter().enumerate() {
            let environment_id = Uuid::new_v4().to_string();
            insert_unique(
                &mut self.environments,
                "environment",
                &environment_id,
                EnvironmentRow {
                    id: environment_id.clone(),
                    cluster_name: snapshot.name.clone(),
                    name: env.name.clone(),
                    position: env_pos,
                },
            )?;

            for (ns_pos, ns) in env.namespaces.iter().enumerate() {
                self.insert_namespace(&environment_id, ns_pos, ns)?;
            }
        }
        Ok(())
    }

    fn insert_namespace(&mut self, environment_id: &str, position: usize, ns: &Namespace) -> Result<()> {
        insert_unique(
            &mut self.namespaces,
            "namespace",
            &ns.uid,
            NamespaceRow {
                uid: ns.uid.clone(),
                environment_id: environment_id.to_string(),
                name: ns.name.clone(),
                position,
            },
        )?;

        for (pos, d) in ns.deployments.iter().enumerate() {
            insert_unique(
                &mut self.deployments,
                "deployment",
                &d.uid,
                DeploymentRow {
                    uid: d.uid.clone(),
                    namespace_uid: ns.uid.clone(),
                    name: d.name.clone(),
                    replicas: d.replicas,
                    raw_json: d.raw_json.clone(),
                    position: pos,
                },
            )?;
        }
        for (pos, c) in ns.config_maps.iter().enumerate() {
            insert_unique(
                &mut self.config_maps,
                "config map",
                &c.uid,
                ConfigMapRow {
                    uid: c.uid.clone(),
                    namespace_uid: ns.uid.clone(),
                    name: c.name.clone(),
                    data: c.data.clone(),
                    raw_json: c.raw_json.clone(),
                    position: pos,
                },
            )?;
        }
        for (pos, p) in ns.pods.iter().enumerate() {
            insert_unique(
                &mut self.pods,
                "pod",
                &p.uid,
                PodRow {
                    uid: p.uid.clone(),
                    namespace_uid: ns.uid.clone(),
                    name: p.name.clone(),
                    phase: p.phase.clone(),
                    raw_json: p.raw_json.clone(),
                    position: pos,
                },
            )?;
        }
        Ok(())
    }

    /// Rebuild every stored cluster tree, ordered by cluster name.
    pub fn snapshots(&self) -> Vec<ClusterSnapshot> {
        self.build_snapshots(|_| true)
    }

    pub fn snapshot(&self, name: &str) -> Option<ClusterSnapshot> {
        self.build_snapshots(|cluster| cluster == name).into_iter().next()
    }

    fn build_snapshots<F: Fn(&str) -> bool>(&self, wanted: F) -> Vec<ClusterSnapshot> {
        let envs_by_cluster = group_by_parent(
            self.environments.values(),
            |e| e.cluster_name.as_str(),
            |e| e.position,
        );
        let ns_by_env = group_by_parent(
            self.namespaces.values(),
            |n| n.environment_id.as_str(),
            |n| n.position,
        );
        let deps_by_ns = group_by_parent(
            self.deployments.values(),
            |d| d.namespace_uid.as_str(),
            |d| d.position,
        );
        let cms_by_ns = group_by_parent(
            self.config_maps.values(),
            |c| c.namespace_uid.as_str(),
            |c| c.position,
        );
        let pods_by_ns = group_by_parent(
            self.pods.values(),
            |p| p.namespace_uid.as_str(),
            |p| p.position,
        );

        let build_namespace = |row: &NamespaceRow| Namespace {
            uid: row.uid.clone(),
            name: row.name.clone(),
            deployments: deps_by_ns
                .get(row.uid.as_str())
                .into_iter()
                .flatten()
                .map(|d| Deployment {
                    uid: d.uid.clone(),
                    name: d.name.clone(),
                    replicas: d.replicas,
                    raw_json: d.raw_json.clone(),
                })
                .collect(),
            config_maps: cms_by_ns
                .get(row.uid.as_str())
                .into_iter()
                .flatten()
                .map(|c| ConfigMap {
                    uid: c.uid.clone(),
                    name: c.name.clone(),
                    data: c.data.clone(),
                    raw_json: c.raw_json.clone(),
                })
                .collect(),
            pods: pods_by_ns
                .get(row.uid.as_str())
                .into_iter()
                .flatten()
                .map(|p| Pod {
                    uid: p.uid.clone(),
                    name: p.name.clone(),
                    phase: p.phase.clone(),
                    raw_json: p.raw_json.clone(),
                })
                .collect(),
        };

        self.clusters
            .keys()
            .filter(|name| wanted(name.as_str()))
            .map(|name| ClusterSnapshot {
                name: name.clone(),
                environments: envs_by_cluster
                    .get(name.as_str())
                    .into_iter()
                    .flatten()
                    .map(|env| Environment {
                        name: env.name.clone(),
                        namespaces: ns_by_env
                            .get(env.id.as_str())
                            .into_iter()
                            .flatten()
                            .map(|ns| build_namespace(*ns))
                            .collect(),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    /// Total number of rows across all tables
    pub fn row_count(&self) -> usize {
        self.clusters.len()
            + self.environments.len()
            + self.namespaces.len()
            + self.deployments.len()
            + self.config_maps.len()
            + self.pods.len()
    }
}
