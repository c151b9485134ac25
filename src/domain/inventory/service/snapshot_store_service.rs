use std::slice;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::core::persistence::inventory::inventory_repository_trait::InventoryRepositoryTrait;
use crate::core::persistence::inventory::inventory_tables::InventoryTables;
use crate::domain::inventory::model::ClusterSnapshot;
use crate::errors::{persistence_error, InventoryResult};

/// Full-replace persistence of cluster snapshots.
pub struct SnapshotStore<R: InventoryRepositoryTrait> {
    repo: Arc<R>,
}

/// Drop whatever is stored under the snapshot's cluster name, then insert
/// the new tree.
fn replace_cluster(
    tables: &mut InventoryTables,
    snapshot: &ClusterSnapshot,
    stored_at: DateTime<Utc>,
) -> Result<()> {
    if tables.find_cluster(&snapshot.name).is_some() {
        info!("before delete namespace count = {}", tables.namespace_count());
        tables.delete_cluster(&snapshot.name);
        info!("after delete namespace count = {}", tables.namespace_count());
    } else {
        debug!("new cluster = {}", snapshot.name);
    }

    info!("cluster is ready to persist {}", snapshot.name);
    tables.insert_cluster(snapshot, stored_at)
}

impl<R: InventoryRepositoryTrait> SnapshotStore<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Replace one cluster's stored inventory.
    pub async fn store_snapshot(&self, snapshot: &ClusterSnapshot) -> InventoryResult<()> {
        self.store_snapshots(slice::from_ref(snapshot)).await
    }

    /// Replace several clusters in one transaction: either every snapshot
    /// is stored or none is.
    pub async fn store_snapshots(&self, snapshots: &[ClusterSnapshot]) -> InventoryResult<()> {
        let stored_at = Utc::now();
        self.repo
            .transaction(|tables| {
                for snapshot in snapshots {
                    replace_cluster(tables, snapshot, stored_at)?;
                }
                Ok(())
            })
            .await
            .map_err(persistence_error)
    }

    pub async fn list_snapshots(&self) -> Vec<ClusterSnapshot> {
        self.repo.get().await.snapshots()
    }

    pub async fn find_snapshot(&self, name: &str) -> Option<ClusterSnapshot> {
        self.repo.get().await.snapshot(name)
    }

    pub async fn namespace_count(&self) -> usize {
        self.repo.get().await.namespace_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::inventory::inventory_fs_adapter::InventoryFsAdapter;
    use crate::core::persistence::inventory::inventory_repository::InventoryRepository;
    use crate::domain::inventory::model::{Environment, Namespace, Pod};
    use crate::errors::InventoryError;

    fn namespace(uid: &str, name: &str, pods: &[&str]) -> Namespace {
        Namespace {
            uid: uid.to_string(),
            name: name.to_string(),
            deployments: vec![],
            config_maps: vec![],
            pods: pods
                .iter()
                .map(|p| Pod {
                    uid: format!("pod-{p}"),
                    name: p.to_string(),
                    phase: Some("Running".to_string()),
                    raw_json: "{}".to_string(),
                })
                .collect(),
        }
    }

    fn store(dir: &tempfile::TempDir) -> SnapshotStore<InventoryRepository> {
        let repo = InventoryRepository::open(InventoryFsAdapter::new(dir.path())).unwrap();
        SnapshotStore::new(repo.shared())
    }

    #[tokio::test]
    async fn second_store_fully_replaces_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let first = ClusterSnapshot {
            name: "c1".to_string(),
            environments: vec![
                Environment {
                    name: "prod".to_string(),
                    namespaces: vec![namespace("u-a", "ns-a", &["a1", "a2"])],
                },
                Environment {
                    name: "ns-b".to_string(),
                    namespaces: vec![namespace("u-b", "ns-b", &["b1"])],
                },
            ],
        };
        let second = ClusterSnapshot {
            name: "c1".to_string(),
            environments: vec![Environment {
                name: "staging".to_string(),
                namespaces: vec![namespace("u-s", "ns-s", &["s1"])],
            }],
        };

        store.store_snapshot(&first).await.unwrap();
        store.store_snapshot(&second).await.unwrap();

        assert_eq!(store.list_snapshots().await, vec![second]);
        assert_eq!(store.namespace_count().await, 1);
        let tables = store.repo.get().await;
        assert!(!tables.pods.contains_key("pod-a1"));
        assert!(!tables.pods.contains_key("pod-b1"));
    }

    #[tokio::test]
    async fn other_clusters_are_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let c2 = ClusterSnapshot {
            name: "c2".to_string(),
            environments: vec![Environment {
                name: "dev".to_string(),
                namespaces: vec![namespace("u-d", "ns-d", &["d1"])],
            }],
        };
        store.store_snapshot(&c2).await.unwrap();
        store
            .store_snapshot(&ClusterSnapshot {
                name: "c1".to_string(),
                environments: vec![],
            })
            .await
            .unwrap();

        assert_eq!(store.find_snapshot("c2").await, Some(c2));
        assert_eq!(store.list_snapshots().await.len(), 2);
    }

    #[tokio::test]
    async fn failure_in_batch_rolls_back_earlier_replacements() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let old = ClusterSnapshot {
            name: "c1".to_string(),
            environments: vec![Environment {
                name: "prod".to_string(),
                namespaces: vec![namespace("u-old", "ns-old", &[])],
            }],
        };
        store.store_snapshot(&old).await.unwrap();

        let new_c1 = ClusterSnapshot {
            name: "c1".to_string(),
            environments: vec![Environment {
                name: "prod".to_string(),
                namespaces: vec![namespace("u-shared", "ns-new", &[])],
            }],
        };
        // same namespace uid as c1's new tree: primary-key clash
        let clashing_c2 = ClusterSnapshot {
            name: "c2".to_string(),
            environments: vec![Environment {
                name: "dev".to_string(),
                namespaces: vec![namespace("u-shared", "ns-dup", &[])],
            }],
        };

        let err = store
            .store_snapshots(&[new_c1, clashing_c2])
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::Persistence(_)));

        assert_eq!(store.list_snapshots().await, vec![old]);
    }
}
