use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::core::client::access_provider::{ClusterAccess, ClusterAccessProvider};
use crate::core::client::cluster_api::{ClusterApi, ClusterConnector};
use crate::core::client::kube_resources::Namespace as K8sNamespace;
use crate::core::client::mappers::{
    map_config_map, map_deployment, map_pod, name_or_placeholder, uid_of,
};
use crate::domain::inventory::environment_aggregator::derive_environment_name;
use crate::domain::inventory::model::{
    CollectedCluster, CollectedNamespace, ConfigMap, Deployment, Namespace, Pod,
};
use crate::errors::{access_config_error, InventoryError, InventoryResult};

/// Walk one cluster: namespaces first, then deployments, config maps and
/// pods of each namespace, strictly in API order.
///
/// Any failed listing fails the whole cluster; nothing partial is returned.
pub async fn collect_cluster(
    cluster_name: &str,
    api: &dyn ClusterApi,
) -> Result<CollectedCluster> {
    let namespaces = api
        .list_namespaces()
        .await
        .context("failed to list namespaces")?;

    let mut collected = Vec::with_capacity(namespaces.len());
    for ns in namespaces {
        collected.push(collect_namespace(api, ns).await?);
    }

    info!(
        "Collected cluster '{}': {} namespace(s)",
        cluster_name,
        collected.len()
    );

    Ok(CollectedCluster {
        name: cluster_name.to_string(),
        namespaces: collected,
    })
}

async fn collect_namespace(api: &dyn ClusterApi, ns: K8sNamespace) -> Result<CollectedNamespace> {
    let metadata = &ns.metadata;
    let display_name = name_or_placeholder(metadata);

    // Namespaced listings address the namespace by name; without one there is
    // no path to query, so the namespace is kept with no resources.
    let (deployments, config_maps, pods) = match metadata.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => list_namespace_resources(api, name).await?,
        None => {
            warn!("Namespace uid '{}' has no name, skipping its resources", uid_of(metadata));
            (Vec::new(), Vec::new(), Vec::new())
        }
    };

    debug!(
        "Namespace '{}': {} deployment(s), {} config map(s), {} pod(s)",
        display_name,
        deployments.len(),
        config_maps.len(),
        pods.len()
    );

    Ok(CollectedNamespace {
        environment_name: derive_environment_name(&display_name, metadata.labels.as_ref()),
        namespace: Namespace {
            uid: uid_of(metadata),
            name: display_name,
            deployments,
            config_maps,
            pods,
        },
    })
}

async fn list_namespace_resources(
    api: &dyn ClusterApi,
    namespace: &str,
) -> Result<(Vec<Deployment>, Vec<ConfigMap>, Vec<Pod>)> {
    let deployments = api
        .list_deployments(namespace)
        .await
        .with_context(|| format!("failed to list deployments in namespace '{}'", namespace))?
        .iter()
        .map(map_deployment)
        .collect::<Result<Vec<_>>>()?;

    let config_maps = api
        .list_config_maps(namespace)
        .await
        .with_context(|| format!("failed to list config maps in namespace '{}'", namespace))?
        .iter()
        .map(map_config_map)
        .collect::<Result<Vec<_>>>()?;

    let pods = api
        .list_pods(namespace)
        .await
        .with_context(|| format!("failed to list pods in namespace '{}'", namespace))?
        .iter()
        .map(map_pod)
        .collect::<Result<Vec<_>>>()?;

    Ok((deployments, config_maps, pods))
}

/// Connect to and collect one cluster, mapping failures onto the error taxonomy.
pub async fn collect_from_access(
    access: &ClusterAccess,
    connector: &dyn ClusterConnector,
) -> InventoryResult<CollectedCluster> {
    let api = connector
        .connect(access)
        .await
        .map_err(access_config_error)?;

    collect_cluster(&access.declared_name, api.as_ref())
        .await
        .map_err(|e| InventoryError::collection(access.declared_name.clone(), e))
}

/// Collect every configured cluster, one after the other.
///
/// The first failure aborts the walk; clusters collected before it are
/// discarded by the caller.
pub async fn collect_all(
    provider: &dyn ClusterAccessProvider,
    connector: &dyn ClusterConnector,
) -> InventoryResult<Vec<CollectedCluster>> {
    let configurations = provider
        .list_configurations()
        .await
        .map_err(access_config_error)?;

    let mut clusters = Vec::with_capacity(configurations.len());
    for access in &configurations {
        clusters.push(collect_from_access(access, connector).await?);
    }
    Ok(clusters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::fake_cluster::{
        fake_access, FakeCluster, FakeConnector, ResourceKind, StaticAccessProvider,
    };
    use crate::domain::inventory::model::EMPTY_NAME;

    fn two_namespace_cluster() -> FakeCluster {
        FakeCluster::new()
            .namespace("ns-a", "ns-uid-a", &[("environmentName", "prod")])
            .namespace("ns-b", "ns-uid-b", &[])
            .deployment("ns-a", "api", "dep-1", 2)
            .config_map("ns-a", "settings", "cm-1", &[("mode", "fast")])
            .pod("ns-a", "api-xyz", "pod-1", "Running")
            .pod("ns-b", "worker-abc", "pod-2", "Pending")
    }

    #[tokio::test]
    async fn collects_resources_per_namespace() {
        let cluster = two_namespace_cluster();
        let collected = collect_cluster("c1", &cluster).await.unwrap();

        assert_eq!(collected.name, "c1");
        assert_eq!(collected.namespaces.len(), 2);

        let a = &collected.namespaces[0];
        assert_eq!(a.environment_name, "prod");
        assert_eq!(a.namespace.uid, "ns-uid-a");
        assert_eq!(a.namespace.deployments[0].replicas, Some(2));
        assert_eq!(a.namespace.config_maps[0].data["mode"], "fast");
        assert_eq!(a.namespace.pods[0].phase.as_deref(), Some("Running"));

        let b = &collected.namespaces[1];
        assert_eq!(b.environment_name, "ns-b");
        assert!(b.namespace.deployments.is_empty());
        assert_eq!(b.namespace.pods[0].name, "worker-abc");
    }

    #[tokio::test]
    async fn walks_kinds_in_order_per_namespace() {
        let cluster = two_namespace_cluster();
        collect_cluster("c1", &cluster).await.unwrap();

        assert_eq!(
            cluster.calls(),
            vec![
                "Namespaces",
                "Deployments:ns-a",
                "ConfigMaps:ns-a",
                "Pods:ns-a",
                "Deployments:ns-b",
                "ConfigMaps:ns-b",
                "Pods:ns-b",
            ]
        );
    }

    #[tokio::test]
    async fn snapshot_groups_by_environment() {
        let cluster = two_namespace_cluster()
            .namespace("ns-c", "ns-uid-c", &[("environmentName", "prod")]);
        let snapshot = collect_cluster("c1", &cluster).await.unwrap().into_snapshot();

        let envs: Vec<(&str, Vec<&str>)> = snapshot
            .environments
            .iter()
            .map(|e| (e.name.as_str(), e.namespaces.iter().map(|n| n.name.as_str()).collect()))
            .collect();
        assert_eq!(envs, vec![("prod", vec!["ns-a", "ns-c"]), ("ns-b", vec!["ns-b"])]);
    }

    #[tokio::test]
    async fn unnamed_namespace_gets_placeholder() {
        let cluster = FakeCluster::new().unnamed_namespace("ns-uid-x");
        let collected = collect_cluster("c1", &cluster).await.unwrap();

        let ns = &collected.namespaces[0];
        assert_eq!(ns.namespace.name, EMPTY_NAME);
        assert_eq!(ns.environment_name, EMPTY_NAME);
        assert!(ns.namespace.pods.is_empty());
        // no namespaced listing is issued without a name to address
        assert_eq!(cluster.calls(), vec!["Namespaces"]);
    }

    #[tokio::test]
    async fn failed_pod_listing_fails_whole_cluster() {
        let cluster = FakeCluster::new()
            .namespace("ns-1", "u1", &[])
            .namespace("ns-2", "u2", &[])
            .namespace("ns-3", "u3", &[])
            .namespace("ns-4", "u4", &[])
            .namespace("ns-5", "u5", &[])
            .fail_on(ResourceKind::Pods, Some("ns-3"));

        let err = collect_cluster("c1", &cluster).await.unwrap_err();
        assert!(format!("{err:#}").contains("failed to list pods in namespace 'ns-3'"));
        // nothing after the failing namespace is touched
        assert!(!cluster.calls().iter().any(|c| c.ends_with("ns-4")));
    }

    #[tokio::test]
    async fn failed_namespace_listing_is_collection_error() {
        let connector = FakeConnector::new();
        connector.insert("c1", FakeCluster::new().fail_on(ResourceKind::Namespaces, None));

        let err = collect_from_access(&fake_access("c1"), &connector)
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::Collection { ref cluster, .. } if cluster == "c1"));
    }

    #[tokio::test]
    async fn connection_failure_is_access_config_error() {
        let connector = FakeConnector::new();
        let err = collect_from_access(&fake_access("unknown"), &connector)
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::AccessConfig(_)));
    }

    #[tokio::test]
    async fn collect_all_keeps_provider_order_and_stops_at_first_failure() {
        let connector = FakeConnector::new();
        connector.insert("c1", FakeCluster::new().namespace("a", "u-a", &[]));
        let second = connector.insert("c2", FakeCluster::new().namespace("b", "u-b", &[]));
        connector.insert("c3", FakeCluster::new().fail_on(ResourceKind::Namespaces, None));

        let ok = collect_all(&StaticAccessProvider::new(&["c2", "c1"]), &connector)
            .await
            .unwrap();
        let names: Vec<_> = ok.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["c2", "c1"]);

        let before = second.calls().len();
        let err = collect_all(&StaticAccessProvider::new(&["c3", "c2"]), &connector)
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::Collection { .. }));
        assert_eq!(second.calls().len(), before);
    }

    #[tokio::test]
    async fn provider_failure_is_access_config_error() {
        let connector = FakeConnector::new();
        let err = collect_all(&StaticAccessProvider::failing("no kubeconfigs"), &connector)
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::AccessConfig(m) if m.contains("no kubeconfigs")));
    }
}
