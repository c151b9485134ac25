/// Maps kube-rs / k8s-openapi types → inventory domain models
use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::client::kube_resources::{ConfigMap, Deployment, ObjectMeta, Pod};
use crate::domain::inventory::model::{self, EMPTY_NAME};

/// Object name, or the `<empty_name>` placeholder when metadata has none.
pub fn name_or_placeholder(meta: &ObjectMeta) -> String {
    meta.name
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| EMPTY_NAME.to_string())
}

pub fn uid_of(meta: &ObjectMeta) -> String {
    meta.uid.clone().unwrap_or_default()
}

/// Serialize the full object as the API server returned it
fn raw_manifest<T: Serialize>(kind: &str, meta: &ObjectMeta, obj: &T) -> Result<String> {
    serde_json::to_string(obj).with_context(|| {
        format!(
            "failed to serialize {} '{}'",
            kind,
            meta.name.as_deref().unwrap_or(EMPTY_NAME)
        )
    })
}

/// Converts a k8s-openapi Deployment into the inventory model
pub fn map_deployment(deployment: &Deployment) -> Result<model::Deployment> {
    let metadata = &deployment.metadata;
    Ok(model::Deployment {
        uid: uid_of(metadata),
        name: name_or_placeholder(metadata),
        replicas: deployment.spec.as_ref().and_then(|s| s.replicas),
        raw_json: raw_manifest("deployment", metadata, deployment)?,
    })
}

/// Converts a k8s-openapi ConfigMap into the inventory model
pub fn map_config_map(config_map: &ConfigMap) -> Result<model::ConfigMap> {
    let metadata = &config_map.metadata;
    Ok(model::ConfigMap {
        uid: uid_of(metadata),
        name: name_or_placeholder(metadata),
        data: config_map.data.clone().unwrap_or_default(),
        raw_json: raw_manifest("config map", metadata, config_map)?,
    })
}

/// Converts a k8s-openapi Pod into the inventory model
pub fn map_pod(pod: &Pod) -> Result<model::Pod> {
    let metadata = &pod.metadata;
    Ok(model::Pod {
        uid: uid_of(metadata),
        name: name_or_placeholder(metadata),
        phase: pod.status.as_ref().and_then(|s| s.phase.clone()),
        raw_json: raw_manifest("pod", metadata, pod)?,
    })
}
