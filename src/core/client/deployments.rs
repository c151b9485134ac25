use anyhow::Result;
use kube::{Api, Client};
use kube::api::ListParams;
use tracing::debug;

use crate::core::client::kube_resources::Deployment;

/// Fetch deployments in a specific namespace
pub async fn fetch_deployments_by_namespace(
    client: &Client,
    namespace: &str,
) -> Result<Vec<Deployment>> {
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let deployment_list = deployments.list(&ListParams::default()).await?;

    debug!(
        "Loaded {} deployment(s) for namespace '{}'",
        deployment_list.items.len(),
        namespace
    );
    Ok(deployment_list.items)
}
