use anyhow::{Context, Result};
use kube::config::KubeConfigOptions;
use kube::{Client, Config};
use tracing::debug;

use crate::core::client::access_provider::ClusterAccess;

/// Creates a Kubernetes client bound to one cluster's kubeconfig.
///
/// Every collection call receives its client explicitly; there is no
/// process-wide default client.
pub async fn build_kube_client(access: &ClusterAccess) -> Result<Client> {
    let config = Config::from_custom_kubeconfig(
        access.kubeconfig.clone(),
        &KubeConfigOptions::default(),
    )
    .await
    .with_context(|| format!("Can't load kubeconfig for cluster '{}'", access.declared_name))?;

    let client = Client::try_from(config)
        .with_context(|| format!("Can't build client for cluster '{}'", access.declared_name))?;

    debug!(
        "Kubernetes client initialized for cluster '{}' ({})",
        access.declared_name,
        access.server_address.as_deref().unwrap_or("unknown server")
    );
    Ok(client)
}
