use anyhow::Result;
use kube::{Api, Client};
use kube::api::ListParams;
use tracing::debug;

use crate::core::client::kube_resources::ConfigMap;

/// Fetch config maps in a specific namespace
pub async fn fetch_config_maps_by_namespace(
    client: &Client,
    namespace: &str,
) -> Result<Vec<ConfigMap>> {
    let config_maps: Api<ConfigMap> = Api::namespaced(client.clone(), namespace);
    let config_map_list = config_maps.list(&ListParams::default()).await?;

    debug!(
        "Loaded {} config map(s) for namespace '{}'",
        config_map_list.items.len(),
        namespace
    );
    Ok(config_map_list.items)
}
