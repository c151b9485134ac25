use std::sync::Arc;

use anyhow::Result;

use crate::config::AppConfig;
use crate::core::client::access_provider::KubeconfigDirProvider;
use crate::core::client::cluster_api::KubeClusterConnector;
use crate::core::persistence::inventory::inventory_fs_adapter::InventoryFsAdapter;
use crate::core::persistence::inventory::inventory_repository::InventoryRepository;
use crate::domain::inventory::service::inventory_service::InventoryService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub inventory_service: Arc<InventoryService>,
}

/// Wire the kubeconfig provider, kube connector and on-disk inventory.
pub fn build_app_state(config: AppConfig) -> Result<AppState> {
    let repository = InventoryRepository::open(InventoryFsAdapter::new(&config.data_dir))?;

    let inventory_service = InventoryService::new(
        Arc::new(KubeconfigDirProvider::new(config.kubeconfig_dir.clone())),
        Arc::new(KubeClusterConnector),
        repository.shared(),
    );

    Ok(AppState {
        config: Arc::new(config),
        inventory_service: Arc::new(inventory_service),
    })
}
