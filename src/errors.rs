use thiserror::Error;

/// Failures of a refresh cycle.
///
/// None of these are retried locally: each one aborts the current cycle and
/// the next trigger starts again from scratch.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Access config error: {0}")]
    AccessConfig(String),

    #[error("Collection error in cluster '{cluster}': {source:#}")]
    Collection {
        cluster: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl InventoryError {
    pub fn collection(cluster: impl Into<String>, source: anyhow::Error) -> Self {
        InventoryError::Collection {
            cluster: cluster.into(),
            source,
        }
    }
}

/// Helper for mapping any storage failure into a persistence error
pub fn persistence_error<E: std::fmt::Display>(err: E) -> InventoryError {
    InventoryError::Persistence(format!("{err:#}"))
}

/// Helper for mapping credential / kubeconfig failures
pub fn access_config_error<E: std::fmt::Display>(err: E) -> InventoryError {
    InventoryError::AccessConfig(format!("{err:#}"))
}

pub type InventoryResult<T> = std::result::Result<T, InventoryError>;
