use std::sync::Arc;
use anyhow::Context;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::inventory_fs_adapter::InventoryFsAdapterTrait;
use super::inventory_repository_trait::InventoryRepositoryTrait;
use super::inventory_tables::InventoryTables;

pub struct InventoryRepository {
    tables: RwLock<Arc<InventoryTables>>,
    /// Serializes transactions; readers never take it
    writer: Mutex<()>,
    adapter: Arc<dyn InventoryFsAdapterTrait>,
}

impl InventoryRepository {
    /// Load the committed inventory through `adapter`.
    pub fn open<A: InventoryFsAdapterTrait + 'static>(adapter: A) -> anyhow::Result<Self> {
        let tables = adapter.read().context("Failed to load stored inventory")?;
        debug!("Loaded inventory with {} cluster(s)", tables.clusters.len());

        Ok(Self {
            tables: RwLock::new(Arc::new(tables)),
            writer: Mutex::new(()),
            adapter: Arc::new(adapter),
        })
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait::async_trait]
impl InventoryRepositoryTrait for InventoryRepository {
    async fn get(&self) -> Arc<InventoryTables> {
        Arc::clone(&*self.tables.read().await)
    }

    async fn transaction<T, F>(&self, f: F) -> anyhow::Result<T>
    where
        F: FnOnce(&mut InventoryTables) -> anyhow::Result<T> + Send,
        T: Send,
    {
        let _writer = self.writer.lock().await;

        let mut working = InventoryTables::clone(&*self.tables.read().await);

        // an error from `f` drops the working copy untouched
        let out = f(&mut working)?;

        // serializing every raw manifest and syncing is blocking work
        let adapter = Arc::clone(&self.adapter);
        let working = tokio::task::spawn_blocking(move || adapter.write(&working).map(|()| working))
            .await
            .context("Inventory write task failed")?
            .context("Failed to commit inventory")?;

        *self.tables.write().await = Arc::new(working);
        Ok(out)
    }
}
