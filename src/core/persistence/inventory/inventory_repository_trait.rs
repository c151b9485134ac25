use std::sync::Arc;
use async_trait::async_trait;

use super::inventory_tables::InventoryTables;

#[async_trait]
pub trait InventoryRepositoryTrait: Send + Sync {

    /// Return the last committed tables as an Arc.
    async fn get(&self) -> Arc<InventoryTables>;

    /// Run `f` against a working copy of the tables and commit it.
    ///
    /// If `f` or the durable write fails, the working copy is dropped and the
    /// committed tables stay exactly as they were.
    async fn transaction<T, F>(&self, f: F) -> anyhow::Result<T>
    where
        F: FnOnce(&mut InventoryTables) -> anyhow::Result<T> + Send,
        T: Send;
}
