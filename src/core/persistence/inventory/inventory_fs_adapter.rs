use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::persistence::storage_path::inventory_file_path;

use super::inventory_tables::InventoryTables;

/// Durable storage for the inventory tables.
pub trait InventoryFsAdapterTrait: Send + Sync {
    /// Load the committed tables; a missing file is an empty inventory.
    fn read(&self) -> Result<InventoryTables>;

    /// Replace the committed tables in one step.
    fn write(&self, tables: &InventoryTables) -> Result<()>;
}

/// FS adapter for the inventory.
///
/// All tables live in a single JSON document at `inventory/inventory.json`.
/// Writes go to a temp file which is synced and renamed over the old one,
/// so a crash never leaves a half-written inventory behind.
#[derive(Debug, Clone)]
pub struct InventoryFsAdapter {
    path: PathBuf,
}

impl InventoryFsAdapter {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: inventory_file_path(&data_dir.into()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl InventoryFsAdapterTrait for InventoryFsAdapter {
    fn read(&self) -> Result<InventoryTables> {
        if !self.path.exists() {
            debug!("No inventory file at {:?}, starting empty", self.path);
            return Ok(InventoryTables::default());
        }

        let file = File::open(&self.path).context("Failed to open inventory file")?;
        let tables = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse inventory file {:?}", self.path))?;
        Ok(tables)
    }

    fn write(&self, tables: &InventoryTables) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).context("Failed to create inventory directory")?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let file = File::create(&tmp_path).context("Failed to create temp inventory file")?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, tables).context("Failed to serialize inventory")?;
        writer.flush()?;
        writer
            .get_ref()
            .sync_all()
            .context("Failed to sync temp inventory file")?;

        fs::rename(&tmp_path, &self.path).context("Failed to finalize inventory file")?;

        #[cfg(unix)]
        if let Some(dir) = self.path.parent() {
            let dir_file = File::open(dir).context("Failed to open inventory directory")?;
            dir_file.sync_all().context("Failed to sync inventory directory")?;
        }

        debug!("Inventory written: {} row(s)", tables.row_count());
        Ok(())
    }
}
