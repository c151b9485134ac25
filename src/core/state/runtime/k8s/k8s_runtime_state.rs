use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::inventory::model::CollectedCluster;

/// In-memory result of the most recent collection walk.
///
/// This state:
/// - lives only in memory (NOT persisted)
/// - is overwritten each time every cluster was collected successfully
/// - may be ahead of the stored inventory when a store fails afterwards
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct K8sRuntimeState {
    // ===== Timestamps =====
    pub last_collected_at: Option<DateTime<Utc>>,
    pub last_error_at: Option<DateTime<Utc>>,

    // ===== Collected clusters, in provider order =====
    pub clusters: Vec<CollectedCluster>,

    // ===== Optional: last cycle error =====
    pub last_error_message: Option<String>,
}

impl K8sRuntimeState {
    /// Fully replace the collected clusters with a new walk's result.
    pub fn update(&mut self, clusters: Vec<CollectedCluster>) {
        self.clusters = clusters;

        self.last_collected_at = Some(Utc::now());
        self.last_error_at = None;
        self.last_error_message = None;
    }

    /// Mark an error without touching the collected clusters.
    pub fn mark_error(&mut self, msg: String) {
        self.last_error_message = Some(msg);
        self.last_error_at = Some(Utc::now());
    }
}
