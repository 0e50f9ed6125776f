use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::models::{normalize_item_id, BomEdge, ItemRecord};

/// One consistent pair of ERP table snapshots. Immutable once loaded; the
/// store swaps whole tables on reload so in-flight requests keep the pair
/// they started with.
#[derive(Debug)]
pub struct SnapshotTables {
    pub bom_edges: Vec<BomEdge>,
    pub items: Vec<ItemRecord>,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SnapshotSummary {
    pub bom_edges: usize,
    pub items: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Holds the current snapshot pair and knows how to re-read it from disk.
#[derive(Debug)]
pub struct SnapshotStore {
    bom_path: PathBuf,
    item_path: PathBuf,
    current: RwLock<Arc<SnapshotTables>>,
}

impl SnapshotStore {
    /// Reads both snapshot files. Fails fast on a missing or malformed file.
    pub fn load(
        bom_path: impl Into<PathBuf>,
        item_path: impl Into<PathBuf>,
    ) -> Result<Self, ServiceError> {
        let bom_path = bom_path.into();
        let item_path = item_path.into();
        let tables = read_tables(&bom_path, &item_path)?;
        info!(
            bom_edges = tables.bom_edges.len(),
            items = tables.items.len(),
            "ERP snapshots loaded"
        );
        Ok(Self {
            bom_path,
            item_path,
            current: RwLock::new(Arc::new(tables)),
        })
    }

    /// Builds a store directly from tables. Reloading a store built this way
    /// fails since there are no backing files; intended for tests.
    pub fn from_tables(bom_edges: Vec<BomEdge>, items: Vec<ItemRecord>) -> Self {
        check_item_uniqueness(&items);
        Self {
            bom_path: PathBuf::new(),
            item_path: PathBuf::new(),
            current: RwLock::new(Arc::new(SnapshotTables {
                bom_edges,
                items,
                loaded_at: Utc::now(),
            })),
        }
    }

    /// Cheap handle to the current snapshot pair.
    pub async fn tables(&self) -> Arc<SnapshotTables> {
        self.current.read().await.clone()
    }

    /// Re-reads both files and swaps the tables atomically. A failed reload
    /// leaves the previous tables in place.
    pub async fn reload(&self) -> Result<SnapshotSummary, ServiceError> {
        let tables = read_tables(&self.bom_path, &self.item_path)?;
        let summary = SnapshotSummary {
            bom_edges: tables.bom_edges.len(),
            items: tables.items.len(),
            loaded_at: tables.loaded_at,
        };
        *self.current.write().await = Arc::new(tables);
        Ok(summary)
    }

    pub async fn summary(&self) -> SnapshotSummary {
        let tables = self.current.read().await;
        SnapshotSummary {
            bom_edges: tables.bom_edges.len(),
            items: tables.items.len(),
            loaded_at: tables.loaded_at,
        }
    }
}

fn read_tables(bom_path: &Path, item_path: &Path) -> Result<SnapshotTables, ServiceError> {
    let bom_edges: Vec<BomEdge> = read_json_table(bom_path, "BOM detail")?;
    let items: Vec<ItemRecord> = read_json_table(item_path, "item")?;
    check_item_uniqueness(&items);
    Ok(SnapshotTables {
        bom_edges,
        items,
        loaded_at: Utc::now(),
    })
}

fn read_json_table<T: serde::de::DeserializeOwned>(
    path: &Path,
    table_name: &str,
) -> Result<Vec<T>, ServiceError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        ServiceError::SnapshotError(format!(
            "cannot read {} snapshot {}: {}",
            table_name,
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        ServiceError::SnapshotError(format!(
            "cannot parse {} snapshot {}: {}",
            table_name,
            path.display(),
            e
        ))
    })
}

/// The upstream table is supposed to be unique on item id; the export
/// occasionally is not. Lookups keep the first row, so duplicates are only
/// worth a warning.
fn check_item_uniqueness(items: &[ItemRecord]) {
    let mut seen = HashSet::new();
    for item in items {
        let key = normalize_item_id(&item.item_id);
        if !seen.insert(key.clone()) {
            warn!(item_id = %key, "duplicate item id in item snapshot; first row wins");
        }
    }
}
