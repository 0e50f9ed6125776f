//! Multi-level BOM explosion with availability and shortfall computation.
//!
//! The engine itself is a pure function over the two snapshot tables; the
//! service wrapper binds it to the snapshot store and event channel.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use utoipa::ToSchema;

use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::{normalize_item_id, BomEdge, ItemRecord},
    snapshots::SnapshotStore,
};

/// One row of the flattened explosion result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExplosionLine {
    pub component_item_id: String,
    pub description: String,
    /// 0 = direct child of the root build item, increasing with depth.
    pub level: u32,
    /// Quantity required per one unit of the root build item (edge quantity
    /// multiplied through all ancestor edges).
    pub per_unit_quantity: Decimal,
    /// `per_unit_quantity * build_quantity`.
    pub total_required_quantity: Decimal,
    pub available_quantity: Decimal,
    /// `max(0, total_required_quantity - available_quantity)`.
    pub shortfall_quantity: Decimal,
    pub unit_cost: Decimal,
    pub unit_of_measure: String,
    /// True if this component has outgoing BOM edges of its own.
    pub is_assembled: bool,
}

/// A BOM edge pointing at a component with no row in the item table. The
/// edge contributes no explosion line; the miss is reported instead of being
/// dropped silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MissingComponentWarning {
    pub component_item_id: String,
    pub parent_item_id: String,
    pub level: u32,
}

/// Full result of one explosion run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExplosionReport {
    pub root_item_id: String,
    pub build_quantity: i64,
    pub lines: Vec<ExplosionLine>,
    pub missing_components: Vec<MissingComponentWarning>,
}

/// A shortfall line projected into the shape the purchase-requisition flow
/// consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RequisitionCandidate {
    pub item_id: String,
    pub description: String,
    pub quantity_needed: Decimal,
    pub unit_of_measure: String,
    pub unit_cost: Decimal,
    pub current_stock: Decimal,
}

/// Explodes `root_item_id` into its full multi-level component requirement
/// list for `build_quantity` units.
///
/// Traversal is pre-order: a parent's direct children appear before their
/// grandchildren. Output is deduplicated on `(component, level)` with the
/// first-encountered occurrence winning; demand reaching the same component
/// at the same depth via a second path is not summed. A root with no
/// outgoing edges yields an empty line list.
pub fn explode(
    root_item_id: &str,
    build_quantity: i64,
    bom_edges: &[BomEdge],
    items: &[ItemRecord],
) -> Result<ExplosionReport, ServiceError> {
    if build_quantity <= 0 {
        return Err(ServiceError::ValidationError(format!(
            "build quantity must be a positive integer, got {}",
            build_quantity
        )));
    }
    let root_key = normalize_item_id(root_item_id);
    if root_key.is_empty() {
        return Err(ServiceError::ValidationError(
            "root item id must not be blank".to_string(),
        ));
    }

    let mut edges_by_parent: HashMap<String, Vec<&BomEdge>> = HashMap::new();
    for edge in bom_edges {
        edges_by_parent
            .entry(normalize_item_id(&edge.parent_item_id))
            .or_default()
            .push(edge);
    }
    // First row wins on duplicate ids, matching the snapshot store's policy.
    let mut items_by_id: HashMap<String, &ItemRecord> = HashMap::new();
    for item in items {
        items_by_id
            .entry(normalize_item_id(&item.item_id))
            .or_insert(item);
    }

    let mut walker = Walker {
        edges_by_parent: &edges_by_parent,
        items_by_id: &items_by_id,
        build_quantity: Decimal::from(build_quantity),
        lines: Vec::new(),
        emitted: HashSet::new(),
        missing: Vec::new(),
    };
    let mut path = vec![root_key.clone()];
    walker.walk(&root_key, Decimal::ONE, 0, &mut path)?;

    Ok(ExplosionReport {
        root_item_id: root_key,
        build_quantity,
        lines: walker.lines,
        missing_components: walker.missing,
    })
}

/// Projects the positive-shortfall lines of an explosion into requisition
/// candidates. Empty output means nothing is short.
pub fn shortfall_items(lines: &[ExplosionLine]) -> Vec<RequisitionCandidate> {
    lines
        .iter()
        .filter(|line| line.shortfall_quantity > Decimal::ZERO)
        .map(|line| RequisitionCandidate {
            item_id: line.component_item_id.clone(),
            description: line.description.clone(),
            quantity_needed: line.shortfall_quantity,
            unit_of_measure: line.unit_of_measure.clone(),
            unit_cost: line.unit_cost,
            current_stock: line.available_quantity,
        })
        .collect()
}

struct Walker<'a> {
    edges_by_parent: &'a HashMap<String, Vec<&'a BomEdge>>,
    items_by_id: &'a HashMap<String, &'a ItemRecord>,
    build_quantity: Decimal,
    lines: Vec<ExplosionLine>,
    emitted: HashSet<(String, u32)>,
    missing: Vec<MissingComponentWarning>,
}

impl Walker<'_> {
    fn walk(
        &mut self,
        parent_key: &str,
        multiplier: Decimal,
        level: u32,
        path: &mut Vec<String>,
    ) -> Result<(), ServiceError> {
        let Some(edges) = self.edges_by_parent.get(parent_key) else {
            return Ok(());
        };

        for edge in edges {
            let component_key = normalize_item_id(&edge.component_item_id);
            let per_unit = edge.quantity_per_parent * multiplier;

            let Some(item) = self.items_by_id.get(&component_key) else {
                self.missing.push(MissingComponentWarning {
                    component_item_id: component_key,
                    parent_item_id: parent_key.to_string(),
                    level,
                });
                continue;
            };

            if path.iter().any(|ancestor| ancestor == &component_key) {
                return Err(ServiceError::CircularReference(format!(
                    "{} -> {}",
                    path.join(" -> "),
                    component_key
                )));
            }

            // First occurrence at this (component, level) wins.
            if !self.emitted.insert((component_key.clone(), level)) {
                continue;
            }

            let is_assembled = self.edges_by_parent.contains_key(&component_key);
            let total_required = per_unit * self.build_quantity;
            let shortfall = (total_required - item.on_hand_quantity).max(Decimal::ZERO);

            self.lines.push(ExplosionLine {
                component_item_id: component_key.clone(),
                description: item.description.clone(),
                level,
                per_unit_quantity: per_unit,
                total_required_quantity: total_required,
                available_quantity: item.on_hand_quantity,
                shortfall_quantity: shortfall,
                unit_cost: item.unit_cost,
                unit_of_measure: item.unit_of_measure.clone(),
                is_assembled,
            });

            if is_assembled {
                path.push(component_key.clone());
                self.walk(&component_key, per_unit, level + 1, path)?;
                path.pop();
            }
        }

        Ok(())
    }
}

/// Binds the pure engine to the snapshot store and event channel.
#[derive(Clone)]
pub struct ExplosionService {
    snapshots: Arc<SnapshotStore>,
    event_sender: Arc<EventSender>,
}

impl ExplosionService {
    pub fn new(snapshots: Arc<SnapshotStore>, event_sender: Arc<EventSender>) -> Self {
        Self {
            snapshots,
            event_sender,
        }
    }

    /// Runs an explosion against the current snapshot pair.
    #[instrument(skip(self))]
    pub async fn explode(
        &self,
        root_item_id: &str,
        build_quantity: i64,
    ) -> Result<ExplosionReport, ServiceError> {
        let tables = self.snapshots.tables().await;
        let report = explode(root_item_id, build_quantity, &tables.bom_edges, &tables.items)?;

        if !report.missing_components.is_empty() {
            warn!(
                root_item_id = %report.root_item_id,
                missing = report.missing_components.len(),
                "BOM edges reference components absent from the item snapshot"
            );
        }

        self.event_sender
            .send_or_log(Event::ExplosionComputed {
                root_item_id: report.root_item_id.clone(),
                build_quantity,
                line_count: report.lines.len(),
            })
            .await;

        Ok(report)
    }

    /// Explodes and projects the short lines into requisition candidates.
    #[instrument(skip(self))]
    pub async fn shortfall(
        &self,
        root_item_id: &str,
        build_quantity: i64,
    ) -> Result<(ExplosionReport, Vec<RequisitionCandidate>), ServiceError> {
        let report = self.explode(root_item_id, build_quantity).await?;
        let candidates = shortfall_items(&report.lines);

        if !candidates.is_empty() {
            self.event_sender
                .send_or_log(Event::ShortageDetected {
                    root_item_id: report.root_item_id.clone(),
                    short_item_count: candidates.len(),
                })
                .await;
        }

        Ok((report, candidates))
    }
}
