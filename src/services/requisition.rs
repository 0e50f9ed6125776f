use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
};

/// One item on a draft purchase requisition.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequisitionLine {
    pub item_id: String,
    pub description: String,
    pub quantity_needed: Decimal,
    pub unit_of_measure: String,
    pub unit_cost: Decimal,
}

/// A draft purchase requisition. Advisory only: nothing here commits stock
/// or money, it hands a pre-filled request to the purchasing flow.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Requisition {
    pub id: Uuid,
    pub requisition_number: String,
    pub lines: Vec<RequisitionLine>,
    pub estimated_cost: Decimal,
    pub source_root_item_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input payload for drafting a requisition.
#[derive(Debug, Clone)]
pub struct CreateRequisitionInput {
    pub lines: Vec<RequisitionLine>,
    pub source_root_item_id: Option<String>,
    pub notes: Option<String>,
}

/// In-memory requisition drafts, keyed by id. Drafts live for the process
/// lifetime only.
#[derive(Clone)]
pub struct RequisitionService {
    drafts: Arc<DashMap<Uuid, Requisition>>,
    event_sender: Arc<EventSender>,
}

impl RequisitionService {
    pub fn new(event_sender: Arc<EventSender>) -> Self {
        Self {
            drafts: Arc::new(DashMap::new()),
            event_sender,
        }
    }

    /// Drafts a requisition from the given lines and returns its identifier.
    #[instrument(skip(self, input))]
    pub async fn create_requisition(
        &self,
        input: CreateRequisitionInput,
    ) -> Result<Uuid, ServiceError> {
        if input.lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "a requisition needs at least one line".to_string(),
            ));
        }
        for line in &input.lines {
            if line.quantity_needed <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(format!(
                    "quantity for {} must be positive",
                    line.item_id
                )));
            }
        }

        let id = Uuid::new_v4();
        let estimated_cost: Decimal = input
            .lines
            .iter()
            .map(|line| line.quantity_needed * line.unit_cost)
            .sum();

        let requisition = Requisition {
            id,
            requisition_number: format!("REQ-{}", id.simple()),
            lines: input.lines,
            estimated_cost,
            source_root_item_id: input.source_root_item_id,
            notes: input.notes,
            created_at: Utc::now(),
        };
        let line_count = requisition.lines.len();
        self.drafts.insert(id, requisition);

        info!(%id, line_count, "requisition drafted");
        self.event_sender
            .send_or_log(Event::RequisitionCreated {
                requisition_id: id,
                line_count,
            })
            .await;

        Ok(id)
    }

    /// Fetches one draft by identifier.
    #[instrument(skip(self))]
    pub async fn get_requisition(&self, id: &Uuid) -> Result<Requisition, ServiceError> {
        self.drafts
            .get(id)
            .map(|entry| entry.clone())
            .ok_or_else(|| ServiceError::NotFound(format!("Requisition {} not found", id)))
    }

    /// Returns drafts newest-first, paginated, plus the total draft count.
    #[instrument(skip(self))]
    pub async fn list_requisitions(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Requisition>, u64), ServiceError> {
        let mut all: Vec<Requisition> = self
            .drafts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = all.len() as u64;
        let per_page = per_page.max(1);
        let offset = page.max(1).saturating_sub(1).saturating_mul(per_page);
        let page_items = all
            .into_iter()
            .skip(offset as usize)
            .take(per_page as usize)
            .collect();

        Ok((page_items, total))
    }
}
