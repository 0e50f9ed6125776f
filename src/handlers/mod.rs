pub mod bom;
pub mod common;
pub mod health;
pub mod items;
pub mod requisitions;
pub mod snapshots;

use std::sync::Arc;

use crate::events::EventSender;
use crate::services::{bom_explosion::ExplosionService, requisition::RequisitionService};
use crate::snapshots::SnapshotStore;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer used by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub explosion: Arc<ExplosionService>,
    pub requisitions: Arc<RequisitionService>,
}

impl AppServices {
    pub fn new(snapshots: Arc<SnapshotStore>, event_sender: Arc<EventSender>) -> Self {
        let explosion = Arc::new(ExplosionService::new(snapshots, event_sender.clone()));
        let requisitions = Arc::new(RequisitionService::new(event_sender));
        Self {
            explosion,
            requisitions,
        }
    }
}
