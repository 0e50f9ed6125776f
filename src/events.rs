use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events emitted by the services. Consumed by a single logging
/// processor today; the channel is the integration point for anything else.
#[derive(Debug, Clone)]
pub enum Event {
    ExplosionComputed {
        root_item_id: String,
        build_quantity: i64,
        line_count: usize,
    },
    ShortageDetected {
        root_item_id: String,
        short_item_count: usize,
    },
    RequisitionCreated {
        requisition_id: Uuid,
        line_count: usize,
    },
    SnapshotsReloaded {
        bom_edges: usize,
        items: usize,
    },
}

#[derive(Clone, Debug)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event, failing if the channel is closed or full.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event; a delivery failure is logged and otherwise ignored.
    /// Event delivery must never fail a user-facing operation.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(err) = self.send(event).await {
            warn!("Event delivery failed: {}", err);
        }
    }
}

/// Drains the event channel and logs each event. Runs until every sender is
/// dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::ExplosionComputed {
                root_item_id,
                build_quantity,
                line_count,
            } => info!(
                root_item_id = %root_item_id,
                build_quantity = *build_quantity,
                line_count = *line_count,
                "BOM explosion computed"
            ),
            Event::ShortageDetected {
                root_item_id,
                short_item_count,
            } => info!(
                root_item_id = %root_item_id,
                short_item_count = *short_item_count,
                "component shortage detected"
            ),
            Event::RequisitionCreated {
                requisition_id,
                line_count,
            } => info!(%requisition_id, line_count, "purchase requisition drafted"),
            Event::SnapshotsReloaded { bom_edges, items } => {
                info!(bom_edges = *bom_edges, items = *items, "ERP snapshots reloaded")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_or_log_swallows_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        // Must not panic.
        sender
            .send_or_log(Event::SnapshotsReloaded {
                bom_edges: 0,
                items: 0,
            })
            .await;
    }

    #[tokio::test]
    async fn events_round_trip_through_channel() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        sender
            .send(Event::ShortageDetected {
                root_item_id: "CASE-A".to_string(),
                short_item_count: 2,
            })
            .await
            .unwrap();
        match rx.recv().await.unwrap() {
            Event::ShortageDetected {
                root_item_id,
                short_item_count,
            } => {
                assert_eq!(root_item_id, "CASE-A");
                assert_eq!(short_item_count, 2);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
