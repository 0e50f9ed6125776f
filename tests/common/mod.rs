use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use mrp_api::{
    config::AppConfig,
    events::{self, EventSender},
    handlers::AppServices,
    models::{BomEdge, ItemRecord},
    snapshots::SnapshotStore,
    AppState,
};

/// Test harness: full router over an in-memory snapshot pair, no disk, no
/// network.
pub struct TestApp {
    router: Router,
    #[allow(dead_code)]
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Must be called from within a tokio runtime.
    pub fn new(bom_edges: Vec<BomEdge>, items: Vec<ItemRecord>) -> Self {
        let cfg = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            log_json: false,
            bom_snapshot_path: "unused".to_string(),
            item_snapshot_path: "unused".to_string(),
            cors_allowed_origins: None,
        };

        let snapshots = Arc::new(SnapshotStore::from_tables(bom_edges, items));
        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(snapshots.clone(), Arc::new(event_sender.clone()));
        let state = AppState {
            config: cfg,
            snapshots,
            event_sender,
            services,
        };

        let router = Router::new()
            .merge(mrp_api::handlers::health::health_routes())
            .nest("/api/v1", mrp_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let request = match body {
            Some(json) => Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        };

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

#[allow(dead_code)]
pub fn edge(parent: &str, component: &str, qty: Decimal) -> BomEdge {
    BomEdge {
        parent_item_id: parent.to_string(),
        component_item_id: component.to_string(),
        quantity_per_parent: qty,
    }
}

#[allow(dead_code)]
pub fn item(id: &str, description: &str, on_hand: Decimal, cost: Decimal) -> ItemRecord {
    ItemRecord {
        item_id: id.to_string(),
        description: description.to_string(),
        on_hand_quantity: on_hand,
        unit_cost: cost,
        unit_of_measure: "EA".to_string(),
    }
}
