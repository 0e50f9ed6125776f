use super::common::{map_service_error, success_response};
use crate::{
    errors::ApiError,
    events::Event,
    handlers::AppState,
};
use axum::{extract::State, response::IntoResponse, routing::{get, post}, Router};
use tracing::info;

/// Creates the router for snapshot administration endpoints
pub fn snapshot_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(snapshot_status))
        .route("/reload", post(reload_snapshots))
}

/// Current snapshot table counts and load time
#[utoipa::path(
    get,
    path = "/api/v1/snapshots",
    responses(
        (status = 200, description = "Snapshot status returned", body = crate::snapshots::SnapshotSummary)
    ),
    tag = "snapshots"
)]
pub async fn snapshot_status(State(state): State<AppState>) -> impl IntoResponse {
    success_response(state.snapshots.summary().await)
}

/// Re-read both snapshot files from disk
#[utoipa::path(
    post,
    path = "/api/v1/snapshots/reload",
    responses(
        (status = 200, description = "Snapshots reloaded", body = crate::snapshots::SnapshotSummary),
        (status = 503, description = "Snapshot file missing or malformed", body = crate::errors::ErrorResponse)
    ),
    tag = "snapshots"
)]
pub async fn reload_snapshots(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .snapshots
        .reload()
        .await
        .map_err(map_service_error)?;

    info!(
        bom_edges = summary.bom_edges,
        items = summary.items,
        "snapshots reloaded"
    );

    state
        .event_sender
        .send_or_log(Event::SnapshotsReloaded {
            bom_edges: summary.bom_edges,
            items: summary.items,
        })
        .await;

    Ok(success_response(summary))
}
