use super::common::{map_service_error, success_response, validate_input};
use crate::{
    errors::ApiError,
    handlers::AppState,
    models::normalize_item_id,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

/// Creates the router for BOM endpoints
pub fn bom_routes() -> Router<AppState> {
    Router::new()
        .route("/explode", post(explode_bom))
        .route("/shortfall", post(shortfall))
        .route("/:item_id/components", get(direct_components))
}

// Request and response DTOs

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ExplodeRequest {
    /// Item to build. Matched case- and whitespace-insensitively.
    #[validate(length(min = 1))]
    pub root_item_id: String,
    /// Units of the root item to build. Must be a positive integer.
    #[validate(range(min = 1))]
    pub build_quantity: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DirectComponentRow {
    pub component_item_id: String,
    pub quantity_per_parent: Decimal,
    pub description: Option<String>,
    pub on_hand_quantity: Option<Decimal>,
}

// Handler functions

/// Explode a BOM into its full multi-level requirement list
#[utoipa::path(
    post,
    path = "/api/v1/bom/explode",
    request_body = ExplodeRequest,
    responses(
        (status = 200, description = "Explosion computed", body = crate::services::bom_explosion::ExplosionReport),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 422, description = "Circular BOM reference", body = crate::errors::ErrorResponse)
    ),
    tag = "bom"
)]
pub async fn explode_bom(
    State(state): State<AppState>,
    Json(payload): Json<ExplodeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let report = state
        .services
        .explosion
        .explode(&payload.root_item_id, payload.build_quantity)
        .await
        .map_err(map_service_error)?;

    info!(
        root_item_id = %report.root_item_id,
        lines = report.lines.len(),
        "BOM exploded"
    );

    Ok(success_response(report))
}

/// Explode a BOM and return only the requisition candidates for short items
#[utoipa::path(
    post,
    path = "/api/v1/bom/shortfall",
    request_body = ExplodeRequest,
    responses(
        (status = 200, description = "Shortfall computed"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 422, description = "Circular BOM reference", body = crate::errors::ErrorResponse)
    ),
    tag = "bom"
)]
pub async fn shortfall(
    State(state): State<AppState>,
    Json(payload): Json<ExplodeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let (report, candidates) = state
        .services
        .explosion
        .shortfall(&payload.root_item_id, payload.build_quantity)
        .await
        .map_err(map_service_error)?;

    // The UI shows a "nothing short" notice instead of opening a requisition
    // flow when this is empty.
    Ok(success_response(json!({
        "root_item_id": report.root_item_id,
        "build_quantity": report.build_quantity,
        "nothing_short": candidates.is_empty(),
        "candidates": candidates,
        "missing_components": report.missing_components,
    })))
}

/// List the direct components of one parent item
#[utoipa::path(
    get,
    path = "/api/v1/bom/{item_id}/components",
    params(("item_id" = String, Path, description = "Parent item id")),
    responses(
        (status = 200, description = "Direct components returned", body = [DirectComponentRow])
    ),
    tag = "bom"
)]
pub async fn direct_components(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let tables = state.snapshots.tables().await;
    let parent_key = normalize_item_id(&item_id);

    let rows: Vec<DirectComponentRow> = tables
        .bom_edges
        .iter()
        .filter(|edge| normalize_item_id(&edge.parent_item_id) == parent_key)
        .map(|edge| {
            let component_key = normalize_item_id(&edge.component_item_id);
            let item = tables
                .items
                .iter()
                .find(|item| normalize_item_id(&item.item_id) == component_key);
            DirectComponentRow {
                component_item_id: component_key,
                quantity_per_parent: edge.quantity_per_parent,
                description: item.map(|i| i.description.clone()),
                on_hand_quantity: item.map(|i| i.on_hand_quantity),
            }
        })
        .collect();

    Ok(success_response(rows))
}
