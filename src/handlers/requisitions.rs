use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::requisition::{CreateRequisitionInput, RequisitionLine},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Creates the router for purchase requisition endpoints
pub fn requisition_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_requisition))
        .route("/", get(list_requisitions))
        .route("/:id", get(get_requisition))
}

// Request DTOs

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRequisitionRequest {
    #[validate(length(min = 1))]
    pub lines: Vec<RequisitionLineRequest>,
    /// Root item of the explosion this draft came from, if any
    pub source_root_item_id: Option<String>,
    pub notes: Option<String>,
}

// Serialize is needed by the `length` validator on the containing request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RequisitionLineRequest {
    pub item_id: String,
    #[serde(default)]
    pub description: String,
    pub quantity_needed: Decimal,
    pub unit_of_measure: String,
    pub unit_cost: Decimal,
}

// Handler functions

/// Draft a purchase requisition (typically pre-filled from a shortfall run)
#[utoipa::path(
    post,
    path = "/api/v1/requisitions",
    request_body = CreateRequisitionRequest,
    responses(
        (status = 201, description = "Requisition drafted"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "requisitions"
)]
pub async fn create_requisition(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequisitionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let lines = payload
        .lines
        .into_iter()
        .map(|line| RequisitionLine {
            item_id: line.item_id,
            description: line.description,
            quantity_needed: line.quantity_needed,
            unit_of_measure: line.unit_of_measure,
            unit_cost: line.unit_cost,
        })
        .collect();

    let id = state
        .services
        .requisitions
        .create_requisition(CreateRequisitionInput {
            lines,
            source_root_item_id: payload.source_root_item_id,
            notes: payload.notes,
        })
        .await
        .map_err(map_service_error)?;

    info!("Requisition drafted: {}", id);

    Ok(created_response(serde_json::json!({
        "id": id,
        "message": "Requisition drafted successfully"
    })))
}

/// Get a requisition draft by ID
#[utoipa::path(
    get,
    path = "/api/v1/requisitions/{id}",
    params(("id" = Uuid, Path, description = "Requisition id")),
    responses(
        (status = 200, description = "Requisition returned", body = crate::services::requisition::Requisition),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "requisitions"
)]
pub async fn get_requisition(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let requisition = state
        .services
        .requisitions
        .get_requisition(&id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(requisition))
}

/// List requisition drafts, newest first
#[utoipa::path(
    get,
    path = "/api/v1/requisitions",
    params(PaginationParams),
    responses(
        (status = 200, description = "Requisition list returned")
    ),
    tag = "requisitions"
)]
pub async fn list_requisitions(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = params.page.max(1);
    let per_page = params.per_page.max(1);

    let (requisitions, total) = state
        .services
        .requisitions
        .list_requisitions(page, per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        requisitions,
        page,
        per_page,
        total,
    )))
}
