use super::common::{success_response, PaginatedResponse};
use crate::{errors::ApiError, handlers::AppState, models::ItemRecord};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

/// Creates the router for item snapshot endpoints
pub fn item_routes() -> Router<AppState> {
    Router::new().route("/", get(list_items))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ItemListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Case-insensitive substring match over item id and description
    pub search: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

/// List items from the inventory snapshot, paginated
#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(ItemListQuery),
    responses(
        (status = 200, description = "Item list returned")
    ),
    tag = "items"
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ItemListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tables = state.snapshots.tables().await;

    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase);

    let filtered: Vec<&ItemRecord> = tables
        .items
        .iter()
        .filter(|item| match &needle {
            Some(needle) => {
                item.item_id.to_uppercase().contains(needle)
                    || item.description.to_uppercase().contains(needle)
            }
            None => true,
        })
        .collect();

    let total = filtered.len() as u64;
    let page = query.page.max(1);
    let per_page = query.per_page.max(1);
    let offset = page.saturating_sub(1).saturating_mul(per_page);

    let data: Vec<ItemRecord> = filtered
        .into_iter()
        .skip(offset as usize)
        .take(per_page as usize)
        .cloned()
        .collect();

    Ok(success_response(PaginatedResponse::new(
        data, page, per_page, total,
    )))
}
