use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use models::toplist_item::{ItemPayload, Model};
use service::ReorderEntry;

use crate::{errors::JsonApiError, routes::ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RankRangeQuery {
    /// Lowest rank, inclusive
    pub start: i32,
    /// Highest rank, inclusive
    pub end: i32,
}

#[utoipa::path(
    get, path = "/api/toplist", tag = "toplist",
    responses((status = 200, description = "All items", body = [crate::openapi::ItemDoc]))
)]
pub async fn list_items(State(state): State<ServerState>) -> Result<Json<Vec<Model>>, JsonApiError> {
    let list = state.items.get_all_items().await?;
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/api/toplist/{id}", tag = "toplist",
    params(("id" = i64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ItemDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_item(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<Json<Model>, JsonApiError> {
    match state.items.get_item_by_id(id).await? {
        Some(m) => Ok(Json(m)),
        None => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(format!("item not found with id: {}", id)))),
    }
}

#[utoipa::path(
    get, path = "/api/toplist/category/{category}", tag = "toplist",
    params(("category" = String, Path, description = "Category name")),
    responses((status = 200, description = "Items ordered by rank ascending", body = [crate::openapi::ItemDoc]))
)]
pub async fn list_by_category(State(state): State<ServerState>, Path(category): Path<String>) -> Result<Json<Vec<Model>>, JsonApiError> {
    Ok(Json(state.items.get_items_by_category(&category).await?))
}

#[utoipa::path(
    get, path = "/api/toplist/category/{category}/by-votes", tag = "toplist",
    params(("category" = String, Path, description = "Category name")),
    responses((status = 200, description = "Items ordered by votes descending", body = [crate::openapi::ItemDoc]))
)]
pub async fn list_by_category_votes(State(state): State<ServerState>, Path(category): Path<String>) -> Result<Json<Vec<Model>>, JsonApiError> {
    Ok(Json(state.items.get_items_by_category_order_by_votes(&category).await?))
}

#[utoipa::path(
    get, path = "/api/toplist/category/{category}/range", tag = "toplist",
    params(("category" = String, Path, description = "Category name"), RankRangeQuery),
    responses(
        (status = 200, description = "Items with rank in range, ascending", body = [crate::openapi::ItemDoc]),
        (status = 400, description = "Invalid range")
    )
)]
pub async fn list_by_rank_range(
    State(state): State<ServerState>,
    Path(category): Path<String>,
    Query(q): Query<RankRangeQuery>,
) -> Result<Json<Vec<Model>>, JsonApiError> {
    Ok(Json(state.items.get_items_by_rank_range(&category, q.start, q.end).await?))
}

#[utoipa::path(
    get, path = "/api/toplist/categories", tag = "toplist",
    responses((status = 200, description = "Distinct category names", body = [String]))
)]
pub async fn list_categories(State(state): State<ServerState>) -> Result<Json<Vec<String>>, JsonApiError> {
    Ok(Json(state.items.get_all_categories().await?))
}

#[utoipa::path(
    get, path = "/api/toplist/top-voted", tag = "toplist",
    responses((status = 200, description = "All items ordered by votes descending", body = [crate::openapi::ItemDoc]))
)]
pub async fn top_voted(State(state): State<ServerState>) -> Result<Json<Vec<Model>>, JsonApiError> {
    Ok(Json(state.items.get_top_items_by_votes().await?))
}

#[utoipa::path(
    post, path = "/api/toplist", tag = "toplist",
    request_body = crate::openapi::ItemPayloadDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ItemDoc),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create_item(
    State(state): State<ServerState>,
    payload: Result<Json<ItemPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Model>), JsonApiError> {
    let Json(input) = payload?;
    let m = state.items.create_item(input).await?;
    info!(id = m.id, category = %m.category, "item_create_request");
    Ok((StatusCode::CREATED, Json(m)))
}

#[utoipa::path(
    put, path = "/api/toplist/{id}", tag = "toplist",
    params(("id" = i64, Path, description = "Item ID")),
    request_body = crate::openapi::ItemPayloadDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ItemDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_item(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    payload: Result<Json<ItemPayload>, JsonRejection>,
) -> Result<Json<Model>, JsonApiError> {
    let Json(input) = payload?;
    Ok(Json(state.items.update_item(id, input).await?))
}

#[utoipa::path(
    post, path = "/api/toplist/{id}/vote", tag = "toplist",
    params(("id" = i64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Vote counted", body = crate::openapi::ItemDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn vote_item(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<Json<Model>, JsonApiError> {
    Ok(Json(state.items.vote_for_item(id).await?))
}

#[utoipa::path(
    delete, path = "/api/toplist/{id}", tag = "toplist",
    params(("id" = i64, Path, description = "Item ID")),
    responses((status = 204, description = "Deleted or already absent"))
)]
pub async fn delete_item(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<StatusCode, JsonApiError> {
    state.items.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put, path = "/api/toplist/category/{category}/reorder", tag = "toplist",
    params(("category" = String, Path, description = "Category name")),
    request_body = [crate::openapi::ItemDoc],
    responses((status = 200, description = "Category re-ranked 1..N in submitted order", body = [crate::openapi::ItemDoc]))
)]
pub async fn reorder_category(
    State(state): State<ServerState>,
    Path(category): Path<String>,
    payload: Result<Json<Vec<ReorderEntry>>, JsonRejection>,
) -> Result<Json<Vec<Model>>, JsonApiError> {
    let Json(entries) = payload?;
    Ok(Json(state.items.update_ranks(&category, entries).await?))
}
