use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::ItemService;

use crate::openapi::ApiDoc;

pub mod items;

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    pub items: ItemService,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Generated OpenAPI document for the whole API.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Routes under `/api/toplist`, without layers.
pub fn item_routes() -> Router<ServerState> {
    Router::new()
        .route("/api/toplist", get(items::list_items).post(items::create_item))
        .route("/api/toplist/", get(items::list_items).post(items::create_item))
        .route("/api/toplist/categories", get(items::list_categories))
        .route("/api/toplist/top-voted", get(items::top_voted))
        .route("/api/toplist/category/:category", get(items::list_by_category))
        .route("/api/toplist/category/:category/by-votes", get(items::list_by_category_votes))
        .route("/api/toplist/category/:category/range", get(items::list_by_rank_range))
        .route("/api/toplist/category/:category/reorder", put(items::reorder_category))
        .route(
            "/api/toplist/:id",
            get(items::get_item).put(items::update_item).delete(items::delete_item),
        )
        .route("/api/toplist/:id/vote", post(items::vote_item))
}

/// Build the full application router: health, item API, OpenAPI docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(item_routes())
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
