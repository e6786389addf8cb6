use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDoc {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub rank: i32,
    pub vote_count: i32,
    pub image_url: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayloadDoc {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub rank: Option<i32>,
    /// Honoured on create only
    pub vote_count: Option<i32>,
    pub image_url: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::items::list_items,
        crate::routes::items::get_item,
        crate::routes::items::list_by_category,
        crate::routes::items::list_by_category_votes,
        crate::routes::items::list_by_rank_range,
        crate::routes::items::list_categories,
        crate::routes::items::top_voted,
        crate::routes::items::create_item,
        crate::routes::items::update_item,
        crate::routes::items::vote_item,
        crate::routes::items::delete_item,
        crate::routes::items::reorder_category,
    ),
    components(
        schemas(
            HealthResponse,
            ItemDoc,
            ItemPayloadDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "toplist")
    )
)]
pub struct ApiDoc;
