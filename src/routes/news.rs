use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::news::NewsList,
    error::AppResult,
    models::NewsPost,
    response::ApiResponse,
    routes::params::NewsQuery,
    services::news_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts))
        .route("/{id}", get(get_post))
}

#[utoipa::path(
    get,
    path = "/api/news",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("category" = Option<String>, Query, description = "Filter by category tag"),
    ),
    responses(
        (status = 200, description = "News posts, newest first", body = ApiResponse<NewsList>)
    ),
    tag = "news"
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> AppResult<Json<ApiResponse<NewsList>>> {
    let response = news_service::list_posts(&state.pool, query).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/news/{id}",
    params(
        ("id" = Uuid, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post with its view counter bumped", body = ApiResponse<NewsPost>),
        (status = 404, description = "Post not found"),
    ),
    tag = "news"
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<NewsPost>>> {
    let response = news_service::get_post(&state.pool, id).await?;
    Ok(Json(response))
}
