use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::news::NewsList,
    error::{AppError, AppResult},
    models::NewsPost,
    response::{ApiResponse, Meta},
    routes::params::NewsQuery,
};

pub async fn list_posts(pool: &DbPool, query: NewsQuery) -> AppResult<ApiResponse<NewsList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let items: Vec<NewsPost> = sqlx::query_as(
        r#"
        SELECT * FROM news_posts
        WHERE ($1::text IS NULL OR category = $1)
        ORDER BY published_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(query.category.as_deref().filter(|c| !c.is_empty()))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM news_posts WHERE ($1::text IS NULL OR category = $1)",
    )
    .bind(query.category.as_deref().filter(|c| !c.is_empty()))
    .fetch_one(pool)
    .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success("OK", NewsList { items }, Some(meta)))
}

/// Fetch one post and bump its view counter. The read and the write are
/// two statements with no lock between them, so two concurrent opens can
/// record a single view. The counter is a popularity hint, not an exact
/// count, and never decreases.
pub async fn get_post(pool: &DbPool, id: Uuid) -> AppResult<ApiResponse<NewsPost>> {
    let current: Option<NewsPost> = sqlx::query_as("SELECT * FROM news_posts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let current = current.ok_or(AppError::NotFound)?;

    let updated: NewsPost =
        sqlx::query_as("UPDATE news_posts SET views = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(current.views + 1)
            .fetch_one(pool)
            .await?;

    Ok(ApiResponse::success("OK", updated, Some(Meta::empty())))
}
