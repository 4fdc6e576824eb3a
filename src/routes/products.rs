use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::products::ProductList,
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in name and description"),
        ("category" = Option<Uuid>, Query, description = "Filter by category id"),
        ("min_price" = Option<i64>, Query, description = "Minimum price in naira"),
        ("max_price" = Option<i64>, Query, description = "Maximum price in naira"),
        ("sort_by" = Option<ProductSortBy>, Query, description = "created_at, price or name"),
        ("sort_order" = Option<SortOrder>, Query, description = "asc or desc"),
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let (page, limit, offset) = query.pagination.normalize();
    let q = query.q.as_deref().filter(|s| !s.is_empty());

    // Sort fields go through the whitelist; only bound values reach the SQL.
    let sort_by = query
        .sort_by
        .as_ref()
        .unwrap_or(&ProductSortBy::CreatedAt)
        .as_sql();
    let sort_order = query
        .sort_order
        .as_ref()
        .unwrap_or(&SortOrder::Desc)
        .as_sql();

    let sql = format!(
        r#"
        SELECT * FROM products
        WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR description ILIKE '%' || $1 || '%')
          AND ($2::uuid IS NULL OR category_id = $2)
          AND ($3::bigint IS NULL OR price >= $3)
          AND ($4::bigint IS NULL OR price <= $4)
        ORDER BY {sort_by} {sort_order}
        LIMIT $5 OFFSET $6
        "#
    );

    let items: Vec<Product> = sqlx::query_as(&sql)
        .bind(q)
        .bind(query.category)
        .bind(query.min_price)
        .bind(query.max_price)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?;

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT count(*) FROM products
        WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR description ILIKE '%' || $1 || '%')
          AND ($2::uuid IS NULL OR category_id = $2)
          AND ($3::bigint IS NULL OR price >= $3)
          AND ($4::bigint IS NULL OR price <= $4)
        "#,
    )
    .bind(q)
    .bind(query.category)
    .bind(query.min_price)
    .bind(query.max_price)
    .fetch_one(&state.pool)
    .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(Json(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;

    let product = product.ok_or(AppError::NotFound)?;
    Ok(Json(ApiResponse::success("Product", product, None)))
}
