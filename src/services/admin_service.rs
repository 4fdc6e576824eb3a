use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::news::CreateNewsPostRequest,
    dto::orders::{OrderList, OrderWithItems},
    dto::products::{CreateCategoryRequest, CreateProductRequest, UpdateProductRequest},
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, NewsPost, Product},
    response::{ApiResponse, Meta},
    routes::admin::{GrantRoleRequest, UserList, UserSummary},
    routes::params::{OrderListQuery, SortOrder},
    services::order_service::{order_from_entity, order_item_from_entity},
    state::AppState,
};

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(&state.pool, user).await?;

    let product: Product = sqlx::query_as(
        r#"
        INSERT INTO products (id, name, description, price, category_id, image_url, stock, unit)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.price)
    .bind(payload.category_id)
    .bind(&payload.image_url)
    .bind(payload.stock)
    .bind(&payload.unit)
    .fetch_one(&state.pool)
    .await?;

    log_audit(
        &state.pool,
        Some(user.user_id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        product,
        Some(Meta::empty()),
    ))
}

/// Partial update: absent fields keep their stored value. Clearing a
/// nullable field to NULL is not supported through this endpoint.
pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(&state.pool, user).await?;

    let product: Option<Product> = sqlx::query_as(
        r#"
        UPDATE products
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            price = COALESCE($4, price),
            category_id = COALESCE($5, category_id),
            image_url = COALESCE($6, image_url),
            stock = COALESCE($7, stock),
            unit = COALESCE($8, unit)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.price)
    .bind(payload.category_id)
    .bind(&payload.image_url)
    .bind(payload.stock)
    .bind(&payload.unit)
    .fetch_optional(&state.pool)
    .await?;

    let product = product.ok_or(AppError::NotFound)?;

    log_audit(
        &state.pool,
        Some(user.user_id),
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Product updated",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(&state.pool, user).await?;

    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    log_audit(
        &state.pool,
        Some(user.user_id),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Product deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(&state.pool, user).await?;

    let category: Category = sqlx::query_as(
        "INSERT INTO categories (id, name, description) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&payload.name)
    .bind(&payload.description)
    .fetch_one(&state.pool)
    .await?;

    log_audit(
        &state.pool,
        Some(user.user_id),
        "category_create",
        Some("categories"),
        Some(serde_json::json!({ "category_id": category.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Category created",
        category,
        Some(Meta::empty()),
    ))
}

pub async fn create_news_post(
    state: &AppState,
    user: &AuthUser,
    payload: CreateNewsPostRequest,
) -> AppResult<ApiResponse<NewsPost>> {
    ensure_admin(&state.pool, user).await?;

    let post: NewsPost = sqlx::query_as(
        r#"
        INSERT INTO news_posts (id, title, content, excerpt, image_url, category, author_name, featured)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&payload.title)
    .bind(&payload.content)
    .bind(&payload.excerpt)
    .bind(&payload.image_url)
    .bind(&payload.category)
    .bind(&payload.author_name)
    .bind(payload.featured)
    .fetch_one(&state.pool)
    .await?;

    log_audit(
        &state.pool,
        Some(user.user_id),
        "news_create",
        Some("news_posts"),
        Some(serde_json::json!({ "post_id": post.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Post created",
        post,
        Some(Meta::empty()),
    ))
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(&state.pool, user).await?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let mut finder = Orders::find().filter(condition);

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(&state.pool, user).await?;

    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(order_from_entity)
        .ok_or(AppError::NotFound)?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Order found",
        OrderWithItems { order, items },
        Some(Meta::empty()),
    ))
}

pub async fn list_users(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(&state.pool, user).await?;

    let users: Vec<UserSummary> = sqlx::query_as(
        r#"
        SELECT u.id, u.email, COALESCE(r.role, 'user') AS role, u.created_at
        FROM users u
        LEFT JOIN user_roles r ON r.user_id = u.id AND r.role = 'admin'
        ORDER BY u.created_at DESC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "OK",
        UserList { items: users },
        Some(Meta::empty()),
    ))
}

/// Grant a role to the user owning the given email. Granting an already
/// held role is a no-op rather than an error.
pub async fn grant_role(
    state: &AppState,
    user: &AuthUser,
    payload: GrantRoleRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(&state.pool, user).await?;

    if payload.role != "admin" && payload.role != "user" {
        return Err(AppError::BadRequest("Invalid role".into()));
    }

    let target: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&state.pool)
        .await?;
    let (target_id,) = target.ok_or(AppError::NotFound)?;

    sqlx::query(
        r#"
        INSERT INTO user_roles (id, user_id, role)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, role) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(target_id)
    .bind(&payload.role)
    .execute(&state.pool)
    .await?;

    log_audit(
        &state.pool,
        Some(user.user_id),
        "role_granted",
        Some("user_roles"),
        Some(serde_json::json!({ "target_user_id": target_id, "role": payload.role })),
    )
    .await;

    Ok(ApiResponse::success(
        "Role granted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
