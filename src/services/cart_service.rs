use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    cart::Cart,
    dto::cart::{CartLine, CartView},
    entity::cart_items::{ActiveModel as CartItemActive, Column as CartCol, Entity as CartItems},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Rebuild the in-memory cart from the rows stored for this user.
pub async fn load_cart(state: &AppState, user_id: Uuid) -> AppResult<Cart> {
    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user_id))
        .all(&state.orm)
        .await?;

    Ok(Cart::from_entries(
        rows.into_iter().map(|row| (row.product_id, row.quantity)),
    ))
}

/// Replace the stored rows with the full current mapping. Every mutation
/// goes through here, so the table always mirrors the cart exactly.
pub async fn store_cart(state: &AppState, user_id: Uuid, cart: &Cart) -> AppResult<()> {
    let txn = state.orm.begin().await?;

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    for (product_id, quantity) in cart.entries() {
        CartItemActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    Ok(())
}

pub async fn add_item(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&state.pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::BadRequest("product not found".to_string()));
    }

    let mut cart = load_cart(state, user.user_id).await?;
    cart.add(product_id);
    store_cart(state, user.user_id, &cart).await?;

    log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": product_id })),
    )
    .await;

    let view = build_view(state, &cart).await?;
    Ok(ApiResponse::success("Added to cart", view, Some(Meta::empty())))
}

pub async fn remove_item(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    let mut cart = load_cart(state, user.user_id).await?;
    cart.remove(product_id);
    store_cart(state, user.user_id, &cart).await?;

    log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": product_id })),
    )
    .await;

    let view = build_view(state, &cart).await?;
    Ok(ApiResponse::success(
        "Removed from cart",
        view,
        Some(Meta::empty()),
    ))
}

pub async fn set_item_quantity(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    quantity: i32,
) -> AppResult<ApiResponse<CartView>> {
    let mut cart = load_cart(state, user.user_id).await?;
    cart.set_quantity(product_id, quantity);
    store_cart(state, user.user_id, &cart).await?;

    log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_set_quantity",
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": product_id, "quantity": quantity })),
    )
    .await;

    let view = build_view(state, &cart).await?;
    Ok(ApiResponse::success("Cart updated", view, Some(Meta::empty())))
}

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let cart = load_cart(state, user.user_id).await?;
    let view = build_view(state, &cart).await?;
    Ok(ApiResponse::success("OK", view, Some(Meta::empty())))
}

/// Join the cart against the current catalog. Prices are whatever the
/// catalog says right now; they are only frozen once an order line is
/// written at checkout. Products deleted since the item was added are
/// dropped from the view and priced at zero.
async fn build_view(state: &AppState, cart: &Cart) -> AppResult<CartView> {
    let ids: Vec<Uuid> = cart.entries().map(|(id, _)| id).collect();

    let products: Vec<Product> = if ids.is_empty() {
        Vec::new()
    } else {
        sqlx::query_as("SELECT * FROM products WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&state.pool)
            .await?
    };

    let by_id: HashMap<Uuid, Product> =
        products.into_iter().map(|p| (p.id, p)).collect();
    let prices: HashMap<Uuid, i64> = by_id.iter().map(|(id, p)| (*id, p.price)).collect();

    let items = cart
        .entries()
        .filter_map(|(product_id, quantity)| {
            by_id.get(&product_id).map(|product| CartLine {
                product: product.clone(),
                quantity,
            })
        })
        .collect();

    Ok(CartView {
        items,
        total_items: cart.total_items(),
        total_price: cart.total_price(&prices),
    })
}
