use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::checkout::{
        CheckoutItem, CheckoutRequest, CheckoutResponse, VerifyPaymentRequest,
        VerifyPaymentResponse,
    },
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        order_items::ActiveModel as OrderItemActive,
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, OrderStatus},
    payments::{
        CreateCustomerRequest, CreateSessionRequest, CustomerAddress, SESSION_ID_PLACEHOLDER,
        SessionLineItem,
    },
    services::order_service::{order_from_entity, order_item_from_entity},
    state::AppState,
};

/// Order total in naira, as stored on the order row.
pub fn compute_total_major(items: &[CheckoutItem]) -> i64 {
    items
        .iter()
        .map(|item| item.price * item.quantity as i64)
        .sum()
}

/// The same total in kobo, as quoted to the payment processor.
pub fn compute_total_minor(items: &[CheckoutItem]) -> i64 {
    compute_total_major(items) * 100
}

/// Build the processor session request for a cart snapshot. Unit amounts
/// are converted to kobo per line; the success URL carries the processor's
/// session-id placeholder so the return redirect identifies the session.
pub fn session_request(
    customer_id: &str,
    currency: &str,
    public_origin: &str,
    user_id: Uuid,
    items: &[CheckoutItem],
    customer_info_json: String,
) -> CreateSessionRequest {
    let line_items = items
        .iter()
        .map(|item| SessionLineItem {
            name: item.name.clone(),
            description: item.description.clone(),
            unit_amount: item.price * 100,
            quantity: item.quantity,
        })
        .collect();

    CreateSessionRequest {
        customer_id: customer_id.to_string(),
        currency: currency.to_string(),
        line_items,
        success_url: format!(
            "{public_origin}/checkout/success?session_id={SESSION_ID_PLACEHOLDER}"
        ),
        cancel_url: format!("{public_origin}/checkout/cancel"),
        metadata_user_id: user_id.to_string(),
        metadata_customer_info: customer_info_json,
    }
}

pub async fn create_checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<CheckoutResponse> {
    tracing::info!(user_id = %user.user_id, items = payload.items.len(), "checkout started");

    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }
    if payload.items.iter().any(|item| item.quantity <= 0) {
        return Err(AppError::BadRequest("Cart has invalid quantity".into()));
    }
    tracing::debug!(
        total_kobo = compute_total_minor(&payload.items),
        "cart total computed"
    );

    // Resolve or create the processor-side customer, keyed by the
    // authenticated user's email. First match wins.
    let customer = match state.payments.find_customer(&user.email).await? {
        Some(existing) => {
            tracing::info!(customer_id = %existing.id, "reusing payment customer");
            existing
        }
        None => {
            let created = state
                .payments
                .create_customer(&CreateCustomerRequest {
                    email: user.email.clone(),
                    name: payload.customer_info.full_name(),
                    phone: payload.customer_info.phone.clone(),
                    address: CustomerAddress {
                        line1: payload.customer_info.address.clone(),
                        city: payload.customer_info.city.clone(),
                        state: payload.customer_info.state.clone(),
                        postal_code: payload.customer_info.zip_code.clone(),
                        country: "NG".to_string(),
                    },
                })
                .await?;
            tracing::info!(customer_id = %created.id, "created payment customer");
            created
        }
    };

    let customer_info_json = serde_json::to_string(&payload.customer_info)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    let request = session_request(
        &customer.id,
        &state.currency,
        &state.public_origin,
        user.user_id,
        &payload.items,
        customer_info_json,
    );

    let session = state.payments.create_checkout_session(&request).await?;
    let url = session
        .url
        .clone()
        .ok_or_else(|| AppError::Payment("checkout session has no redirect URL".into()))?;
    tracing::info!(session_id = %session.id, "checkout session created");

    let (order, _items) = record_order(state, user.user_id, &session.id, &payload.items).await?;
    tracing::info!(order_id = %order.id, total = order.total_amount, "pending order recorded");

    log_audit(
        &state.pool,
        Some(user.user_id),
        "checkout_session_created",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "session_id": session.id })),
    )
    .await;

    Ok(CheckoutResponse {
        url,
        order_id: order.id,
    })
}

/// Insert the pending order and its lines in one transaction. Prices and
/// quantities are copied from the submitted snapshot verbatim, so later
/// catalog edits never alter a recorded order.
pub async fn record_order(
    state: &AppState,
    user_id: Uuid,
    session_id: &str,
    items: &[CheckoutItem],
) -> AppResult<(Order, Vec<OrderItem>)> {
    let total_amount = compute_total_major(items);
    let txn = state.orm.begin().await?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        total_amount: Set(total_amount),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        payment_session_id: Set(session_id.to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut order_items = Vec::with_capacity(items.len());
    for item in items {
        let row = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(item.id),
            quantity: Set(item.quantity),
            price: Set(item.price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        order_items.push(order_item_from_entity(row));
    }

    txn.commit().await?;

    Ok((order_from_entity(order), order_items))
}

pub async fn verify_payment(
    state: &AppState,
    user: &AuthUser,
    payload: VerifyPaymentRequest,
) -> AppResult<VerifyPaymentResponse> {
    tracing::info!(user_id = %user.user_id, session_id = %payload.session_id, "verification started");

    let session = state
        .payments
        .retrieve_checkout_session(&payload.session_id)
        .await?;
    tracing::info!(payment_status = %session.payment_status, "session retrieved");

    let order = apply_session_status(state, &session.id, &session.payment_status).await?;

    log_audit(
        &state.pool,
        Some(user.user_id),
        "payment_verified",
        Some("orders"),
        Some(serde_json::json!({
            "order_id": order.id,
            "payment_status": session.payment_status,
        })),
    )
    .await;

    Ok(VerifyPaymentResponse {
        success: true,
        order,
        payment_status: session.payment_status,
    })
}

/// Transition the order matching a session id according to the processor's
/// settlement status. The row is rewritten even when the mapped status is
/// unchanged, so repeated verification of a paid session stays `paid`.
/// Clearing the buyer's cart after a successful payment is best effort and
/// deliberately outside the status transaction: a failed clear must not
/// unwind a payment the processor has already settled.
pub async fn apply_session_status(
    state: &AppState,
    session_id: &str,
    payment_status: &str,
) -> AppResult<Order> {
    let order = Orders::find()
        .filter(OrderCol::PaymentSessionId.eq(session_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let user_id = order.user_id;
    let new_status = OrderStatus::from_payment_status(payment_status);

    let mut active: OrderActive = order.into();
    active.status = Set(new_status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    tracing::info!(order_id = %order.id, status = %order.status, "order status updated");

    if new_status == OrderStatus::Paid {
        let cleared = CartItems::delete_many()
            .filter(CartCol::UserId.eq(user_id))
            .exec(&state.orm)
            .await;
        match cleared {
            Ok(result) => {
                tracing::info!(rows = result.rows_affected, "cart cleared after payment")
            }
            Err(err) => tracing::warn!(error = %err, "cart clear failed after payment"),
        }
    }

    Ok(order_from_entity(order))
}
