use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::checkout::{
        CheckoutRequest, CheckoutResponse, VerifyPaymentRequest, VerifyPaymentResponse,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    services::checkout_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_checkout))
        .route("/verify", post(verify_payment))
}

// Checkout and verification speak the storefront's wire format directly,
// without the ApiResponse envelope the rest of the API uses.

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Hosted payment URL and pending order id", body = CheckoutResponse),
        (status = 400, description = "Empty cart or invalid quantity"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 502, description = "Payment processor error"),
    ),
    security(("bearer_auth" = [])),
    tag = "checkout"
)]
pub async fn create_checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    let response = checkout_service::create_checkout(&state, &user, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/checkout/verify",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Order transitioned per settlement status", body = VerifyPaymentResponse),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 404, description = "No order for this session id"),
        (status = 502, description = "Payment processor error"),
    ),
    security(("bearer_auth" = [])),
    tag = "checkout"
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<VerifyPaymentRequest>,
) -> AppResult<Json<VerifyPaymentResponse>> {
    let response = checkout_service::verify_payment(&state, &user, payload).await?;
    Ok(Json(response))
}
