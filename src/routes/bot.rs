use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::bot::{BotRequest, BotResponse},
    error::AppResult,
    response::ApiResponse,
    services::bot_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(welcome).post(chat))
}

#[utoipa::path(
    get,
    path = "/api/farm-bot",
    responses(
        (status = 200, description = "Opening message shown by the chat widget", body = ApiResponse<BotResponse>),
    ),
    tag = "farm-bot"
)]
pub async fn welcome() -> Json<ApiResponse<BotResponse>> {
    Json(ApiResponse::success(
        "Welcome message",
        BotResponse {
            response: bot_service::WELCOME.to_string(),
        },
        None,
    ))
}

#[utoipa::path(
    post,
    path = "/api/farm-bot",
    request_body = BotRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ApiResponse<BotResponse>),
        (status = 400, description = "Empty message"),
    ),
    tag = "farm-bot"
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<BotRequest>,
) -> AppResult<Json<ApiResponse<BotResponse>>> {
    let response = bot_service::respond(&state, payload).await?;
    Ok(Json(response))
}
