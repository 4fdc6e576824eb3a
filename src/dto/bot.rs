use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct BotRequest {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BotResponse {
    pub response: String,
}
