use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::NewsPost;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNewsPostRequest {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub image_url: Option<String>,
    pub category: String,
    pub author_name: String,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NewsList {
    pub items: Vec<NewsPost>,
}
