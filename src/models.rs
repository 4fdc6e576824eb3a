use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in whole naira; minor units only exist at the processor boundary.
    pub price: i64,
    pub category_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub stock: i32,
    pub unit: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Snapshot total in whole naira, frozen at checkout-session creation.
    pub total_amount: i64,
    pub status: String,
    pub payment_session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Unit price copied at purchase time; later catalog edits do not touch it.
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NewsPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub image_url: Option<String>,
    pub category: String,
    pub author_name: String,
    pub published_at: DateTime<Utc>,
    pub featured: bool,
    pub views: i32,
}

/// Order lifecycle. Orders are created `Pending`; only payment verification
/// moves them, keyed by the processor session id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Failed => "failed",
        }
    }

    /// Processor payment status → order status. Anything the processor reports
    /// outside `paid`/`unpaid` leaves the order pending.
    pub fn from_payment_status(payment_status: &str) -> Self {
        match payment_status {
            "paid" => OrderStatus::Paid,
            "unpaid" => OrderStatus::Failed,
            _ => OrderStatus::Pending,
        }
    }
}
