//! Request/response types for order-scoped APIs.
//!
//! These payloads are shared between handlers and `OpenAPI` generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub sport: String,
    pub racket_model: String,
    pub string: String,
    pub tension: String,
    pub pickup_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    pub price: f64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub sport: Option<String>,
    pub racket_model: Option<String>,
    pub string: Option<String>,
    pub tension: Option<String>,
    pub pickup_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub order_status: OrderStatus,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Strung,
    PickedUp,
    Cancelled,
}

impl OrderStatus {
    /// Returns the canonical string representation used in API payloads and SQL writes.
    /// The returned value must match the `order_status` values stored in the database.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Strung => "strung",
            Self::PickedUp => "picked_up",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a stored status string back into the enum, `None` for unknown values.
    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "strung" => Some(Self::Strung),
            "picked_up" => Some(Self::PickedUp),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: String,
    pub sport: String,
    pub racket_model: String,
    pub string: String,
    pub tension: String,
    pub pickup_date: String,
    pub notes: String,
    pub price: f64,
    pub order_status: OrderStatus,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<OrderLinks>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLinks {
    #[serde(rename = "self")]
    pub self_: String,
    pub update: String,
    pub cancel: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub message: String,
    pub order_id: String,
    pub order_status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateUserOrderResponse {
    pub message: String,
    pub order_id: String,
    pub user_id: String,
    pub order_status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub order_id: String,
    pub order_status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduledResponse {
    pub message: String,
    pub order_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserOrdersResponse {
    pub orders: Vec<OrderResponse>,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorMessage {
    pub message: serde_json::Value,
}

impl ErrorMessage {
    pub(crate) fn text(message: &str) -> Self {
        Self {
            message: serde_json::Value::String(message.to_string()),
        }
    }

    pub(crate) fn errors(errors: Vec<String>) -> Self {
        Self {
            message: serde_json::json!({ "errors": errors }),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListOrdersQuery {
    /// Filter by sport (exact match).
    pub sport: Option<String>,
    /// Filter by order status.
    pub order_status: Option<OrderStatus>,
    /// Number of rows to skip.
    #[serde(default)]
    pub skip: i64,
    /// Maximum number of rows to return.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Number of rows to skip.
    #[serde(default)]
    pub skip: i64,
    /// Maximum number of rows to return.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

const fn default_limit() -> i64 {
    100
}
