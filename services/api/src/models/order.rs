//! Order models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Payment state of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Cancelled,
    Refunded,
}

/// Purchase order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i64,
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
}

impl Order {
    /// Only pending orders can be cancelled
    pub fn is_cancellable(&self) -> bool {
        self.payment_status == PaymentStatus::Pending
    }
}

/// Course line of an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub order_item_id: i64,
    pub course_id: i64,
    pub course_title: String,
    #[serde(default)]
    pub course_cover_image_url: Option<String>,
    pub price: f64,
}
