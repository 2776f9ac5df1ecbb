// server/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "order_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  /// Line items as stored: `[{ "product_id", "name", "quantity", "price" }]`.
  pub items: serde_json::Value,
  /// Whole COP pesos.
  pub total: i64,
  pub status: OrderStatus,
  pub shipping_address: serde_json::Value,
  pub created_at: DateTime<Utc>,
}
