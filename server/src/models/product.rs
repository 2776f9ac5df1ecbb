// server/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub vendor_id: Uuid,
  pub name: String,
  pub description: Option<String>,
  /// Whole COP pesos.
  pub price: i64,
  pub stock: i32,
  pub category: String,
  pub image_url: Option<String>,
  /// Flat percentage discount, 0..=100.
  pub discount: Option<i32>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
