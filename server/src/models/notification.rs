// server/src/models/notification.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// An in-app notification row. `kind` maps to the `type` column and is a free
/// label such as "enrollment", "sale", "appointment" or "purchase".
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
  pub id: Uuid,
  pub user_id: Uuid,
  pub title: String,
  pub message: String,
  #[sqlx(rename = "type")]
  #[serde(rename = "type")]
  pub kind: String,
  pub read: bool,
  pub created_at: DateTime<Utc>,
}
