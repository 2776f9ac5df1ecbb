// server/src/models/school.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct School {
  pub id: Uuid,
  pub owner_id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub city: String,
  pub sport: String,
  pub created_at: DateTime<Utc>,
}
