// server/src/models/child.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A child profile managed by a parent account.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Child {
  pub id: Uuid,
  pub parent_id: Uuid,
  pub full_name: String,
  pub birth_date: NaiveDate,
  pub sport: Option<String>,
  pub notes: Option<String>,
  pub created_at: DateTime<Utc>,
}
