// server/src/models/event.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A sport event published by an organizer (tournaments, races, open days).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SportEvent {
  pub id: Uuid,
  pub organizer_id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub sport: String,
  pub event_date: NaiveDate,
  pub location: String,
  pub capacity: Option<i32>,
  /// Whole COP pesos; zero means free entry.
  pub entry_fee: i64,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventRegistration {
  pub id: Uuid,
  pub event_id: Uuid,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
}
