// server/src/models/calendar_event.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A personal calendar entry, e.g. the start date of a purchased program.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CalendarEvent {
  pub id: Uuid,
  pub user_id: Uuid,
  pub title: String,
  pub description: Option<String>,
  pub event_date: NaiveDate,
  pub event_time: Option<NaiveTime>,
  pub location: Option<String>,
  pub created_at: DateTime<Utc>,
}
