// server/src/models/enrollment.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "enrollment_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
  Active,
  Dropped,
  Completed,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Enrollment {
  pub id: Uuid,
  pub user_id: Uuid,
  pub program_id: Uuid,
  pub status: EnrollmentStatus,
  pub start_date: NaiveDate,
  pub created_at: DateTime<Utc>,
}
