// server/src/models/program.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "program_level_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProgramLevel {
  Beginner,
  Intermediate,
  Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "program_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProgramStatus {
  Active,
  Inactive,
  Full,
  Cancelled,
}

/// A class/program offered by a school. Capacity is enforced at enrollment
/// time against the count of active enrollments.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Program {
  pub id: Uuid,
  pub school_id: Uuid,
  pub coach_id: Option<Uuid>,
  pub name: String,
  pub description: Option<String>,
  pub sport: String,
  pub level: ProgramLevel,
  pub capacity: i32,
  /// Whole COP pesos.
  pub price: i64,
  pub status: ProgramStatus,
  pub location: Option<String>,
  pub start_date: Option<NaiveDate>,
  pub end_date: Option<NaiveDate>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
