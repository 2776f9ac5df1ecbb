// server/src/models/attendance.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "attendance_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
  Present,
  Absent,
  Late,
  Excused,
}

/// One attendance mark for a student in a program session.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttendanceRecord {
  pub id: Uuid,
  pub program_id: Uuid,
  pub student_id: Uuid,
  pub session_date: NaiveDate,
  pub status: AttendanceStatus,
  pub recorded_by: Uuid,
  pub created_at: DateTime<Utc>,
}
