// server/src/models/appointment.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "appointment_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
  Scheduled,
  Completed,
  Cancelled,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WellnessAppointment {
  pub id: Uuid,
  pub user_id: Uuid,
  pub professional_id: Uuid,
  pub service_type: String,
  pub appointment_date: NaiveDate,
  pub appointment_time: NaiveTime,
  pub status: AppointmentStatus,
  pub notes: Option<String>,
  pub created_at: DateTime<Utc>,
}
