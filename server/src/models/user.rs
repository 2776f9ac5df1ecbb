// server/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "user_role_enum", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
  Parent,
  Athlete,
  Coach,
  SchoolOwner,
  StoreOwner,
  WellnessProfessional,
  EventOrganizer,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
  pub id: Uuid,
  pub email: String,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub full_name: String,
  pub role: UserRole,
  pub phone: Option<String>,
  pub created_at: DateTime<Utc>,
}
