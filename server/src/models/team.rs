// server/src/models/team.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Team {
  pub id: Uuid,
  pub school_id: Uuid,
  pub coach_id: Option<Uuid>,
  pub name: String,
  pub sport: String,
  pub category: Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MatchResult {
  pub id: Uuid,
  pub team_id: Uuid,
  pub opponent: String,
  pub match_date: NaiveDate,
  pub team_score: i32,
  pub opponent_score: i32,
  pub notes: Option<String>,
  pub recorded_by: Uuid,
  pub created_at: DateTime<Utc>,
}
