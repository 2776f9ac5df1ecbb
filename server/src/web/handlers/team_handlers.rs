// server/src/web/handlers/team_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{MatchResult, Team};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CreateTeamPayload {
  pub school_id: Uuid,
  pub coach_id: Option<Uuid>,
  pub name: String,
  pub sport: String,
  pub category: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct RecordMatchResultPayload {
  pub opponent: String,
  pub match_date: NaiveDate,
  pub team_score: i32,
  pub opponent_score: i32,
  pub notes: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct TeamListQuery {
  pub school_id: Option<Uuid>,
}

#[instrument(name = "handler::list_teams", skip(app_state, query))]
pub async fn list_teams_handler(
  app_state: web::Data<AppState>,
  query: web::Query<TeamListQuery>,
) -> Result<HttpResponse, AppError> {
  let teams: Vec<Team> = sqlx::query_as(
    "SELECT * FROM teams WHERE ($1::uuid IS NULL OR school_id = $1) ORDER BY name",
  )
  .bind(query.school_id)
  .fetch_all(&app_state.db_pool)
  .await?;
  Ok(HttpResponse::Ok().json(teams))
}

#[instrument(
  name = "handler::create_team",
  skip(app_state, payload),
  fields(user_id = %user.user_id)
)]
pub async fn create_team_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  payload: web::Json<CreateTeamPayload>,
) -> Result<HttpResponse, AppError> {
  if payload.name.trim().is_empty() {
    return Err(AppError::Validation("Team name is required".to_string()));
  }

  let owner: Option<(Uuid,)> = sqlx::query_as("SELECT owner_id FROM schools WHERE id = $1")
    .bind(payload.school_id)
    .fetch_optional(&app_state.db_pool)
    .await?;
  let (owner_id,) =
    owner.ok_or_else(|| AppError::NotFound(format!("School {} not found", payload.school_id)))?;
  if owner_id != user.user_id {
    return Err(AppError::Auth("Only the school owner can create teams".to_string()));
  }

  let team: Team = sqlx::query_as(
    "INSERT INTO teams (id, school_id, coach_id, name, sport, category) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(payload.school_id)
  .bind(payload.coach_id)
  .bind(&payload.name)
  .bind(&payload.sport)
  .bind(&payload.category)
  .fetch_one(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Created().json(team))
}

#[instrument(name = "handler::list_match_results", skip(app_state))]
pub async fn list_match_results_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let team_id = path.into_inner();
  let results: Vec<MatchResult> =
    sqlx::query_as("SELECT * FROM match_results WHERE team_id = $1 ORDER BY match_date DESC")
      .bind(team_id)
      .fetch_all(&app_state.db_pool)
      .await?;
  Ok(HttpResponse::Ok().json(results))
}

#[instrument(
  name = "handler::record_match_result",
  skip(app_state, payload),
  fields(recorded_by = %user.user_id)
)]
pub async fn record_match_result_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  path: web::Path<Uuid>,
  payload: web::Json<RecordMatchResultPayload>,
) -> Result<HttpResponse, AppError> {
  let team_id = path.into_inner();

  if payload.team_score < 0 || payload.opponent_score < 0 {
    return Err(AppError::Validation("Scores cannot be negative".to_string()));
  }

  let team: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM teams WHERE id = $1")
    .bind(team_id)
    .fetch_optional(&app_state.db_pool)
    .await?;
  if team.is_none() {
    return Err(AppError::NotFound(format!("Team {} not found", team_id)));
  }

  let result: MatchResult = sqlx::query_as(
    "INSERT INTO match_results (id, team_id, opponent, match_date, team_score, opponent_score, notes, recorded_by) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(team_id)
  .bind(&payload.opponent)
  .bind(payload.match_date)
  .bind(payload.team_score)
  .bind(payload.opponent_score)
  .bind(&payload.notes)
  .bind(user.user_id)
  .fetch_one(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Created().json(result))
}
