// server/src/web/handlers/program_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Program, ProgramLevel, ProgramStatus};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CreateProgramPayload {
  pub school_id: Uuid,
  pub coach_id: Option<Uuid>,
  pub name: String,
  pub description: Option<String>,
  pub sport: String,
  pub level: ProgramLevel,
  pub capacity: i32,
  pub price: i64,
  pub location: Option<String>,
  pub start_date: Option<NaiveDate>,
  pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateProgramPayload {
  pub name: Option<String>,
  pub description: Option<String>,
  pub level: Option<ProgramLevel>,
  pub capacity: Option<i32>,
  pub price: Option<i64>,
  pub status: Option<ProgramStatus>,
  pub location: Option<String>,
  pub start_date: Option<NaiveDate>,
  pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize, Debug)]
pub struct ProgramListQuery {
  pub school_id: Option<Uuid>,
  pub sport: Option<String>,
  pub level: Option<ProgramLevel>,
  pub status: Option<ProgramStatus>,
  /// Case-insensitive substring match on the program name.
  pub search: Option<String>,
  pub limit: Option<i64>,
  pub offset: Option<i64>,
}

#[instrument(name = "handler::list_programs", skip(app_state, query))]
pub async fn list_programs_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ProgramListQuery>,
) -> Result<HttpResponse, AppError> {
  let limit = query.limit.unwrap_or(50).clamp(1, 200);
  let offset = query.offset.unwrap_or(0).max(0);

  let programs: Vec<Program> = sqlx::query_as(
    "SELECT * FROM programs \
     WHERE status = COALESCE($4, 'active'::program_status_enum) \
       AND ($1::uuid IS NULL OR school_id = $1) \
       AND ($2::text IS NULL OR sport = $2) \
       AND ($3::program_level_enum IS NULL OR level = $3) \
       AND ($5::text IS NULL OR name ILIKE '%' || $5 || '%') \
     ORDER BY created_at DESC \
     LIMIT $6 OFFSET $7",
  )
  .bind(query.school_id)
  .bind(&query.sport)
  .bind(query.level)
  .bind(query.status)
  .bind(&query.search)
  .bind(limit)
  .bind(offset)
  .fetch_all(&app_state.db_pool)
  .await?;
  Ok(HttpResponse::Ok().json(programs))
}

#[instrument(name = "handler::list_school_programs", skip(app_state))]
pub async fn list_school_programs_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let school_id = path.into_inner();
  let programs: Vec<Program> =
    sqlx::query_as("SELECT * FROM programs WHERE school_id = $1 ORDER BY created_at DESC")
      .bind(school_id)
      .fetch_all(&app_state.db_pool)
      .await?;
  Ok(HttpResponse::Ok().json(programs))
}

#[instrument(name = "handler::get_program", skip(app_state))]
pub async fn get_program_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let program_id = path.into_inner();
  let program: Option<Program> = sqlx::query_as("SELECT * FROM programs WHERE id = $1")
    .bind(program_id)
    .fetch_optional(&app_state.db_pool)
    .await?;
  let program =
    program.ok_or_else(|| AppError::NotFound(format!("Program {} not found", program_id)))?;

  let (enrolled,): (i64,) = sqlx::query_as(
    "SELECT COUNT(*) FROM enrollments WHERE program_id = $1 AND status = 'active'",
  )
  .bind(program_id)
  .fetch_one(&app_state.db_pool)
  .await?;

  let mut body = serde_json::to_value(&program)
    .map_err(|e| AppError::Internal(format!("Failed to serialize program: {}", e)))?;
  if let Some(map) = body.as_object_mut() {
    map.insert("enrolledCount".to_string(), serde_json::json!(enrolled));
    map.insert(
      "spotsRemaining".to_string(),
      serde_json::json!(i64::from(program.capacity) - enrolled),
    );
  }
  Ok(HttpResponse::Ok().json(body))
}

#[instrument(
  name = "handler::create_program",
  skip(app_state, payload),
  fields(user_id = %user.user_id, school_id = %payload.school_id)
)]
pub async fn create_program_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  payload: web::Json<CreateProgramPayload>,
) -> Result<HttpResponse, AppError> {
  if payload.name.trim().is_empty() {
    return Err(AppError::Validation("Program name is required".to_string()));
  }
  if payload.capacity < 1 {
    return Err(AppError::Validation("Capacity must be at least 1".to_string()));
  }
  if payload.price < 0 {
    return Err(AppError::Validation("Price cannot be negative".to_string()));
  }

  // Only the school's owner may add programs to it.
  let owner: Option<(Uuid,)> = sqlx::query_as("SELECT owner_id FROM schools WHERE id = $1")
    .bind(payload.school_id)
    .fetch_optional(&app_state.db_pool)
    .await?;
  let (owner_id,) =
    owner.ok_or_else(|| AppError::NotFound(format!("School {} not found", payload.school_id)))?;
  if owner_id != user.user_id {
    return Err(AppError::Auth("Only the school owner can create programs".to_string()));
  }

  let program: Program = sqlx::query_as(
    "INSERT INTO programs \
       (id, school_id, coach_id, name, description, sport, level, capacity, price, status, location, start_date, end_date) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'active', $10, $11, $12) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(payload.school_id)
  .bind(payload.coach_id)
  .bind(&payload.name)
  .bind(&payload.description)
  .bind(&payload.sport)
  .bind(payload.level)
  .bind(payload.capacity)
  .bind(payload.price)
  .bind(&payload.location)
  .bind(payload.start_date)
  .bind(payload.end_date)
  .fetch_one(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Created().json(program))
}

#[instrument(
  name = "handler::update_program",
  skip(app_state, payload),
  fields(user_id = %user.user_id)
)]
pub async fn update_program_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateProgramPayload>,
) -> Result<HttpResponse, AppError> {
  let program_id = path.into_inner();

  let owner: Option<(Uuid,)> = sqlx::query_as(
    "SELECT s.owner_id FROM programs p JOIN schools s ON s.id = p.school_id WHERE p.id = $1",
  )
  .bind(program_id)
  .fetch_optional(&app_state.db_pool)
  .await?;
  let (owner_id,) =
    owner.ok_or_else(|| AppError::NotFound(format!("Program {} not found", program_id)))?;
  if owner_id != user.user_id {
    return Err(AppError::Auth("Only the school owner can update this program".to_string()));
  }

  if let Some(capacity) = payload.capacity {
    if capacity < 1 {
      return Err(AppError::Validation("Capacity must be at least 1".to_string()));
    }
  }

  let program: Program = sqlx::query_as(
    "UPDATE programs SET \
       name = COALESCE($2, name), \
       description = COALESCE($3, description), \
       level = COALESCE($4, level), \
       capacity = COALESCE($5, capacity), \
       price = COALESCE($6, price), \
       status = COALESCE($7, status), \
       location = COALESCE($8, location), \
       start_date = COALESCE($9, start_date), \
       end_date = COALESCE($10, end_date), \
       updated_at = NOW() \
     WHERE id = $1 RETURNING *",
  )
  .bind(program_id)
  .bind(&payload.name)
  .bind(&payload.description)
  .bind(payload.level)
  .bind(payload.capacity)
  .bind(payload.price)
  .bind(payload.status)
  .bind(&payload.location)
  .bind(payload.start_date)
  .bind(payload.end_date)
  .fetch_one(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(program))
}
