// server/src/web/handlers/school_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::School;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CreateSchoolPayload {
  pub name: String,
  pub description: Option<String>,
  pub city: String,
  pub sport: String,
}

#[derive(Deserialize, Debug)]
pub struct SchoolListQuery {
  pub city: Option<String>,
  pub sport: Option<String>,
}

#[instrument(name = "handler::list_schools", skip(app_state, query))]
pub async fn list_schools_handler(
  app_state: web::Data<AppState>,
  query: web::Query<SchoolListQuery>,
) -> Result<HttpResponse, AppError> {
  let schools: Vec<School> = sqlx::query_as(
    "SELECT * FROM schools \
     WHERE ($1::text IS NULL OR city = $1) AND ($2::text IS NULL OR sport = $2) \
     ORDER BY name",
  )
  .bind(&query.city)
  .bind(&query.sport)
  .fetch_all(&app_state.db_pool)
  .await?;
  Ok(HttpResponse::Ok().json(schools))
}

#[instrument(name = "handler::get_school", skip(app_state))]
pub async fn get_school_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let school_id = path.into_inner();
  let school: Option<School> = sqlx::query_as("SELECT * FROM schools WHERE id = $1")
    .bind(school_id)
    .fetch_optional(&app_state.db_pool)
    .await?;
  let school = school.ok_or_else(|| AppError::NotFound(format!("School {} not found", school_id)))?;
  Ok(HttpResponse::Ok().json(school))
}

#[instrument(
  name = "handler::create_school",
  skip(app_state, payload),
  fields(owner_id = %user.user_id)
)]
pub async fn create_school_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  payload: web::Json<CreateSchoolPayload>,
) -> Result<HttpResponse, AppError> {
  if payload.name.trim().is_empty() {
    return Err(AppError::Validation("School name is required".to_string()));
  }

  let school: School = sqlx::query_as(
    "INSERT INTO schools (id, owner_id, name, description, city, sport) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(user.user_id)
  .bind(&payload.name)
  .bind(&payload.description)
  .bind(&payload.city)
  .bind(&payload.sport)
  .fetch_one(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Created().json(school))
}
