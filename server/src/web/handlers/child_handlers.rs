// server/src/web/handlers/child_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Child;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CreateChildPayload {
  pub full_name: String,
  pub birth_date: NaiveDate,
  pub sport: Option<String>,
  pub notes: Option<String>,
}

#[instrument(name = "handler::list_children", skip(app_state), fields(parent_id = %user.user_id))]
pub async fn list_children_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let children: Vec<Child> =
    sqlx::query_as("SELECT * FROM children WHERE parent_id = $1 ORDER BY full_name")
      .bind(user.user_id)
      .fetch_all(&app_state.db_pool)
      .await?;
  Ok(HttpResponse::Ok().json(children))
}

#[instrument(
  name = "handler::create_child",
  skip(app_state, payload),
  fields(parent_id = %user.user_id)
)]
pub async fn create_child_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  payload: web::Json<CreateChildPayload>,
) -> Result<HttpResponse, AppError> {
  if payload.full_name.trim().is_empty() {
    return Err(AppError::Validation("Child name is required".to_string()));
  }

  let child: Child = sqlx::query_as(
    "INSERT INTO children (id, parent_id, full_name, birth_date, sport, notes) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(user.user_id)
  .bind(&payload.full_name)
  .bind(payload.birth_date)
  .bind(&payload.sport)
  .bind(&payload.notes)
  .fetch_one(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Created().json(child))
}
