// server/src/web/handlers/event_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{EventRegistration, SportEvent};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CreateEventPayload {
  pub name: String,
  pub description: Option<String>,
  pub sport: String,
  pub event_date: NaiveDate,
  pub location: String,
  pub capacity: Option<i32>,
  #[serde(default)]
  pub entry_fee: i64,
}

#[instrument(name = "handler::list_events", skip(app_state))]
pub async fn list_events_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let events: Vec<SportEvent> =
    sqlx::query_as("SELECT * FROM sport_events WHERE event_date >= CURRENT_DATE ORDER BY event_date")
      .fetch_all(&app_state.db_pool)
      .await?;
  Ok(HttpResponse::Ok().json(events))
}

#[instrument(
  name = "handler::create_event",
  skip(app_state, payload),
  fields(organizer_id = %user.user_id)
)]
pub async fn create_event_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  payload: web::Json<CreateEventPayload>,
) -> Result<HttpResponse, AppError> {
  if payload.name.trim().is_empty() {
    return Err(AppError::Validation("Event name is required".to_string()));
  }
  if payload.entry_fee < 0 {
    return Err(AppError::Validation("Entry fee cannot be negative".to_string()));
  }

  let event: SportEvent = sqlx::query_as(
    "INSERT INTO sport_events (id, organizer_id, name, description, sport, event_date, location, capacity, entry_fee) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(user.user_id)
  .bind(&payload.name)
  .bind(&payload.description)
  .bind(&payload.sport)
  .bind(payload.event_date)
  .bind(&payload.location)
  .bind(payload.capacity)
  .bind(payload.entry_fee)
  .fetch_one(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Created().json(event))
}

#[instrument(name = "handler::register_for_event", skip(app_state), fields(user_id = %user.user_id))]
pub async fn register_for_event_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let event_id = path.into_inner();

  let row: Option<(Option<i32>, i64)> = sqlx::query_as(
    "SELECT e.capacity, \
            (SELECT COUNT(*) FROM event_registrations r WHERE r.event_id = e.id) \
       FROM sport_events e WHERE e.id = $1",
  )
  .bind(event_id)
  .fetch_optional(&app_state.db_pool)
  .await?;
  let (capacity, registered) =
    row.ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

  if let Some(capacity) = capacity {
    if registered >= i64::from(capacity) {
      return Err(AppError::Validation("Event is at capacity".to_string()));
    }
  }

  let existing: Option<(Uuid,)> =
    sqlx::query_as("SELECT id FROM event_registrations WHERE event_id = $1 AND user_id = $2")
      .bind(event_id)
      .bind(user.user_id)
      .fetch_optional(&app_state.db_pool)
      .await?;
  if existing.is_some() {
    return Err(AppError::Validation("Already registered for this event".to_string()));
  }

  let registration: EventRegistration = sqlx::query_as(
    "INSERT INTO event_registrations (id, event_id, user_id) VALUES ($1, $2, $3) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(event_id)
  .bind(user.user_id)
  .fetch_one(&app_state.db_pool)
  .await?;

  info!(registration_id = %registration.id, "Registered for event.");
  Ok(HttpResponse::Created().json(registration))
}
