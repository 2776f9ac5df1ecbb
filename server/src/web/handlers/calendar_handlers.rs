// server/src/web/handlers/calendar_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::errors::AppError;
use crate::models::CalendarEvent;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::list_calendar", skip(app_state), fields(user_id = %user.user_id))]
pub async fn list_calendar_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let events: Vec<CalendarEvent> =
    sqlx::query_as("SELECT * FROM calendar_events WHERE user_id = $1 ORDER BY event_date")
      .bind(user.user_id)
      .fetch_all(&app_state.db_pool)
      .await?;
  Ok(HttpResponse::Ok().json(events))
}
