// server/src/web/handlers/notification_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Notification;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::list_notifications", skip(app_state), fields(user_id = %user.user_id))]
pub async fn list_notifications_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let notifications: Vec<Notification> =
    sqlx::query_as("SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC")
      .bind(user.user_id)
      .fetch_all(&app_state.db_pool)
      .await?;
  Ok(HttpResponse::Ok().json(notifications))
}

#[instrument(name = "handler::mark_notification_read", skip(app_state), fields(user_id = %user.user_id))]
pub async fn mark_read_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let notification_id = path.into_inner();
  let updated = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2")
    .bind(notification_id)
    .bind(user.user_id)
    .execute(&app_state.db_pool)
    .await?;
  if updated.rows_affected() == 0 {
    return Err(AppError::NotFound(format!(
      "Notification {} not found",
      notification_id
    )));
  }
  Ok(HttpResponse::Ok().json(json!({ "message": "Notification marked as read." })))
}
