// server/src/web/handlers/enrollment_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::errors::AppError;
use crate::models::Enrollment;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::list_my_enrollments", skip(app_state), fields(user_id = %user.user_id))]
pub async fn list_my_enrollments_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let enrollments: Vec<Enrollment> =
    sqlx::query_as("SELECT * FROM enrollments WHERE user_id = $1 ORDER BY created_at DESC")
      .bind(user.user_id)
      .fetch_all(&app_state.db_pool)
      .await?;
  Ok(HttpResponse::Ok().json(enrollments))
}
