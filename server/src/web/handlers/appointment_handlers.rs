// server/src/web/handlers/appointment_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::errors::AppError;
use crate::models::WellnessAppointment;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

/// Appointments the caller is involved in, either as the client or as the
/// wellness professional.
#[instrument(name = "handler::list_my_appointments", skip(app_state), fields(user_id = %user.user_id))]
pub async fn list_my_appointments_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let appointments: Vec<WellnessAppointment> = sqlx::query_as(
    "SELECT * FROM wellness_appointments \
     WHERE user_id = $1 OR professional_id = $1 \
     ORDER BY appointment_date, appointment_time",
  )
  .bind(user.user_id)
  .fetch_all(&app_state.db_pool)
  .await?;
  Ok(HttpResponse::Ok().json(appointments))
}
