// server/src/web/handlers/attendance_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{AttendanceRecord, AttendanceStatus};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct RecordAttendancePayload {
  pub program_id: Uuid,
  pub student_id: Uuid,
  pub session_date: NaiveDate,
  pub status: AttendanceStatus,
}

#[instrument(
  name = "handler::record_attendance",
  skip(app_state, payload),
  fields(recorded_by = %user.user_id)
)]
pub async fn record_attendance_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  payload: web::Json<RecordAttendancePayload>,
) -> Result<HttpResponse, AppError> {
  // The student must hold an active enrollment in the program.
  let enrolled: Option<(Uuid,)> = sqlx::query_as(
    "SELECT id FROM enrollments WHERE program_id = $1 AND user_id = $2 AND status = 'active'",
  )
  .bind(payload.program_id)
  .bind(payload.student_id)
  .fetch_optional(&app_state.db_pool)
  .await?;
  if enrolled.is_none() {
    return Err(AppError::Validation(
      "Student is not actively enrolled in this program".to_string(),
    ));
  }

  // One mark per student per session; a second write replaces the first.
  let record: AttendanceRecord = sqlx::query_as(
    "INSERT INTO attendance_records (id, program_id, student_id, session_date, status, recorded_by) \
     VALUES ($1, $2, $3, $4, $5, $6) \
     ON CONFLICT (program_id, student_id, session_date) \
     DO UPDATE SET status = EXCLUDED.status, recorded_by = EXCLUDED.recorded_by \
     RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(payload.program_id)
  .bind(payload.student_id)
  .bind(payload.session_date)
  .bind(payload.status)
  .bind(user.user_id)
  .fetch_one(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Created().json(record))
}

#[derive(Deserialize, Debug)]
pub struct AttendanceListQuery {
  pub session_date: Option<NaiveDate>,
}

#[instrument(name = "handler::list_program_attendance", skip(app_state, query))]
pub async fn list_program_attendance_handler(
  app_state: web::Data<AppState>,
  _user: AuthenticatedUser,
  path: web::Path<Uuid>,
  query: web::Query<AttendanceListQuery>,
) -> Result<HttpResponse, AppError> {
  let program_id = path.into_inner();
  let records: Vec<AttendanceRecord> = sqlx::query_as(
    "SELECT * FROM attendance_records \
     WHERE program_id = $1 AND ($2::date IS NULL OR session_date = $2) \
     ORDER BY session_date DESC, created_at DESC",
  )
  .bind(program_id)
  .bind(query.session_date)
  .fetch_all(&app_state.db_pool)
  .await?;
  Ok(HttpResponse::Ok().json(records))
}
