// server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{User, UserRole};
use crate::services::auth_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct SignupRequestPayload {
  pub email: String,
  pub password: String,
  pub full_name: String,
  pub role: UserRole,
  pub phone: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

#[instrument(
  name = "handler::signup",
  skip(app_state, req_payload),
  fields(req_email = %req_payload.email)
)]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SignupRequestPayload>,
) -> Result<HttpResponse, AppError> {
  info!("Signup attempt for email: {}", req_payload.email);

  if req_payload.email.trim().is_empty() || !req_payload.email.contains('@') {
    return Err(AppError::Validation("A valid email address is required".to_string()));
  }
  if req_payload.password.len() < 8 {
    return Err(AppError::Validation(
      "Password must be at least 8 characters".to_string(),
    ));
  }

  let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
    .bind(&req_payload.email)
    .fetch_optional(&app_state.db_pool)
    .await?;
  if existing.is_some() {
    warn!("Signup rejected: email already registered.");
    return Err(AppError::Validation("Email is already registered".to_string()));
  }

  let password_hash = auth_service::hash_password(&req_payload.password)?;
  let (user_id,): (Uuid,) = sqlx::query_as(
    "INSERT INTO users (id, email, password_hash, full_name, role, phone) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
  )
  .bind(Uuid::new_v4())
  .bind(&req_payload.email)
  .bind(&password_hash)
  .bind(&req_payload.full_name)
  .bind(req_payload.role)
  .bind(&req_payload.phone)
  .fetch_one(&app_state.db_pool)
  .await?;

  let token = app_state.sessions.issue(user_id);
  info!("Signup successful for email: {}. User ID: {}", req_payload.email, user_id);

  Ok(HttpResponse::Created().json(json!({
    "userId": user_id.to_string(),
    "email": req_payload.email,
    "fullName": req_payload.full_name,
    "role": req_payload.role,
    "token": token,
  })))
}

#[instrument(
  name = "handler::signin",
  skip(app_state, req_payload),
  fields(req_email = %req_payload.email)
)]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  info!("Signin attempt for email: {}", req_payload.email);

  let row: Option<(Uuid, String, String, UserRole)> = sqlx::query_as(
    "SELECT id, password_hash, full_name, role FROM users WHERE email = $1",
  )
  .bind(&req_payload.email)
  .fetch_optional(&app_state.db_pool)
  .await?;

  let (user_id, password_hash, full_name, role) =
    row.ok_or_else(|| AppError::Auth("Invalid email or password".to_string()))?;

  if !auth_service::verify_password(&password_hash, &req_payload.password)? {
    warn!("Signin failed: password mismatch.");
    return Err(AppError::Auth("Invalid email or password".to_string()));
  }

  let token = app_state.sessions.issue(user_id);
  info!("Signin successful for email: {}. User ID: {}", req_payload.email, user_id);

  Ok(HttpResponse::Ok().json(json!({
    "userId": user_id.to_string(),
    "email": req_payload.email,
    "fullName": full_name,
    "role": role,
    "token": token,
  })))
}

#[instrument(name = "handler::me", skip(app_state), fields(user_id = %user.user_id))]
pub async fn me_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let account: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
    .bind(user.user_id)
    .fetch_optional(&app_state.db_pool)
    .await?;
  let account = account.ok_or_else(|| AppError::Auth("Account no longer exists".to_string()))?;
  Ok(HttpResponse::Ok().json(account))
}

#[instrument(name = "handler::signout", skip(app_state, req))]
pub async fn signout_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
) -> Result<HttpResponse, AppError> {
  if let Some(token) = req
    .headers()
    .get("Authorization")
    .and_then(|v| v.to_str().ok())
    .and_then(|h| h.strip_prefix("Bearer "))
  {
    app_state.sessions.revoke(token);
  }
  Ok(HttpResponse::Ok().json(json!({ "message": "Signed out." })))
}
