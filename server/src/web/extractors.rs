// server/src/web/extractors.rs

//! Request extractors. `AuthenticatedUser` resolves the `Authorization:
//! Bearer <token>` header against the in-process session store.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(resolve_bearer(req))
  }
}

fn resolve_bearer(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state missing".to_string()))?;

  let header = req
    .headers()
    .get("Authorization")
    .and_then(|v| v.to_str().ok())
    .ok_or_else(|| AppError::Auth("Missing Authorization header".to_string()))?;

  let token = header
    .strip_prefix("Bearer ")
    .ok_or_else(|| AppError::Auth("Authorization header must use the Bearer scheme".to_string()))?;

  let user_id = state
    .sessions
    .resolve(token)
    .ok_or_else(|| AppError::Auth("Invalid or expired session token".to_string()))?;

  Ok(AuthenticatedUser { user_id })
}
