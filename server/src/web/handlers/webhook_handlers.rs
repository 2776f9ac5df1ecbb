// server/src/web/handlers/webhook_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;

/// Accepts and logs a webhook from an external source. Nothing is acted on
/// yet; the endpoint exists so providers can be pointed at the platform.
#[instrument(name = "handler::generic_webhook", skip(payload))]
pub async fn generic_webhook_handler(
  path: web::Path<String>,
  payload: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
  let source = path.into_inner();
  info!(%source, payload = %payload.into_inner(), "Webhook received.");
  Ok(HttpResponse::Ok().json(json!({ "received": true, "source": source })))
}
