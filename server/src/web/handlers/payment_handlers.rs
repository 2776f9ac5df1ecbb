// server/src/web/handlers/payment_handlers.rs

//! Payment history endpoints. Ids prefixed with `demo_` or belonging to
//! the demo domain are served synthetic data so the payments screens can
//! be exercised without real transactions.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::{PaymentRecord, Subscription, Transaction};
use crate::services::receipt::{render_receipt, ReceiptData, ReceiptLine};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

fn is_demo_id(id: &str) -> bool {
  id.starts_with("demo_") || id.ends_with("@demo.sportmaps.com")
}

fn demo_transactions(student_id: &str) -> serde_json::Value {
  json!([
    {
      "id": "demo_txn_1",
      "student_id": student_id,
      "amount": 150_000,
      "concept": "Inscripción: Fútbol Infantil",
      "status": "approved",
      "reference": "REF4D2K91",
      "authorization_code": "AUTH7B2D",
      "payment_method": "card",
      "created_at": Utc::now(),
    },
    {
      "id": "demo_txn_2",
      "student_id": student_id,
      "amount": 80_000,
      "concept": "Mensualidad: Natación",
      "status": "approved",
      "reference": "REF8A3F02",
      "authorization_code": "AUTH1C9E",
      "payment_method": "pse",
      "created_at": Utc::now(),
    }
  ])
}

fn demo_subscriptions(student_id: &str) -> serde_json::Value {
  json!([
    {
      "id": "demo_sub_1",
      "student_id": student_id,
      "amount": 80_000,
      "concept": "Mensualidad: Natación",
      "status": "active",
      "next_billing_date": Utc::now(),
      "created_at": Utc::now(),
    }
  ])
}

/// The caller's rows in the payments ledger, newest first.
#[instrument(name = "handler::list_my_payments", skip(app_state), fields(user_id = %user.user_id))]
pub async fn list_my_payments_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let payments: Vec<PaymentRecord> =
    sqlx::query_as("SELECT * FROM payments WHERE parent_id = $1 ORDER BY created_at DESC")
      .bind(user.user_id)
      .fetch_all(&app_state.db_pool)
      .await?;
  Ok(HttpResponse::Ok().json(payments))
}

#[instrument(name = "handler::list_transactions", skip(app_state))]
pub async fn list_transactions_handler(
  app_state: web::Data<AppState>,
  _user: AuthenticatedUser,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let student_id = path.into_inner();
  if is_demo_id(&student_id) {
    info!("Serving demo transactions.");
    return Ok(HttpResponse::Ok().json(demo_transactions(&student_id)));
  }

  let transactions: Vec<Transaction> =
    sqlx::query_as("SELECT * FROM transactions WHERE student_id = $1 ORDER BY created_at DESC")
      .bind(&student_id)
      .fetch_all(&app_state.db_pool)
      .await?;
  Ok(HttpResponse::Ok().json(transactions))
}

#[instrument(name = "handler::list_subscriptions", skip(app_state))]
pub async fn list_subscriptions_handler(
  app_state: web::Data<AppState>,
  _user: AuthenticatedUser,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let student_id = path.into_inner();
  if is_demo_id(&student_id) {
    info!("Serving demo subscriptions.");
    return Ok(HttpResponse::Ok().json(demo_subscriptions(&student_id)));
  }

  let subscriptions: Vec<Subscription> =
    sqlx::query_as("SELECT * FROM subscriptions WHERE student_id = $1 ORDER BY created_at DESC")
      .bind(&student_id)
      .fetch_all(&app_state.db_pool)
      .await?;
  Ok(HttpResponse::Ok().json(subscriptions))
}

#[instrument(name = "handler::cancel_subscription", skip(app_state))]
pub async fn cancel_subscription_handler(
  app_state: web::Data<AppState>,
  _user: AuthenticatedUser,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let subscription_id = path.into_inner();
  if is_demo_id(&subscription_id) || subscription_id.starts_with("demo_sub") {
    info!("Demo subscription cancellation acknowledged.");
    return Ok(HttpResponse::Ok().json(json!({
      "message": "Subscription cancelled.",
      "subscriptionId": subscription_id,
    })));
  }

  let updated = sqlx::query(
    "UPDATE subscriptions SET status = 'cancelled' WHERE id = $1 AND status = 'active'",
  )
  .bind(&subscription_id)
  .execute(&app_state.db_pool)
  .await?;
  if updated.rows_affected() == 0 {
    return Err(AppError::NotFound(format!(
      "Active subscription {} not found",
      subscription_id
    )));
  }

  Ok(HttpResponse::Ok().json(json!({
    "message": "Subscription cancelled.",
    "subscriptionId": subscription_id,
  })))
}

/// Reconstructs the plain-text receipt document from the payments ledger.
#[instrument(name = "handler::get_receipt", skip(app_state))]
pub async fn get_receipt_handler(
  app_state: web::Data<AppState>,
  _user: AuthenticatedUser,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let receipt_number = path.into_inner();

  let rows: Vec<(String, i64, String)> = sqlx::query_as(
    "SELECT p.concept, p.amount, u.full_name \
       FROM payments p JOIN users u ON u.id = p.parent_id \
      WHERE p.receipt_number = $1 ORDER BY p.created_at",
  )
  .bind(&receipt_number)
  .fetch_all(&app_state.db_pool)
  .await?;
  if rows.is_empty() {
    return Err(AppError::NotFound(format!(
      "Receipt {} not found",
      receipt_number
    )));
  }

  let buyer_name = rows[0].2.clone();
  let total: i64 = rows.iter().map(|(_, amount, _)| amount).sum();
  let data = ReceiptData {
    receipt_number,
    buyer_name,
    lines: rows
      .into_iter()
      .map(|(concept, amount, _)| ReceiptLine {
        name: concept,
        quantity: 1,
        unit_price: amount,
      })
      .collect(),
    total,
    currency: app_state.config.currency_code.clone(),
    payment_reference: None,
  };

  Ok(
    HttpResponse::Ok()
      .content_type("text/plain; charset=utf-8")
      .body(render_receipt(&data)),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn demo_ids_are_detected() {
    assert!(is_demo_id("demo_student_1"));
    assert!(is_demo_id("ana@demo.sportmaps.com"));
    assert!(!is_demo_id("7d0f3d52-4a7e-4b52-bd21-9a2f6b6a1c01"));
    assert!(!is_demo_id("ana@example.com"));
  }
}
