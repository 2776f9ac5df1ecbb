// server/src/models/payment.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "payment_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
  Pending,
  Paid,
  Failed,
  Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "payment_type_enum", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
  OneTime,
  Subscription,
}

/// A payment ledger row as shown on the payments page. Created for each
/// enrollment line at checkout; `receipt_number` ties rows of one purchase
/// together.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PaymentRecord {
  pub id: Uuid,
  pub parent_id: Uuid,
  /// Whole COP pesos.
  pub amount: i64,
  pub concept: String,
  pub status: PaymentStatus,
  pub payment_date: Option<DateTime<Utc>>,
  pub due_date: NaiveDate,
  pub receipt_number: Option<String>,
  pub payment_type: PaymentType,
  pub created_at: DateTime<Utc>,
}
