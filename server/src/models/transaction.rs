// server/src/models/transaction.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "transaction_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
  Approved,
  Declined,
  Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "subscription_status_enum", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
  Active,
  Cancelled,
  PastDue,
}

/// A processed gateway transaction. Student ids are stored as text so the
/// demo mode's synthetic ids ("demo_...") coexist with real UUIDs.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Transaction {
  pub id: String,
  pub student_id: String,
  /// Whole COP pesos.
  pub amount: i64,
  pub concept: String,
  pub status: TransactionStatus,
  pub reference: String,
  pub authorization_code: String,
  pub payment_method: String,
  pub created_at: DateTime<Utc>,
}

/// A recurring billing agreement for a student.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Subscription {
  pub id: String,
  pub student_id: String,
  /// Whole COP pesos charged each cycle.
  pub amount: i64,
  pub concept: String,
  pub status: SubscriptionStatus,
  pub next_billing_date: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
}
