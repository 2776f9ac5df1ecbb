// server/src/db/mod.rs

//! Persistence seam used by the checkout saga. Each write has a matching
//! delete/restore so the saga can undo the exact rows it created.

pub mod postgres;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::errors::Result;

pub use postgres::PgStore;

#[derive(Debug, Clone)]
pub struct UserContact {
  pub email: String,
  pub full_name: String,
}

#[async_trait]
pub trait CheckoutStore: Send + Sync {
  // Reads used by validation and record creation.
  async fn program_capacity_remaining(&self, program_id: Uuid) -> Result<i64>;
  async fn program_start_date(&self, program_id: Uuid) -> Result<Option<NaiveDate>>;
  async fn product_stock(&self, product_id: Uuid) -> Result<i64>;
  async fn school_owner(&self, school_id: Uuid) -> Result<Uuid>;
  async fn user_contact(&self, user_id: Uuid) -> Result<UserContact>;

  // Writes, each with its inverse.
  async fn insert_enrollment(&self, user_id: Uuid, program_id: Uuid, start_date: NaiveDate) -> Result<Uuid>;
  async fn delete_enrollment(&self, id: Uuid) -> Result<()>;

  async fn insert_payment(
    &self,
    parent_id: Uuid,
    amount: i64,
    concept: &str,
    receipt_number: &str,
  ) -> Result<Uuid>;
  async fn delete_payment(&self, id: Uuid) -> Result<()>;

  async fn insert_order(
    &self,
    user_id: Uuid,
    items: serde_json::Value,
    total: i64,
  ) -> Result<Uuid>;
  async fn delete_order(&self, id: Uuid) -> Result<()>;

  /// Decrements stock only if at least `quantity` units remain; fails with
  /// the remaining count otherwise.
  async fn decrement_stock(&self, product_id: Uuid, quantity: i32) -> Result<()>;
  async fn restore_stock(&self, product_id: Uuid, quantity: i32) -> Result<()>;

  async fn insert_appointment(
    &self,
    user_id: Uuid,
    professional_id: Uuid,
    appointment_date: NaiveDate,
    appointment_time: NaiveTime,
    service_type: &str,
  ) -> Result<Uuid>;
  async fn delete_appointment(&self, id: Uuid) -> Result<()>;

  async fn insert_notification(&self, user_id: Uuid, title: &str, message: &str, kind: &str) -> Result<Uuid>;
  async fn delete_notification(&self, id: Uuid) -> Result<()>;

  async fn insert_calendar_event(&self, user_id: Uuid, title: &str, event_date: NaiveDate) -> Result<Uuid>;
  async fn delete_calendar_event(&self, id: Uuid) -> Result<()>;
}
