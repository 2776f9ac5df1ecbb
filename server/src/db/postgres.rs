// server/src/db/postgres.rs

//! `CheckoutStore` backed by Postgres. All queries are runtime-checked;
//! inserts return the generated id so the saga can target its undo.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::db::{CheckoutStore, UserContact};
use crate::errors::{AppError, Result};

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CheckoutStore for PgStore {
  #[instrument(skip(self), err(Display))]
  async fn program_capacity_remaining(&self, program_id: Uuid) -> Result<i64> {
    let row: Option<(i32, i64)> = sqlx::query_as(
      "SELECT p.capacity, \
              (SELECT COUNT(*) FROM enrollments e \
                WHERE e.program_id = p.id AND e.status = 'active') \
         FROM programs p WHERE p.id = $1",
    )
    .bind(program_id)
    .fetch_optional(&self.pool)
    .await?;
    let (capacity, enrolled) =
      row.ok_or_else(|| AppError::NotFound(format!("Program {} not found", program_id)))?;
    Ok(i64::from(capacity) - enrolled)
  }

  #[instrument(skip(self), err(Display))]
  async fn program_start_date(&self, program_id: Uuid) -> Result<Option<NaiveDate>> {
    let row: Option<(Option<NaiveDate>,)> =
      sqlx::query_as("SELECT start_date FROM programs WHERE id = $1")
        .bind(program_id)
        .fetch_optional(&self.pool)
        .await?;
    let (start_date,) =
      row.ok_or_else(|| AppError::NotFound(format!("Program {} not found", program_id)))?;
    Ok(start_date)
  }

  #[instrument(skip(self), err(Display))]
  async fn product_stock(&self, product_id: Uuid) -> Result<i64> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT stock FROM products WHERE id = $1")
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await?;
    let (stock,) =
      row.ok_or_else(|| AppError::NotFound(format!("Product {} not found", product_id)))?;
    Ok(i64::from(stock))
  }

  #[instrument(skip(self), err(Display))]
  async fn school_owner(&self, school_id: Uuid) -> Result<Uuid> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT owner_id FROM schools WHERE id = $1")
      .bind(school_id)
      .fetch_optional(&self.pool)
      .await?;
    let (owner_id,) =
      row.ok_or_else(|| AppError::NotFound(format!("School {} not found", school_id)))?;
    Ok(owner_id)
  }

  #[instrument(skip(self), err(Display))]
  async fn user_contact(&self, user_id: Uuid) -> Result<UserContact> {
    let row: Option<(String, String)> =
      sqlx::query_as("SELECT email, full_name FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
    let (email, full_name) =
      row.ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
    Ok(UserContact { email, full_name })
  }

  #[instrument(skip(self), err(Display))]
  async fn insert_enrollment(&self, user_id: Uuid, program_id: Uuid, start_date: NaiveDate) -> Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
      "INSERT INTO enrollments (id, user_id, program_id, status, start_date) \
       VALUES ($1, $2, $3, 'active', $4) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(program_id)
    .bind(start_date)
    .fetch_one(&self.pool)
    .await?;
    Ok(id)
  }

  #[instrument(skip(self), err(Display))]
  async fn delete_enrollment(&self, id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM enrollments WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  #[instrument(skip(self, concept), err(Display))]
  async fn insert_payment(
    &self,
    parent_id: Uuid,
    amount: i64,
    concept: &str,
    receipt_number: &str,
  ) -> Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
      "INSERT INTO payments \
         (id, parent_id, amount, concept, status, payment_date, due_date, receipt_number, payment_type) \
       VALUES ($1, $2, $3, $4, 'paid', $5, $6, $7, 'one_time') RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(parent_id)
    .bind(amount)
    .bind(concept)
    .bind(Utc::now())
    .bind(Utc::now().date_naive())
    .bind(receipt_number)
    .fetch_one(&self.pool)
    .await?;
    Ok(id)
  }

  #[instrument(skip(self), err(Display))]
  async fn delete_payment(&self, id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM payments WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  #[instrument(skip(self, items), err(Display))]
  async fn insert_order(&self, user_id: Uuid, items: serde_json::Value, total: i64) -> Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
      "INSERT INTO orders (id, user_id, items, total, status, shipping_address) \
       VALUES ($1, $2, $3, $4, 'pending', '{}'::jsonb) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(items)
    .bind(total)
    .fetch_one(&self.pool)
    .await?;
    Ok(id)
  }

  #[instrument(skip(self), err(Display))]
  async fn delete_order(&self, id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM orders WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  #[instrument(skip(self), err(Display))]
  async fn decrement_stock(&self, product_id: Uuid, quantity: i32) -> Result<()> {
    let updated = sqlx::query(
      "UPDATE products SET stock = stock - $2, updated_at = NOW() \
       WHERE id = $1 AND stock >= $2",
    )
    .bind(product_id)
    .bind(quantity)
    .execute(&self.pool)
    .await?;
    if updated.rows_affected() == 0 {
      let available = self.product_stock(product_id).await.unwrap_or(0);
      return Err(AppError::InsufficientStock { available });
    }
    Ok(())
  }

  #[instrument(skip(self), err(Display))]
  async fn restore_stock(&self, product_id: Uuid, quantity: i32) -> Result<()> {
    sqlx::query("UPDATE products SET stock = stock + $2, updated_at = NOW() WHERE id = $1")
      .bind(product_id)
      .bind(quantity)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  #[instrument(skip(self, service_type), err(Display))]
  async fn insert_appointment(
    &self,
    user_id: Uuid,
    professional_id: Uuid,
    appointment_date: NaiveDate,
    appointment_time: NaiveTime,
    service_type: &str,
  ) -> Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
      "INSERT INTO wellness_appointments \
         (id, user_id, professional_id, service_type, appointment_date, appointment_time, status) \
       VALUES ($1, $2, $3, $4, $5, $6, 'scheduled') RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(professional_id)
    .bind(service_type)
    .bind(appointment_date)
    .bind(appointment_time)
    .fetch_one(&self.pool)
    .await?;
    Ok(id)
  }

  #[instrument(skip(self), err(Display))]
  async fn delete_appointment(&self, id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM wellness_appointments WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  #[instrument(skip(self, title, message, kind), err(Display))]
  async fn insert_notification(&self, user_id: Uuid, title: &str, message: &str, kind: &str) -> Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
      "INSERT INTO notifications (id, user_id, title, message, type, read) \
       VALUES ($1, $2, $3, $4, $5, FALSE) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(title)
    .bind(message)
    .bind(kind)
    .fetch_one(&self.pool)
    .await?;
    Ok(id)
  }

  #[instrument(skip(self), err(Display))]
  async fn delete_notification(&self, id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM notifications WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  #[instrument(skip(self, title), err(Display))]
  async fn insert_calendar_event(&self, user_id: Uuid, title: &str, event_date: NaiveDate) -> Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
      "INSERT INTO calendar_events (id, user_id, title, event_date) \
       VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(title)
    .bind(event_date)
    .fetch_one(&self.pool)
    .await?;
    Ok(id)
  }

  #[instrument(skip(self), err(Display))]
  async fn delete_calendar_event(&self, id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM calendar_events WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }
}
