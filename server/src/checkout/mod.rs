// server/src/checkout/mod.rs

//! Checkout as a compensating saga. Payment is authorized first, then the
//! per-line fan-out (enrollments, orders, appointments, payments ledger,
//! calendar, notifications) runs as saga steps; if a required step fails,
//! every record created so far is removed in reverse order and the caller
//! sees a single error.

use std::sync::Arc;

use chrono::Utc;
use saga::{ContextData, Saga, StepControl};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cart::{Cart, CartLineKind};
use crate::db::{CheckoutStore, UserContact};
use crate::errors::AppError;
use crate::services::payment_gateway::{MockPaymentGateway, PaymentAuthorization, PaymentMethod};
use crate::services::receipt;

/// Shared state threaded through the checkout steps.
pub struct CheckoutCtx {
  pub store: Arc<dyn CheckoutStore>,
  pub gateway: MockPaymentGateway,

  pub buyer_id: Uuid,
  pub cart: Cart,
  pub payment_method: PaymentMethod,
  pub simulate_failure: bool,
  pub receipt_prefix: String,

  // Filled in as steps complete.
  pub buyer_contact: Option<UserContact>,
  pub receipt_number: Option<String>,
  pub authorization: Option<PaymentAuthorization>,

  // Undo bookkeeping. Each list holds ids created by this run only.
  pub created_enrollments: Vec<Uuid>,
  pub created_payments: Vec<Uuid>,
  pub created_orders: Vec<Uuid>,
  pub created_appointments: Vec<Uuid>,
  pub created_calendar_events: Vec<Uuid>,
  pub stock_decrements: Vec<(Uuid, i32)>,
  pub counterparty_notifications: Vec<Uuid>,
  pub buyer_notifications: Vec<Uuid>,
}

impl CheckoutCtx {
  pub fn new(
    store: Arc<dyn CheckoutStore>,
    gateway: MockPaymentGateway,
    buyer_id: Uuid,
    cart: Cart,
    payment_method: PaymentMethod,
    simulate_failure: bool,
    receipt_prefix: impl Into<String>,
  ) -> Self {
    Self {
      store,
      gateway,
      buyer_id,
      cart,
      payment_method,
      simulate_failure,
      receipt_prefix: receipt_prefix.into(),
      buyer_contact: None,
      receipt_number: None,
      authorization: None,
      created_enrollments: Vec::new(),
      created_payments: Vec::new(),
      created_orders: Vec::new(),
      created_appointments: Vec::new(),
      created_calendar_events: Vec::new(),
      stock_decrements: Vec::new(),
      counterparty_notifications: Vec::new(),
      buyer_notifications: Vec::new(),
    }
  }
}

/// Builds the checkout saga. The buyer confirmation step is optional: a
/// purchase does not fail because its "Compra Exitosa" note could not be
/// written.
pub fn build_checkout_saga() -> Saga<CheckoutCtx, AppError> {
  let mut s = Saga::<CheckoutCtx, AppError>::new(&[
    ("validate_cart", false, None),
    ("authorize_payment", false, None),
    ("create_records", false, None),
    ("notify_counterparties", false, None),
    ("notify_buyer", true, None),
  ]);

  s.on_step("validate_cart", |ctx: ContextData<CheckoutCtx>| async move {
    let (store, is_empty, total, lines, buyer_id) = {
      let guard = ctx.read();
      (
        guard.store.clone(),
        guard.cart.is_empty(),
        guard.cart.total(),
        guard.cart.lines.clone(),
        guard.buyer_id,
      )
    };
    if is_empty {
      return Err(AppError::Validation("Cart is empty".to_string()));
    }
    if total <= 0 {
      return Err(AppError::Validation("Cart total must be positive".to_string()));
    }

    let contact = store.user_contact(buyer_id).await?;
    tracing::debug!(buyer_email = %contact.email, "Buyer contact resolved.");
    for line in &lines {
      match &line.kind {
        CartLineKind::Enrollment { program_id, .. } => {
          let remaining = store.program_capacity_remaining(*program_id).await?;
          if remaining < i64::from(line.quantity) {
            return Err(AppError::Validation(format!(
              "Program '{}' is full",
              line.name
            )));
          }
        }
        CartLineKind::Product { product_id, .. } => {
          let available = store.product_stock(*product_id).await?;
          if available < i64::from(line.quantity) {
            return Err(AppError::InsufficientStock { available });
          }
        }
        CartLineKind::Appointment { .. } => {}
      }
    }

    ctx.write().buyer_contact = Some(contact);
    Ok(StepControl::Continue)
  });

  s.on_step("authorize_payment", |ctx: ContextData<CheckoutCtx>| async move {
    let (gateway, total, method, simulate_failure, prefix) = {
      let guard = ctx.read();
      (
        guard.gateway.clone(),
        guard.cart.total(),
        guard.payment_method,
        guard.simulate_failure,
        guard.receipt_prefix.clone(),
      )
    };

    let authorization = gateway.authorize(total, method, simulate_failure).await?;
    let receipt_number = receipt::receipt_number(&prefix);
    info!(%receipt_number, reference = %authorization.reference, "Payment authorized for checkout.");

    {
      let mut guard = ctx.write();
      guard.authorization = Some(authorization);
      guard.receipt_number = Some(receipt_number);
    }
    Ok(StepControl::Continue)
  });
  s.compensate_step("authorize_payment", |ctx: ContextData<CheckoutCtx>| async move {
    let reference = {
      let guard = ctx.read();
      guard.authorization.as_ref().map(|a| a.reference.clone())
    };
    if let Some(reference) = reference {
      // The simulated gateway has no void call; the record of the void is
      // the log line.
      warn!(%reference, "Voiding payment authorization.");
    }
    Ok(())
  });

  s.on_step("create_records", |ctx: ContextData<CheckoutCtx>| async move {
    let (store, lines, buyer_id, receipt_number) = {
      let guard = ctx.read();
      (
        guard.store.clone(),
        guard.cart.lines.clone(),
        guard.buyer_id,
        guard
          .receipt_number
          .clone()
          .ok_or_else(|| AppError::Internal("Receipt number missing before record creation".to_string()))?,
      )
    };

    for line in &lines {
      match &line.kind {
        CartLineKind::Enrollment { program_id, .. } => {
          let start_date = store
            .program_start_date(*program_id)
            .await?
            .unwrap_or_else(|| Utc::now().date_naive());

          let enrollment_id = store.insert_enrollment(buyer_id, *program_id, start_date).await?;
          ctx.write().created_enrollments.push(enrollment_id);

          let payment_id = store
            .insert_payment(
              buyer_id,
              line.line_total(),
              &format!("Inscripción: {}", line.name),
              &receipt_number,
            )
            .await?;
          ctx.write().created_payments.push(payment_id);

          let event_id = store
            .insert_calendar_event(buyer_id, &format!("Inicio: {}", line.name), start_date)
            .await?;
          ctx.write().created_calendar_events.push(event_id);
        }
        CartLineKind::Product { product_id, .. } => {
          store.decrement_stock(*product_id, line.quantity).await?;
          ctx.write().stock_decrements.push((*product_id, line.quantity));

          let items = json!([{
            "product_id": product_id,
            "name": line.name,
            "quantity": line.quantity,
            "price": line.discounted_unit_price(),
          }]);
          let order_id = store.insert_order(buyer_id, items, line.line_total()).await?;
          ctx.write().created_orders.push(order_id);
        }
        CartLineKind::Appointment {
          professional_id,
          appointment_date,
          appointment_time,
          service_type,
        } => {
          let appointment_id = store
            .insert_appointment(
              buyer_id,
              *professional_id,
              *appointment_date,
              *appointment_time,
              service_type,
            )
            .await?;
          ctx.write().created_appointments.push(appointment_id);
        }
      }
    }
    Ok(StepControl::Continue)
  });
  s.compensate_step("create_records", |ctx: ContextData<CheckoutCtx>| async move {
    let (store, calendar_events, orders, stock_decrements, payments, enrollments, appointments) = {
      let guard = ctx.read();
      (
        guard.store.clone(),
        guard.created_calendar_events.clone(),
        guard.created_orders.clone(),
        guard.stock_decrements.clone(),
        guard.created_payments.clone(),
        guard.created_enrollments.clone(),
        guard.created_appointments.clone(),
      )
    };

    // Best effort: one failed delete must not strand the remaining rows.
    for id in calendar_events.iter().rev() {
      if let Err(error) = store.delete_calendar_event(*id).await {
        warn!(%error, calendar_event_id = %id, "Unwind: failed to delete calendar event.");
      }
    }
    for id in orders.iter().rev() {
      if let Err(error) = store.delete_order(*id).await {
        warn!(%error, order_id = %id, "Unwind: failed to delete order.");
      }
    }
    for (product_id, quantity) in stock_decrements.iter().rev() {
      if let Err(error) = store.restore_stock(*product_id, *quantity).await {
        warn!(%error, product_id = %product_id, "Unwind: failed to restore stock.");
      }
    }
    for id in payments.iter().rev() {
      if let Err(error) = store.delete_payment(*id).await {
        warn!(%error, payment_id = %id, "Unwind: failed to delete payment.");
      }
    }
    for id in enrollments.iter().rev() {
      if let Err(error) = store.delete_enrollment(*id).await {
        warn!(%error, enrollment_id = %id, "Unwind: failed to delete enrollment.");
      }
    }
    for id in appointments.iter().rev() {
      if let Err(error) = store.delete_appointment(*id).await {
        warn!(%error, appointment_id = %id, "Unwind: failed to delete appointment.");
      }
    }
    Ok(())
  });

  s.on_step("notify_counterparties", |ctx: ContextData<CheckoutCtx>| async move {
    let (store, lines, buyer_name) = {
      let guard = ctx.read();
      (
        guard.store.clone(),
        guard.cart.lines.clone(),
        guard
          .buyer_contact
          .as_ref()
          .map(|c| c.full_name.clone())
          .unwrap_or_default(),
      )
    };

    for line in &lines {
      let notification_id = match &line.kind {
        CartLineKind::Enrollment { school_id, .. } => {
          let owner_id = store.school_owner(*school_id).await?;
          store
            .insert_notification(
              owner_id,
              "Nueva Inscripción",
              &format!("{} se inscribió en {}", buyer_name, line.name),
              "enrollment",
            )
            .await?
        }
        CartLineKind::Product { vendor_id, .. } => {
          store
            .insert_notification(
              *vendor_id,
              "Nueva Venta",
              &format!("Vendiste {}x {}", line.quantity, line.name),
              "sale",
            )
            .await?
        }
        CartLineKind::Appointment {
          professional_id,
          appointment_date,
          service_type,
          ..
        } => {
          store
            .insert_notification(
              *professional_id,
              "Nueva Cita",
              &format!("{} agendó {} para el {}", buyer_name, service_type, appointment_date),
              "appointment",
            )
            .await?
        }
      };
      ctx.write().counterparty_notifications.push(notification_id);
    }
    Ok(StepControl::Continue)
  });
  s.compensate_step("notify_counterparties", |ctx: ContextData<CheckoutCtx>| async move {
    let (store, notifications) = {
      let guard = ctx.read();
      (guard.store.clone(), guard.counterparty_notifications.clone())
    };
    for id in notifications.iter().rev() {
      if let Err(error) = store.delete_notification(*id).await {
        warn!(%error, notification_id = %id, "Unwind: failed to delete notification.");
      }
    }
    Ok(())
  });

  s.on_step("notify_buyer", |ctx: ContextData<CheckoutCtx>| async move {
    let (store, buyer_id, receipt_number) = {
      let guard = ctx.read();
      (
        guard.store.clone(),
        guard.buyer_id,
        guard.receipt_number.clone().unwrap_or_default(),
      )
    };
    let notification_id = store
      .insert_notification(
        buyer_id,
        "Compra Exitosa",
        &format!("Tu pedido #{} ha sido confirmado", receipt_number),
        "purchase",
      )
      .await?;
    ctx.write().buyer_notifications.push(notification_id);
    Ok(StepControl::Continue)
  });

  s
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;
  use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

  use async_trait::async_trait;
  use chrono::{NaiveDate, NaiveTime};
  use parking_lot::Mutex;
  use saga::SagaOutcome;

  use super::*;
  use crate::cart::CartLine;
  use crate::errors::Result as AppResult;

  #[derive(Debug, Clone)]
  struct RecordedNotification {
    id: Uuid,
    user_id: Uuid,
    title: String,
    kind: String,
    message: String,
  }

  #[derive(Default)]
  struct MockStore {
    calls: AtomicUsize,
    fail_counterparty_notifications: AtomicBool,
    fail_buyer_notification: AtomicBool,

    stock: Mutex<HashMap<Uuid, i32>>,
    enrollments: Mutex<Vec<Uuid>>,
    deleted_enrollments: Mutex<Vec<Uuid>>,
    payments: Mutex<Vec<(Uuid, String)>>,
    deleted_payments: Mutex<Vec<Uuid>>,
    orders: Mutex<Vec<Uuid>>,
    deleted_orders: Mutex<Vec<Uuid>>,
    appointments: Mutex<Vec<Uuid>>,
    deleted_appointments: Mutex<Vec<Uuid>>,
    calendar_events: Mutex<Vec<Uuid>>,
    deleted_calendar_events: Mutex<Vec<Uuid>>,
    notifications: Mutex<Vec<RecordedNotification>>,
    deleted_notifications: Mutex<Vec<Uuid>>,
    school_owners: Mutex<HashMap<Uuid, Uuid>>,
  }

  impl MockStore {
    fn tick(&self) {
      self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn notification_kinds(&self) -> Vec<String> {
      self.notifications.lock().iter().map(|n| n.kind.clone()).collect()
    }
  }

  #[async_trait]
  impl CheckoutStore for MockStore {
    async fn program_capacity_remaining(&self, _program_id: Uuid) -> AppResult<i64> {
      self.tick();
      Ok(10)
    }

    async fn program_start_date(&self, _program_id: Uuid) -> AppResult<Option<NaiveDate>> {
      self.tick();
      Ok(NaiveDate::from_ymd_opt(2026, 9, 1))
    }

    async fn product_stock(&self, product_id: Uuid) -> AppResult<i64> {
      self.tick();
      Ok(i64::from(
        self.stock.lock().get(&product_id).copied().unwrap_or(0),
      ))
    }

    async fn school_owner(&self, school_id: Uuid) -> AppResult<Uuid> {
      self.tick();
      Ok(
        self
          .school_owners
          .lock()
          .get(&school_id)
          .copied()
          .unwrap_or_else(Uuid::new_v4),
      )
    }

    async fn user_contact(&self, _user_id: Uuid) -> AppResult<UserContact> {
      self.tick();
      Ok(UserContact {
        email: "ana@example.com".to_string(),
        full_name: "Ana García".to_string(),
      })
    }

    async fn insert_enrollment(&self, _user_id: Uuid, _program_id: Uuid, _start_date: NaiveDate) -> AppResult<Uuid> {
      self.tick();
      let id = Uuid::new_v4();
      self.enrollments.lock().push(id);
      Ok(id)
    }

    async fn delete_enrollment(&self, id: Uuid) -> AppResult<()> {
      self.tick();
      self.deleted_enrollments.lock().push(id);
      Ok(())
    }

    async fn insert_payment(
      &self,
      _parent_id: Uuid,
      _amount: i64,
      concept: &str,
      _receipt_number: &str,
    ) -> AppResult<Uuid> {
      self.tick();
      let id = Uuid::new_v4();
      self.payments.lock().push((id, concept.to_string()));
      Ok(id)
    }

    async fn delete_payment(&self, id: Uuid) -> AppResult<()> {
      self.tick();
      self.deleted_payments.lock().push(id);
      Ok(())
    }

    async fn insert_order(&self, _user_id: Uuid, _items: serde_json::Value, _total: i64) -> AppResult<Uuid> {
      self.tick();
      let id = Uuid::new_v4();
      self.orders.lock().push(id);
      Ok(id)
    }

    async fn delete_order(&self, id: Uuid) -> AppResult<()> {
      self.tick();
      self.deleted_orders.lock().push(id);
      Ok(())
    }

    async fn decrement_stock(&self, product_id: Uuid, quantity: i32) -> AppResult<()> {
      self.tick();
      let mut stock = self.stock.lock();
      let available = stock.get(&product_id).copied().unwrap_or(0);
      if available < quantity {
        return Err(AppError::InsufficientStock {
          available: i64::from(available),
        });
      }
      stock.insert(product_id, available - quantity);
      Ok(())
    }

    async fn restore_stock(&self, product_id: Uuid, quantity: i32) -> AppResult<()> {
      self.tick();
      let mut stock = self.stock.lock();
      let current = stock.get(&product_id).copied().unwrap_or(0);
      stock.insert(product_id, current + quantity);
      Ok(())
    }

    async fn insert_appointment(
      &self,
      _user_id: Uuid,
      _professional_id: Uuid,
      _appointment_date: NaiveDate,
      _appointment_time: NaiveTime,
      _service_type: &str,
    ) -> AppResult<Uuid> {
      self.tick();
      let id = Uuid::new_v4();
      self.appointments.lock().push(id);
      Ok(id)
    }

    async fn delete_appointment(&self, id: Uuid) -> AppResult<()> {
      self.tick();
      self.deleted_appointments.lock().push(id);
      Ok(())
    }

    async fn insert_notification(&self, user_id: Uuid, title: &str, message: &str, kind: &str) -> AppResult<Uuid> {
      self.tick();
      let failing = if kind == "purchase" {
        self.fail_buyer_notification.load(Ordering::SeqCst)
      } else {
        self.fail_counterparty_notifications.load(Ordering::SeqCst)
      };
      if failing {
        return Err(AppError::Internal("notification insert failed".to_string()));
      }
      let id = Uuid::new_v4();
      self.notifications.lock().push(RecordedNotification {
        id,
        user_id,
        title: title.to_string(),
        kind: kind.to_string(),
        message: message.to_string(),
      });
      Ok(id)
    }

    async fn delete_notification(&self, id: Uuid) -> AppResult<()> {
      self.tick();
      self.deleted_notifications.lock().push(id);
      Ok(())
    }

    async fn insert_calendar_event(&self, _user_id: Uuid, _title: &str, _event_date: NaiveDate) -> AppResult<Uuid> {
      self.tick();
      let id = Uuid::new_v4();
      self.calendar_events.lock().push(id);
      Ok(id)
    }

    async fn delete_calendar_event(&self, id: Uuid) -> AppResult<()> {
      self.tick();
      self.deleted_calendar_events.lock().push(id);
      Ok(())
    }
  }

  fn enrollment_line(program_id: Uuid, school_id: Uuid) -> CartLine {
    CartLine {
      item_id: program_id,
      kind: CartLineKind::Enrollment {
        program_id,
        school_id,
      },
      name: "Fútbol Infantil".to_string(),
      description: None,
      unit_price: 100_000,
      quantity: 1,
      discount_percent: 10,
    }
  }

  fn product_line(product_id: Uuid, vendor_id: Uuid, quantity: i32) -> CartLine {
    CartLine {
      item_id: product_id,
      kind: CartLineKind::Product {
        product_id,
        vendor_id,
        stock: 10,
      },
      name: "Balón profesional".to_string(),
      description: None,
      unit_price: 50_000,
      quantity,
      discount_percent: 0,
    }
  }

  fn appointment_line(professional_id: Uuid) -> CartLine {
    CartLine {
      item_id: Uuid::new_v4(),
      kind: CartLineKind::Appointment {
        professional_id,
        appointment_date: NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
        appointment_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
        service_type: "Fisioterapia".to_string(),
      },
      name: "Fisioterapia".to_string(),
      description: None,
      unit_price: 80_000,
      quantity: 1,
      discount_percent: 0,
    }
  }

  fn ctx_with(
    store: Arc<MockStore>,
    cart: Cart,
    simulate_failure: bool,
  ) -> ContextData<CheckoutCtx> {
    let gateway = MockPaymentGateway::new(std::time::Duration::ZERO, "COP");
    ContextData::new(CheckoutCtx::new(
      store,
      gateway,
      Uuid::new_v4(),
      cart,
      PaymentMethod::Card,
      simulate_failure,
      "SPM",
    ))
  }

  #[tokio::test]
  async fn empty_cart_is_rejected_before_any_store_access() {
    let store = Arc::new(MockStore::default());
    let saga = build_checkout_saga();

    let result = saga.run(ctx_with(store.clone(), Cart::default(), false)).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn zero_total_cart_is_rejected_before_any_store_access() {
    let store = Arc::new(MockStore::default());

    // A fully discounted line makes the cart non-empty but worthless.
    let mut line = product_line(Uuid::new_v4(), Uuid::new_v4(), 1);
    line.discount_percent = 100;
    let mut cart = Cart::default();
    cart.add(line);

    let saga = build_checkout_saga();
    let result = saga.run(ctx_with(store.clone(), cart, false)).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn checkout_creates_one_record_and_notification_per_line() {
    let store = Arc::new(MockStore::default());
    let product_id = Uuid::new_v4();
    let vendor_id = Uuid::new_v4();
    let school_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();
    let professional_id = Uuid::new_v4();
    store.stock.lock().insert(product_id, 10);
    store.school_owners.lock().insert(school_id, owner_id);

    let mut cart = Cart::default();
    cart.add(enrollment_line(Uuid::new_v4(), school_id));
    cart.add(product_line(product_id, vendor_id, 2));
    cart.add(appointment_line(professional_id));

    let saga = build_checkout_saga();
    let ctx = ctx_with(store.clone(), cart, false);
    let outcome = saga.run(ctx.clone()).await.unwrap();
    assert!(matches!(outcome, SagaOutcome::Completed));

    assert_eq!(store.enrollments.lock().len(), 1);
    assert_eq!(store.orders.lock().len(), 1);
    assert_eq!(store.appointments.lock().len(), 1);
    assert_eq!(store.calendar_events.lock().len(), 1);
    assert_eq!(store.stock.lock()[&product_id], 8);

    let payments = store.payments.lock().clone();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].1, "Inscripción: Fútbol Infantil");

    let mut kinds = store.notification_kinds();
    kinds.sort();
    assert_eq!(kinds, vec!["appointment", "enrollment", "purchase", "sale"]);

    let notifications = store.notifications.lock().clone();
    let enrollment_note = notifications.iter().find(|n| n.kind == "enrollment").unwrap();
    assert_eq!(enrollment_note.user_id, owner_id);
    assert_eq!(enrollment_note.title, "Nueva Inscripción");
    let sale_note = notifications.iter().find(|n| n.kind == "sale").unwrap();
    assert_eq!(sale_note.user_id, vendor_id);
    assert_eq!(sale_note.message, "Vendiste 2x Balón profesional");
    let purchase_note = notifications.iter().find(|n| n.kind == "purchase").unwrap();
    assert!(purchase_note.message.starts_with("Tu pedido #SPM-"));

    let receipt_number = ctx.read().receipt_number.clone().unwrap();
    assert!(receipt_number.starts_with("SPM-"));
    assert!(ctx.read().authorization.is_some());
  }

  #[tokio::test]
  async fn gateway_decline_leaves_no_records() {
    let store = Arc::new(MockStore::default());
    let product_id = Uuid::new_v4();
    store.stock.lock().insert(product_id, 5);

    let mut cart = Cart::default();
    cart.add(product_line(product_id, Uuid::new_v4(), 1));

    let saga = build_checkout_saga();
    let result = saga.run(ctx_with(store.clone(), cart, true)).await;

    assert!(matches!(result, Err(AppError::Payment(_))));
    assert!(store.orders.lock().is_empty());
    assert!(store.notifications.lock().is_empty());
    assert_eq!(store.stock.lock()[&product_id], 5);
  }

  #[tokio::test]
  async fn failed_notification_unwinds_created_records() {
    let store = Arc::new(MockStore::default());
    store.fail_counterparty_notifications.store(true, Ordering::SeqCst);
    let product_id = Uuid::new_v4();
    store.stock.lock().insert(product_id, 5);

    let mut cart = Cart::default();
    cart.add(enrollment_line(Uuid::new_v4(), Uuid::new_v4()));
    cart.add(product_line(product_id, Uuid::new_v4(), 3));

    let saga = build_checkout_saga();
    let result = saga.run(ctx_with(store.clone(), cart, false)).await;
    assert!(result.is_err());

    // Every created record is removed and the stock decrement undone.
    let created_enrollments = store.enrollments.lock().clone();
    assert_eq!(*store.deleted_enrollments.lock(), created_enrollments);
    let created_payments: Vec<Uuid> = store.payments.lock().iter().map(|(id, _)| *id).collect();
    assert_eq!(*store.deleted_payments.lock(), created_payments);
    let created_orders = store.orders.lock().clone();
    assert_eq!(*store.deleted_orders.lock(), created_orders);
    let created_events = store.calendar_events.lock().clone();
    assert_eq!(*store.deleted_calendar_events.lock(), created_events);
    assert_eq!(store.stock.lock()[&product_id], 5);
    assert!(store.notifications.lock().is_empty());
  }

  #[tokio::test]
  async fn insufficient_stock_fails_validation() {
    let store = Arc::new(MockStore::default());
    let product_id = Uuid::new_v4();
    store.stock.lock().insert(product_id, 1);

    let mut cart = Cart::default();
    // Stock snapshot in the line is stale; the store only has 1 left.
    cart.add(product_line(product_id, Uuid::new_v4(), 3));

    let saga = build_checkout_saga();
    let result = saga.run(ctx_with(store.clone(), cart, false)).await;

    assert!(matches!(
      result,
      Err(AppError::InsufficientStock { available: 1 })
    ));
    assert!(store.orders.lock().is_empty());
  }

  #[tokio::test]
  async fn buyer_notification_failure_does_not_fail_checkout() {
    let store = Arc::new(MockStore::default());
    store.fail_buyer_notification.store(true, Ordering::SeqCst);
    let school_id = Uuid::new_v4();

    let mut cart = Cart::default();
    cart.add(enrollment_line(Uuid::new_v4(), school_id));

    let saga = build_checkout_saga();
    let outcome = saga.run(ctx_with(store.clone(), cart, false)).await.unwrap();

    assert!(matches!(outcome, SagaOutcome::Completed));
    assert_eq!(store.enrollments.lock().len(), 1);
    assert_eq!(store.notification_kinds(), vec!["enrollment"]);
    assert!(store.deleted_enrollments.lock().is_empty());
  }
}
