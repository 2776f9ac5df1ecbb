// server/src/cart.rs

//! In-memory shopping carts. A cart mixes program enrollments, store
//! products and wellness appointments in a single line list; totals are
//! whole COP pesos with per-line percentage discounts.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a cart line refers to. Products carry a stock snapshot taken when
/// the line was added; quantity changes clamp against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartLineKind {
  Enrollment {
    program_id: Uuid,
    school_id: Uuid,
  },
  Product {
    product_id: Uuid,
    vendor_id: Uuid,
    stock: i32,
  },
  Appointment {
    professional_id: Uuid,
    appointment_date: chrono::NaiveDate,
    appointment_time: chrono::NaiveTime,
    service_type: String,
  },
}

impl CartLineKind {
  /// Maximum quantity for this line, if the underlying item is finite.
  fn stock_limit(&self) -> Option<i32> {
    match self {
      CartLineKind::Product { stock, .. } => Some(*stock),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
  /// Identity of the purchasable item; adding the same item again merges
  /// into the existing line.
  pub item_id: Uuid,
  #[serde(flatten)]
  pub kind: CartLineKind,
  pub name: String,
  pub description: Option<String>,
  /// Whole COP pesos before discount.
  pub unit_price: i64,
  pub quantity: i32,
  /// Percentage, 0..=100.
  pub discount_percent: i32,
}

impl CartLine {
  /// Unit price after discount, rounded half-up to the nearest peso.
  pub fn discounted_unit_price(&self) -> i64 {
    let d = i64::from(self.discount_percent.clamp(0, 100));
    (self.unit_price * (100 - d) + 50) / 100
  }

  pub fn line_total(&self) -> i64 {
    self.discounted_unit_price() * i64::from(self.quantity)
  }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Cart {
  pub lines: Vec<CartLine>,
}

impl Cart {
  /// Adds a line, merging with an existing line for the same item. Product
  /// quantities never exceed the stock snapshot; enrollments and
  /// appointments always hold quantity 1, so re-adding one is a no-op.
  pub fn add(&mut self, line: CartLine) {
    if let Some(existing) = self.lines.iter_mut().find(|l| l.item_id == line.item_id) {
      let Some(limit) = existing.kind.stock_limit() else {
        // One seat per enrollment, one slot per appointment.
        return;
      };
      let qty = existing.quantity.saturating_add(line.quantity).min(limit);
      existing.quantity = qty.max(1);
      return;
    }
    let mut line = line;
    match line.kind.stock_limit() {
      Some(limit) => line.quantity = line.quantity.min(limit).max(1),
      None => line.quantity = 1,
    }
    self.lines.push(line);
  }

  /// Applies a signed quantity delta. A resulting quantity of zero or
  /// less removes the line; otherwise it clamps to `[1, stock]` for
  /// products and stays at 1 for enrollments and appointments.
  pub fn update_quantity(&mut self, item_id: Uuid, delta: i32) {
    let Some(idx) = self.lines.iter().position(|l| l.item_id == item_id) else {
      return;
    };
    let line = &mut self.lines[idx];
    let next = line.quantity.saturating_add(delta);
    if next <= 0 {
      self.lines.remove(idx);
      return;
    }
    let limit = line.kind.stock_limit().unwrap_or(1);
    line.quantity = next.min(limit).max(1);
  }

  pub fn remove(&mut self, item_id: Uuid) {
    self.lines.retain(|l| l.item_id != item_id);
  }

  pub fn clear(&mut self) {
    self.lines.clear();
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  /// Sum of discounted line totals, in whole COP pesos.
  pub fn total(&self) -> i64 {
    self.lines.iter().map(CartLine::line_total).sum()
  }

  /// Total unit count across all lines.
  pub fn item_count(&self) -> i64 {
    self.lines.iter().map(|l| i64::from(l.quantity)).sum()
  }
}

/// Per-user carts held in process memory, keyed by user id.
#[derive(Default)]
pub struct CartStore {
  carts: RwLock<HashMap<Uuid, Cart>>,
}

impl CartStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, user_id: Uuid) -> Cart {
    self.carts.read().get(&user_id).cloned().unwrap_or_default()
  }

  /// Runs `f` against the user's cart, creating an empty cart first if
  /// none exists.
  pub fn with_cart<R>(&self, user_id: Uuid, f: impl FnOnce(&mut Cart) -> R) -> R {
    let mut carts = self.carts.write();
    let cart = carts.entry(user_id).or_default();
    f(cart)
  }

  /// Drops the user's cart entirely, e.g. after a successful checkout.
  pub fn take(&self, user_id: Uuid) -> Cart {
    self.carts.write().remove(&user_id).unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn enrollment_line(item_id: Uuid, price: i64, qty: i32, discount: i32) -> CartLine {
    CartLine {
      item_id,
      kind: CartLineKind::Enrollment {
        program_id: item_id,
        school_id: Uuid::new_v4(),
      },
      name: "Fútbol Infantil".into(),
      description: None,
      unit_price: price,
      quantity: qty,
      discount_percent: discount,
    }
  }

  fn product_line(item_id: Uuid, price: i64, qty: i32, stock: i32) -> CartLine {
    CartLine {
      item_id,
      kind: CartLineKind::Product {
        product_id: item_id,
        vendor_id: Uuid::new_v4(),
        stock,
      },
      name: "Balón profesional".into(),
      description: None,
      unit_price: price,
      quantity: qty,
      discount_percent: 0,
    }
  }

  #[test]
  fn total_applies_per_line_discounts() {
    let mut cart = Cart::default();
    cart.add(enrollment_line(Uuid::new_v4(), 100_000, 2, 10));
    cart.add(product_line(Uuid::new_v4(), 50_000, 1, 5));
    // 2 x 90_000 + 1 x 50_000
    assert_eq!(cart.total(), 230_000);
    assert_eq!(cart.item_count(), 3);
  }

  #[test]
  fn discount_rounds_half_up() {
    let line = enrollment_line(Uuid::new_v4(), 999, 1, 15);
    // 999 * 0.85 = 849.15 -> 849
    assert_eq!(line.discounted_unit_price(), 849);
    let line = enrollment_line(Uuid::new_v4(), 990, 1, 15);
    // 990 * 0.85 = 841.5 -> 842
    assert_eq!(line.discounted_unit_price(), 842);
  }

  #[test]
  fn adding_same_item_increments_quantity() {
    let id = Uuid::new_v4();
    let mut cart = Cart::default();
    cart.add(product_line(id, 10_000, 1, 10));
    cart.add(product_line(id, 10_000, 2, 10));
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].quantity, 3);
  }

  #[test]
  fn add_caps_quantity_at_stock() {
    let id = Uuid::new_v4();
    let mut cart = Cart::default();
    cart.add(product_line(id, 10_000, 2, 3));
    cart.add(product_line(id, 10_000, 5, 3));
    assert_eq!(cart.lines[0].quantity, 3);
  }

  #[test]
  fn adding_same_enrollment_again_is_a_no_op() {
    let id = Uuid::new_v4();
    let mut cart = Cart::default();
    cart.add(enrollment_line(id, 100_000, 1, 10));
    cart.add(enrollment_line(id, 100_000, 1, 10));

    // Still one line, one seat; the buyer is charged for a single seat.
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].quantity, 1);
    assert_eq!(cart.total(), 90_000);
  }

  #[test]
  fn non_product_quantity_never_exceeds_one() {
    let id = Uuid::new_v4();
    let mut cart = Cart::default();
    cart.add(enrollment_line(id, 100_000, 3, 0));
    assert_eq!(cart.lines[0].quantity, 1);

    cart.update_quantity(id, 5);
    assert_eq!(cart.lines[0].quantity, 1);

    cart.update_quantity(id, -1);
    assert!(cart.is_empty());
  }

  #[test]
  fn update_quantity_clamps_and_removes() {
    let id = Uuid::new_v4();
    let mut cart = Cart::default();
    cart.add(product_line(id, 10_000, 2, 4));

    cart.update_quantity(id, 10);
    assert_eq!(cart.lines[0].quantity, 4);

    cart.update_quantity(id, -3);
    assert_eq!(cart.lines[0].quantity, 1);

    // decrementing the last unit removes the line
    cart.update_quantity(id, -1);
    assert!(cart.is_empty());
  }

  #[test]
  fn update_quantity_on_missing_item_is_a_no_op() {
    let mut cart = Cart::default();
    cart.add(product_line(Uuid::new_v4(), 10_000, 1, 5));
    cart.update_quantity(Uuid::new_v4(), -1);
    assert_eq!(cart.lines.len(), 1);
  }

  #[test]
  fn remove_and_clear() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut cart = Cart::default();
    cart.add(product_line(a, 10_000, 1, 5));
    cart.add(product_line(b, 20_000, 1, 5));

    cart.remove(a);
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].item_id, b);

    cart.clear();
    assert!(cart.is_empty());
    assert_eq!(cart.total(), 0);
  }

  #[test]
  fn store_keeps_carts_per_user() {
    let store = CartStore::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    store.with_cart(alice, |c| c.add(product_line(Uuid::new_v4(), 5_000, 1, 9)));
    assert_eq!(store.get(alice).item_count(), 1);
    assert_eq!(store.get(bob).item_count(), 0);

    let taken = store.take(alice);
    assert_eq!(taken.item_count(), 1);
    assert!(store.get(alice).is_empty());
  }
}
