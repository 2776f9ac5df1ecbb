// server/src/services/receipt.rs

//! Receipt numbers and the plain-text receipt body shown after checkout.
//! A receipt number is the prefix plus the checkout timestamp in
//! milliseconds rendered as uppercase base-36, e.g. `SPM-LXK2V9Q1`.

use chrono::Utc;

#[derive(Debug, Clone)]
pub struct ReceiptLine {
  pub name: String,
  pub quantity: i32,
  /// Discounted unit price in whole COP pesos.
  pub unit_price: i64,
}

#[derive(Debug, Clone)]
pub struct ReceiptData {
  pub receipt_number: String,
  pub buyer_name: String,
  pub lines: Vec<ReceiptLine>,
  pub total: i64,
  pub currency: String,
  /// Gateway reference, known at checkout time but not persisted with the
  /// payment rows, so reconstructed receipts omit it.
  pub payment_reference: Option<String>,
}

/// Builds a receipt number from the current wall clock.
pub fn receipt_number(prefix: &str) -> String {
  receipt_number_at(prefix, Utc::now().timestamp_millis())
}

pub fn receipt_number_at(prefix: &str, epoch_millis: i64) -> String {
  format!("{}-{}", prefix, to_base36_upper(epoch_millis.max(0) as u64))
}

fn to_base36_upper(mut n: u64) -> String {
  const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
  if n == 0 {
    return "0".to_string();
  }
  let mut buf = Vec::new();
  while n > 0 {
    buf.push(DIGITS[(n % 36) as usize]);
    n /= 36;
  }
  buf.reverse();
  String::from_utf8(buf).expect("base36 digits are ASCII")
}

/// Renders the receipt as plain text for the confirmation response.
pub fn render_receipt(data: &ReceiptData) -> String {
  let mut out = String::new();
  out.push_str(&format!("Recibo {}\n", data.receipt_number));
  out.push_str(&format!("Cliente: {}\n", data.buyer_name));
  out.push_str("----------------------------------------\n");
  for line in &data.lines {
    out.push_str(&format!(
      "{} x{}  {} {}\n",
      line.name,
      line.quantity,
      line.unit_price * i64::from(line.quantity),
      data.currency
    ));
  }
  out.push_str("----------------------------------------\n");
  out.push_str(&format!("Total: {} {}\n", data.total, data.currency));
  if let Some(reference) = &data.payment_reference {
    out.push_str(&format!("Referencia de pago: {}\n", reference));
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn base36_known_values() {
    assert_eq!(to_base36_upper(0), "0");
    assert_eq!(to_base36_upper(35), "Z");
    assert_eq!(to_base36_upper(36), "10");
    assert_eq!(to_base36_upper(1_700_000_000_000), "LOYW3V28");
  }

  #[test]
  fn receipt_number_has_prefix_and_base36_body() {
    let number = receipt_number_at("SPM", 1_700_000_000_000);
    assert_eq!(number, "SPM-LOYW3V28");
  }

  #[test]
  fn rendered_receipt_lists_lines_and_total() {
    let data = ReceiptData {
      receipt_number: "SPM-TEST1".into(),
      buyer_name: "Ana García".into(),
      lines: vec![
        ReceiptLine {
          name: "Fútbol Infantil".into(),
          quantity: 2,
          unit_price: 90_000,
        },
        ReceiptLine {
          name: "Balón profesional".into(),
          quantity: 1,
          unit_price: 50_000,
        },
      ],
      total: 230_000,
      currency: "COP".into(),
      payment_reference: Some("REF3F9A1C".into()),
    };
    let text = render_receipt(&data);
    assert!(text.contains("Recibo SPM-TEST1"));
    assert!(text.contains("Fútbol Infantil x2  180000 COP"));
    assert!(text.contains("Total: 230000 COP"));
    assert!(text.contains("Referencia de pago: REF3F9A1C"));
  }

  #[test]
  fn reconstructed_receipt_omits_missing_reference() {
    let data = ReceiptData {
      receipt_number: "SPM-TEST2".into(),
      buyer_name: "Ana García".into(),
      lines: vec![ReceiptLine {
        name: "Inscripción: Natación".into(),
        quantity: 1,
        unit_price: 80_000,
      }],
      total: 80_000,
      currency: "COP".into(),
      payment_reference: None,
    };
    let text = render_receipt(&data);
    assert!(text.contains("Total: 80000 COP"));
    assert!(!text.contains("Referencia de pago"));
  }
}
