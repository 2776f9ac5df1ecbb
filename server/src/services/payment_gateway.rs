// server/src/services/payment_gateway.rs

//! Simulated payment gateway. Authorizations always succeed after a
//! configurable processing delay unless the request asks to simulate a
//! decline, which makes failure paths reproducible in tests.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::{AppError, Result as AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
  Card,
  Pse,
  Nequi,
}

impl fmt::Display for PaymentMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      PaymentMethod::Card => "card",
      PaymentMethod::Pse => "pse",
      PaymentMethod::Nequi => "nequi",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentAuthorization {
  /// Gateway reference, e.g. `REF3F9A1C`.
  pub reference: String,
  /// Short approval code, e.g. `AUTH7B2D`.
  pub authorization_code: String,
  /// Whole COP pesos.
  pub amount: i64,
  pub method: PaymentMethod,
  pub currency: String,
}

#[derive(Debug, Clone)]
pub struct MockPaymentGateway {
  processing_delay: Duration,
  currency: String,
}

impl MockPaymentGateway {
  pub fn new(processing_delay: Duration, currency: impl Into<String>) -> Self {
    Self {
      processing_delay,
      currency: currency.into(),
    }
  }

  /// Authorizes a charge. `simulate_failure` forces a decline after the
  /// processing delay so callers can exercise their unwind paths.
  #[instrument(skip(self), fields(amount, %method, simulate_failure), err(Display))]
  pub async fn authorize(
    &self,
    amount: i64,
    method: PaymentMethod,
    simulate_failure: bool,
  ) -> AppResult<PaymentAuthorization> {
    if amount <= 0 {
      return Err(AppError::Payment(
        "Amount must be greater than zero".to_string(),
      ));
    }

    tokio::time::sleep(self.processing_delay).await;

    if simulate_failure {
      warn!("Simulated gateway decline.");
      return Err(AppError::Payment(
        "Payment declined by gateway (simulated)".to_string(),
      ));
    }

    let auth = PaymentAuthorization {
      reference: gateway_code("REF", 6),
      authorization_code: gateway_code("AUTH", 4),
      amount,
      method,
      currency: self.currency.clone(),
    };
    info!(reference = %auth.reference, "Payment authorized.");
    Ok(auth)
  }
}

/// `{prefix}` followed by `len` uppercase hex characters drawn from a
/// fresh UUID.
fn gateway_code(prefix: &str, len: usize) -> String {
  let hex = Uuid::new_v4().simple().to_string().to_uppercase();
  format!("{}{}", prefix, &hex[..len])
}
