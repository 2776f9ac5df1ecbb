// server/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use saga::{ContextData, SagaOutcome};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::checkout::CheckoutCtx;
use crate::errors::AppError;
use crate::services::payment_gateway::PaymentMethod;
use crate::services::receipt::{render_receipt, ReceiptData, ReceiptLine};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CheckoutRequestPayload {
  pub payment_method: PaymentMethod,
  /// Test hook: forces a gateway decline so clients can exercise the
  /// failure path end to end.
  #[serde(default)]
  pub simulate_failure: bool,
}

#[instrument(
  name = "handler::start_checkout",
  skip(app_state, payload),
  fields(user_id = %user.user_id, payment_method = %payload.payment_method)
)]
pub async fn start_checkout_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  payload: web::Json<CheckoutRequestPayload>,
) -> Result<HttpResponse, AppError> {
  // Snapshot the cart; it is only cleared after the saga completes, so a
  // failed checkout leaves it untouched.
  let cart = app_state.carts.get(user.user_id);
  info!(lines = cart.lines.len(), total = cart.total(), "Starting checkout.");

  let ctx = ContextData::new(CheckoutCtx::new(
    app_state.store.clone(),
    app_state.gateway.clone(),
    user.user_id,
    cart.clone(),
    payload.payment_method,
    payload.simulate_failure,
    app_state.config.receipt_prefix.clone(),
  ));

  match app_state.checkout_saga.run(ctx.clone()).await {
    Ok(SagaOutcome::Completed) => {
      let (receipt_number, authorization, buyer_name) = {
        let guard = ctx.read();
        (
          guard
            .receipt_number
            .clone()
            .ok_or_else(|| AppError::Internal("Checkout completed without a receipt number".to_string()))?,
          guard
            .authorization
            .clone()
            .ok_or_else(|| AppError::Internal("Checkout completed without an authorization".to_string()))?,
          guard
            .buyer_contact
            .as_ref()
            .map(|c| c.full_name.clone())
            .unwrap_or_default(),
        )
      };

      app_state.carts.take(user.user_id);

      let receipt = ReceiptData {
        receipt_number: receipt_number.clone(),
        buyer_name,
        lines: cart
          .lines
          .iter()
          .map(|l| ReceiptLine {
            name: l.name.clone(),
            quantity: l.quantity,
            unit_price: l.discounted_unit_price(),
          })
          .collect(),
        total: cart.total(),
        currency: app_state.config.currency_code.clone(),
        payment_reference: Some(authorization.reference.clone()),
      };

      info!(%receipt_number, "Checkout completed.");
      Ok(HttpResponse::Ok().json(json!({
        "receiptNumber": receipt_number,
        "total": cart.total(),
        "currency": app_state.config.currency_code,
        "paymentReference": authorization.reference,
        "authorizationCode": authorization.authorization_code,
        "receiptText": render_receipt(&receipt),
      })))
    }
    Ok(SagaOutcome::Stopped) => {
      warn!("Checkout saga stopped without completing.");
      Err(AppError::Internal("Checkout was halted by an internal step.".to_string()))
    }
    Err(app_err) => {
      warn!(error = %app_err, "Checkout failed; created records were rolled back.");
      Err(app_err)
    }
  }
}
