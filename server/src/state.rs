// server/src/state.rs

use std::sync::Arc;

use sqlx::PgPool;

use crate::cart::CartStore;
use crate::checkout::CheckoutCtx;
use crate::config::AppConfig;
use crate::db::CheckoutStore;
use crate::errors::AppError;
use crate::services::payment_gateway::MockPaymentGateway;
use crate::services::sessions::SessionStore;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub config: Arc<AppConfig>,
  pub carts: Arc<CartStore>,
  pub sessions: Arc<SessionStore>,
  pub store: Arc<dyn CheckoutStore>,
  pub gateway: MockPaymentGateway,
  pub checkout_saga: Arc<saga::Saga<CheckoutCtx, AppError>>,
}
