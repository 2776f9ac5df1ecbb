// server/src/main.rs

mod cart;
mod checkout;
mod config;
mod db;
mod errors;
mod models;
mod services;
mod state;
mod web;

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::PgPool;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::cart::CartStore;
use crate::config::AppConfig;
use crate::db::PgStore;
use crate::services::payment_gateway::MockPaymentGateway;
use crate::services::sessions::SessionStore;
use crate::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting SportMaps server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  let db_pool = match PgPool::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  if let Err(e) = sqlx::migrate!("./migrations").run(&db_pool).await {
    tracing::error!(error = %e, "Failed to run database migrations.");
    panic!("Migration error: {}", e);
  }

  if app_config.seed_db {
    tracing::info!("Database seeding enabled (SEED_DB=true); no seed data configured.");
  }

  let gateway = MockPaymentGateway::new(
    Duration::from_millis(app_config.payment_processing_delay_ms),
    app_config.currency_code.clone(),
  );

  let app_state = AppState {
    db_pool: db_pool.clone(),
    config: app_config.clone(),
    carts: Arc::new(CartStore::new()),
    sessions: Arc::new(SessionStore::new()),
    store: Arc::new(PgStore::new(db_pool.clone())),
    gateway,
    checkout_saga: Arc::new(checkout::build_checkout_saga()),
  };
  tracing::info!("Checkout saga registered.");

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!(base_url = %app_config.app_base_url, "Public base URL configured.");
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::routes::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
