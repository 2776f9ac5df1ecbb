// server/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::cart::{Cart, CartLine, CartLineKind};
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

/// What the client wants to add. Prices and discounts are never taken from
/// the client; they are read from the database here.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AddToCartPayload {
  Enrollment {
    program_id: Uuid,
  },
  Product {
    product_id: Uuid,
    #[serde(default = "default_quantity")]
    quantity: i32,
  },
  Appointment {
    professional_id: Uuid,
    appointment_date: NaiveDate,
    appointment_time: NaiveTime,
    service_type: String,
    /// Whole COP pesos, quoted by the professional's listing.
    price: i64,
  },
}

fn default_quantity() -> i32 {
  1
}

#[derive(Deserialize, Debug)]
pub struct UpdateQuantityPayload {
  pub delta: i32,
}

fn cart_response(cart: &Cart) -> serde_json::Value {
  json!({
    "lines": cart.lines,
    "total": cart.total(),
    "itemCount": cart.item_count(),
  })
}

#[instrument(name = "handler::get_cart", skip(app_state), fields(user_id = %user.user_id))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = app_state.carts.get(user.user_id);
  Ok(HttpResponse::Ok().json(cart_response(&cart)))
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, payload),
  fields(user_id = %user.user_id)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  payload: web::Json<AddToCartPayload>,
) -> Result<HttpResponse, AppError> {
  let line = match payload.into_inner() {
    AddToCartPayload::Enrollment { program_id } => {
      let row: Option<(Uuid, String, i64, String)> = sqlx::query_as(
        "SELECT school_id, name, price, status::text FROM programs WHERE id = $1",
      )
      .bind(program_id)
      .fetch_optional(&app_state.db_pool)
      .await?;
      let (school_id, name, price, status) =
        row.ok_or_else(|| AppError::NotFound(format!("Program {} not found", program_id)))?;
      if status != "active" {
        return Err(AppError::Validation(format!(
          "Program '{}' is not open for enrollment",
          name
        )));
      }
      CartLine {
        item_id: program_id,
        kind: CartLineKind::Enrollment {
          program_id,
          school_id,
        },
        name,
        description: None,
        unit_price: price,
        quantity: 1,
        discount_percent: 0,
      }
    }
    AddToCartPayload::Product {
      product_id,
      quantity,
    } => {
      if quantity < 1 {
        return Err(AppError::Validation("Quantity must be at least 1".to_string()));
      }
      let row: Option<(Uuid, String, i64, i32, Option<i32>)> = sqlx::query_as(
        "SELECT vendor_id, name, price, stock, discount FROM products WHERE id = $1",
      )
      .bind(product_id)
      .fetch_optional(&app_state.db_pool)
      .await?;
      let (vendor_id, name, price, stock, discount) =
        row.ok_or_else(|| AppError::NotFound(format!("Product {} not found", product_id)))?;
      if stock < 1 {
        return Err(AppError::InsufficientStock { available: 0 });
      }
      CartLine {
        item_id: product_id,
        kind: CartLineKind::Product {
          product_id,
          vendor_id,
          stock,
        },
        name,
        description: None,
        unit_price: price,
        quantity,
        discount_percent: discount.unwrap_or(0),
      }
    }
    AddToCartPayload::Appointment {
      professional_id,
      appointment_date,
      appointment_time,
      service_type,
      price,
    } => {
      if price <= 0 {
        return Err(AppError::Validation("Appointment price must be positive".to_string()));
      }
      CartLine {
        item_id: Uuid::new_v4(),
        kind: CartLineKind::Appointment {
          professional_id,
          appointment_date,
          appointment_time,
          service_type: service_type.clone(),
        },
        name: service_type,
        description: None,
        unit_price: price,
        quantity: 1,
        discount_percent: 0,
      }
    }
  };

  info!(item = %line.name, "Adding item to cart.");
  let cart = app_state.carts.with_cart(user.user_id, |cart| {
    cart.add(line);
    cart.clone()
  });
  Ok(HttpResponse::Ok().json(cart_response(&cart)))
}

#[instrument(
  name = "handler::update_cart_quantity",
  skip(app_state, payload),
  fields(user_id = %user.user_id)
)]
pub async fn update_quantity_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateQuantityPayload>,
) -> Result<HttpResponse, AppError> {
  let item_id = path.into_inner();
  let cart = app_state.carts.with_cart(user.user_id, |cart| {
    cart.update_quantity(item_id, payload.delta);
    cart.clone()
  });
  Ok(HttpResponse::Ok().json(cart_response(&cart)))
}

#[instrument(name = "handler::remove_from_cart", skip(app_state), fields(user_id = %user.user_id))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let item_id = path.into_inner();
  let cart = app_state.carts.with_cart(user.user_id, |cart| {
    cart.remove(item_id);
    cart.clone()
  });
  Ok(HttpResponse::Ok().json(cart_response(&cart)))
}

#[instrument(name = "handler::clear_cart", skip(app_state), fields(user_id = %user.user_id))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = app_state.carts.with_cart(user.user_id, |cart| {
    cart.clear();
    cart.clone()
  });
  Ok(HttpResponse::Ok().json(cart_response(&cart)))
}
