// server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Product;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CreateProductPayload {
  pub name: String,
  pub description: Option<String>,
  pub price: i64,
  pub stock: i32,
  pub category: String,
  pub image_url: Option<String>,
  pub discount: Option<i32>,
}

#[derive(Deserialize, Debug)]
pub struct ProductListQuery {
  pub category: Option<String>,
}

#[instrument(name = "handler::list_products", skip(app_state, query))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ProductListQuery>,
) -> Result<HttpResponse, AppError> {
  let products: Vec<Product> = match &query.category {
    Some(category) => {
      sqlx::query_as("SELECT * FROM products WHERE category = $1 ORDER BY created_at DESC")
        .bind(category)
        .fetch_all(&app_state.db_pool)
        .await?
    }
    None => {
      sqlx::query_as("SELECT * FROM products ORDER BY created_at DESC")
        .fetch_all(&app_state.db_pool)
        .await?
    }
  };
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::get_product", skip(app_state))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
    .bind(product_id)
    .fetch_optional(&app_state.db_pool)
    .await?;
  let product =
    product.ok_or_else(|| AppError::NotFound(format!("Product {} not found", product_id)))?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(
  name = "handler::create_product",
  skip(app_state, payload),
  fields(vendor_id = %user.user_id)
)]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  payload: web::Json<CreateProductPayload>,
) -> Result<HttpResponse, AppError> {
  if payload.name.trim().is_empty() {
    return Err(AppError::Validation("Product name is required".to_string()));
  }
  if payload.price <= 0 {
    return Err(AppError::Validation("Price must be positive".to_string()));
  }
  if payload.stock < 0 {
    return Err(AppError::Validation("Stock cannot be negative".to_string()));
  }
  if let Some(discount) = payload.discount {
    if !(0..=100).contains(&discount) {
      return Err(AppError::Validation("Discount must be between 0 and 100".to_string()));
    }
  }

  let product: Product = sqlx::query_as(
    "INSERT INTO products (id, vendor_id, name, description, price, stock, category, image_url, discount) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(user.user_id)
  .bind(&payload.name)
  .bind(&payload.description)
  .bind(payload.price)
  .bind(payload.stock)
  .bind(&payload.category)
  .bind(&payload.image_url)
  .bind(payload.discount)
  .fetch_one(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Created().json(product))
}
