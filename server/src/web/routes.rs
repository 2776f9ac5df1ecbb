// server/src/web/routes.rs

use actix_web::web;

use crate::web::handlers;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called from `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/signup", web::post().to(handlers::auth_handlers::signup_handler))
          .route("/signin", web::post().to(handlers::auth_handlers::signin_handler))
          .route("/signout", web::post().to(handlers::auth_handlers::signout_handler))
          .route("/me", web::get().to(handlers::auth_handlers::me_handler)),
      )
      .service(
        web::scope("/schools")
          .route("", web::get().to(handlers::school_handlers::list_schools_handler))
          .route("", web::post().to(handlers::school_handlers::create_school_handler))
          .route("/{school_id}", web::get().to(handlers::school_handlers::get_school_handler))
          .route(
            "/{school_id}/programs",
            web::get().to(handlers::program_handlers::list_school_programs_handler),
          ),
      )
      .service(
        web::scope("/programs")
          .route("", web::get().to(handlers::program_handlers::list_programs_handler))
          .route("", web::post().to(handlers::program_handlers::create_program_handler))
          .route("/{program_id}", web::get().to(handlers::program_handlers::get_program_handler))
          .route(
            "/{program_id}",
            web::put().to(handlers::program_handlers::update_program_handler),
          ),
      )
      .service(
        web::scope("/products")
          .route("", web::get().to(handlers::product_handlers::list_products_handler))
          .route("", web::post().to(handlers::product_handlers::create_product_handler))
          .route("/{product_id}", web::get().to(handlers::product_handlers::get_product_handler)),
      )
      .service(
        web::scope("/cart")
          .route("", web::get().to(handlers::cart_handlers::get_cart_handler))
          .route("", web::delete().to(handlers::cart_handlers::clear_cart_handler))
          .route("/add", web::post().to(handlers::cart_handlers::add_to_cart_handler))
          .route(
            "/items/{item_id}",
            web::patch().to(handlers::cart_handlers::update_quantity_handler),
          )
          .route(
            "/items/{item_id}",
            web::delete().to(handlers::cart_handlers::remove_from_cart_handler),
          ),
      )
      .service(
        web::scope("/checkout")
          .route("", web::post().to(handlers::checkout_handlers::start_checkout_handler)),
      )
      .service(
        web::scope("/enrollments")
          .route("", web::get().to(handlers::enrollment_handlers::list_my_enrollments_handler)),
      )
      .service(
        web::scope("/orders")
          .route("", web::get().to(handlers::order_handlers::list_my_orders_handler)),
      )
      .service(
        web::scope("/notifications")
          .route("", web::get().to(handlers::notification_handlers::list_notifications_handler))
          .route(
            "/{notification_id}/read",
            web::post().to(handlers::notification_handlers::mark_read_handler),
          ),
      )
      .service(
        web::scope("/calendar")
          .route("", web::get().to(handlers::calendar_handlers::list_calendar_handler)),
      )
      .service(
        web::scope("/events")
          .route("", web::get().to(handlers::event_handlers::list_events_handler))
          .route("", web::post().to(handlers::event_handlers::create_event_handler))
          .route(
            "/{event_id}/register",
            web::post().to(handlers::event_handlers::register_for_event_handler),
          ),
      )
      .service(
        web::scope("/children")
          .route("", web::get().to(handlers::child_handlers::list_children_handler))
          .route("", web::post().to(handlers::child_handlers::create_child_handler)),
      )
      .service(
        web::scope("/attendance")
          .route("", web::post().to(handlers::attendance_handlers::record_attendance_handler))
          .route(
            "/program/{program_id}",
            web::get().to(handlers::attendance_handlers::list_program_attendance_handler),
          ),
      )
      .service(
        web::scope("/teams")
          .route("", web::get().to(handlers::team_handlers::list_teams_handler))
          .route("", web::post().to(handlers::team_handlers::create_team_handler))
          .route(
            "/{team_id}/match-results",
            web::get().to(handlers::team_handlers::list_match_results_handler),
          )
          .route(
            "/{team_id}/match-results",
            web::post().to(handlers::team_handlers::record_match_result_handler),
          ),
      )
      .service(
        web::scope("/appointments")
          .route("", web::get().to(handlers::appointment_handlers::list_my_appointments_handler)),
      )
      .service(
        web::scope("/payments")
          .route("", web::get().to(handlers::payment_handlers::list_my_payments_handler))
          .route(
            "/transactions/{student_id}",
            web::get().to(handlers::payment_handlers::list_transactions_handler),
          )
          .route(
            "/subscriptions/{student_id}",
            web::get().to(handlers::payment_handlers::list_subscriptions_handler),
          )
          .route(
            "/cancel-subscription/{subscription_id}",
            web::post().to(handlers::payment_handlers::cancel_subscription_handler),
          )
          .route(
            "/receipts/{receipt_number}",
            web::get().to(handlers::payment_handlers::get_receipt_handler),
          ),
      )
      .service(
        web::scope("/webhooks")
          .route("/{source}", web::post().to(handlers::webhook_handlers::generic_webhook_handler)),
      ),
  );
}
