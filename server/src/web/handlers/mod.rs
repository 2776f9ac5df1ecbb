// server/src/web/handlers/mod.rs

pub mod appointment_handlers;
pub mod attendance_handlers;
pub mod auth_handlers;
pub mod calendar_handlers;
pub mod cart_handlers;
pub mod checkout_handlers;
pub mod child_handlers;
pub mod enrollment_handlers;
pub mod event_handlers;
pub mod notification_handlers;
pub mod order_handlers;
pub mod payment_handlers;
pub mod product_handlers;
pub mod program_handlers;
pub mod school_handlers;
pub mod team_handlers;
pub mod webhook_handlers;
