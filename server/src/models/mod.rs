// server/src/models/mod.rs

//! Data structures representing database entities.

pub mod appointment;
pub mod attendance;
pub mod calendar_event;
pub mod child;
pub mod enrollment;
pub mod event;
pub mod notification;
pub mod order;
pub mod payment;
pub mod product;
pub mod program;
pub mod school;
pub mod team;
pub mod transaction;
pub mod user;

// Re-export the model structs for convenient access
pub use appointment::{AppointmentStatus, WellnessAppointment};
pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use calendar_event::CalendarEvent;
pub use child::Child;
pub use enrollment::{Enrollment, EnrollmentStatus};
pub use event::{EventRegistration, SportEvent};
pub use notification::Notification;
pub use order::{Order, OrderStatus};
pub use payment::{PaymentRecord, PaymentStatus, PaymentType};
pub use product::Product;
pub use program::{Program, ProgramLevel, ProgramStatus};
pub use school::School;
pub use team::{MatchResult, Team};
pub use transaction::{Subscription, Transaction};
pub use user::{User, UserRole};
