// src/lib.rs

//! An ASYNC compensating step orchestrator for Rust.
//!
//! A `Saga` is an ordered list of named steps, each with an asynchronous
//! action and an optional asynchronous compensation. Features:
//!  - Named steps with per-step skip conditions.
//!  - Asynchronous actions for I/O-bound operations.
//!  - Early stopping or continuing of saga execution.
//!  - Optional steps whose failure does not abort the run.
//!  - Reverse-order compensation of completed steps when a later,
//!    non-optional step fails, so a multi-write flow never leaves a mix of
//!    created and missing records behind.

pub mod core;
pub mod error;
pub mod saga;

// --- Re-exports for the Public API ---

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{SagaOutcome, StepControl};
pub use crate::core::step::{Action, Compensation, SkipCondition, StepDef};

pub use crate::error::SagaError;

pub use crate::saga::definition::Saga;
