// saga/src/core/mod.rs

pub mod context_data;
pub mod control;
pub mod step;

pub use context_data::ContextData;
pub use control::{SagaOutcome, StepControl};
pub use step::{Action, Compensation, SkipCondition, StepDef};
