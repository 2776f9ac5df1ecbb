// saga/src/error.rs
use thiserror::Error;

/// Configuration errors the engine itself can surface through the
/// application's error type. Bad step names at construction time panic
/// instead; see `Saga::ensure_step_exists`.
#[derive(Debug, Error)]
pub enum SagaError {
  #[error("Action missing for non-optional step: {step_name}")]
  ActionMissing { step_name: String },
}
