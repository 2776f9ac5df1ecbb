// saga/src/core/control.rs

//! Defines signals for controlling saga flow and the outcome of a saga run.

/// Signal from an action indicating whether the saga should continue or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  /// Continue with the subsequent steps.
  Continue,
  /// Halt the saga gracefully. No further steps execute and no compensation
  /// runs; a stopping action is expected to have left nothing to undo.
  Stop,
}

/// Outcome of a full saga execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaOutcome {
  /// All non-skipped steps ran to completion.
  Completed,
  /// The saga was explicitly stopped by an action returning `StepControl::Stop`.
  Stopped,
}
