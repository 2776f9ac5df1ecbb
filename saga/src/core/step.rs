// saga/src/core/step.rs

//! Defines the structure of a single saga step and its handler types.

use super::context_data::ContextData;
use super::control::StepControl;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The forward action of a step.
///
/// An action is an asynchronous function that receives a clone of the shared
/// `ContextData<TData>` and resolves to `Result<StepControl, Err>`. Actions
/// must drop any lock guards before awaiting.
pub type Action<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// The compensating action of a step, run in reverse order when a later,
/// non-optional step fails. Compensations undo whatever the forward action
/// persisted; they receive the same shared context.
pub type Compensation<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<(), Err>> + Send>>
    + Send
    + Sync,
>;

// Skip conditions operate on the shared context and are evaluated before the
// step's action. Arc so they are cheaply cloneable.
pub type SkipCondition<TData> =
  Arc<dyn Fn(ContextData<TData>) -> bool + Send + Sync + 'static>;

/// Definition of a saga step: its name, optionality, and skip condition.
#[derive(Clone)]
pub struct StepDef<T: 'static + Send + Sync> {
  pub name: String,
  /// Optional steps may fail (or lack an action) without aborting the saga.
  pub optional: bool,
  /// Condition evaluated before executing the step. If true, the step is skipped.
  pub skip_if: Option<SkipCondition<T>>,
}

impl<T: 'static + Send + Sync> std::fmt::Debug for StepDef<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}
