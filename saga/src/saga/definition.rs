// saga/src/saga/definition.rs

//! Contains the `Saga<TData, Err>` struct definition and methods for its
//! construction and structural modification.

use crate::core::context_data::ContextData;
use crate::core::control::StepControl;
use crate::core::step::{Action, Compensation, SkipCondition, StepDef};
use std::collections::HashMap;
use std::future::Future;

/// The core saga type, generic over an underlying shared data type `TData`
/// and an error type `Err` that its actions return.
///
/// `TData` must be `'static + Send + Sync`.
/// `Err` must be `std::error::Error + Send + Sync + 'static` and additionally
/// `From<crate::error::SagaError>` so the engine can surface its own
/// configuration errors through the application's error type.
pub struct Saga<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<crate::error::SagaError> + Send + Sync + 'static,
{
  /// Ordered list of step definitions for this saga.
  pub(crate) steps: Vec<StepDef<TData>>,

  /// Forward action per step.
  pub(crate) actions: HashMap<String, Action<TData, Err>>,

  /// Compensation per step, run in reverse order on failure.
  pub(crate) compensations: HashMap<String, Compensation<TData, Err>>,
}

impl<TData, Err> Saga<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<crate::error::SagaError> + Send + Sync + 'static,
{
  /// Creates a new `Saga` with an initial set of step definitions.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_cond_opt)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_cond_opt.clone(),
      })
      .collect();

    Self {
      steps,
      actions: HashMap::new(),
      compensations: HashMap::new(),
    }
  }

  /// Ensures that a step with the given name exists. Panics if not found;
  /// a bad step name is a setup error, not a runtime condition.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "Saga setup error: Step '{}' not found in saga definition.",
        step_name
      );
    }
  }

  fn ensure_step_not_exists(&self, step_name: &str) {
    if self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "Saga setup error: Step '{}' already exists in saga definition.",
        step_name
      );
    }
  }

  /// Registers the forward action for a step. Replaces any previous action.
  pub fn on_step<F, Fut>(&mut self, step_name: &str, action: F) -> &mut Self
  where
    F: Fn(ContextData<TData>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StepControl, Err>> + Send + 'static,
  {
    self.ensure_step_exists(step_name);
    self
      .actions
      .insert(step_name.to_string(), Box::new(move |ctx| Box::pin(action(ctx))));
    self
  }

  /// Registers the compensating action for a step. The compensation runs only
  /// if this step's action completed and a later, non-optional step failed.
  pub fn compensate_step<F, Fut>(&mut self, step_name: &str, compensation: F) -> &mut Self
  where
    F: Fn(ContextData<TData>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Err>> + Send + 'static,
  {
    self.ensure_step_exists(step_name);
    self
      .compensations
      .insert(step_name.to_string(), Box::new(move |ctx| Box::pin(compensation(ctx))));
    self
  }

  // --- Basic Step Manipulation Methods ---

  pub fn insert_before_step<S: Into<String>>(
    &mut self,
    existing_step_name: &str,
    new_step_name: S,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) {
    self.ensure_step_exists(existing_step_name);
    let idx = self
      .steps
      .iter()
      .position(|s| s.name == existing_step_name)
      .unwrap();
    let name_str: String = new_step_name.into();
    self.ensure_step_not_exists(&name_str);
    self.steps.insert(
      idx,
      StepDef {
        name: name_str,
        optional,
        skip_if,
      },
    );
  }

  pub fn insert_after_step<S: Into<String>>(
    &mut self,
    existing_step_name: &str,
    new_step_name: S,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) {
    self.ensure_step_exists(existing_step_name);
    let idx = self
      .steps
      .iter()
      .position(|s| s.name == existing_step_name)
      .unwrap();
    let name_str: String = new_step_name.into();
    self.ensure_step_not_exists(&name_str);
    self.steps.insert(
      idx + 1,
      StepDef {
        name: name_str,
        optional,
        skip_if,
      },
    );
  }

  pub fn remove_step(&mut self, step_name: &str) {
    if let Some(idx) = self.steps.iter().position(|s| s.name == step_name) {
      self.steps.remove(idx);
      self.actions.remove(step_name);
      self.compensations.remove(step_name);
    }
    // Removal of a non-existent step is a no-op.
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) {
    self.ensure_step_exists(step_name);
    self
      .steps
      .iter_mut()
      .find(|s| s.name == step_name)
      .unwrap()
      .optional = optional;
  }

  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<TData>>) {
    self.ensure_step_exists(step_name);
    self
      .steps
      .iter_mut()
      .find(|s| s.name == step_name)
      .unwrap()
      .skip_if = skip_if;
  }

  /// Names of the defined steps, in execution order.
  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }
}
