// saga/src/saga/execution.rs

//! Contains the `Saga::run()` method, responsible for executing steps in order
//! and compensating completed steps in reverse when a later step fails.

use crate::core::context_data::ContextData;
use crate::core::control::{SagaOutcome, StepControl};
use crate::core::step::StepDef;
use crate::error::SagaError;
use crate::saga::definition::Saga;
use tracing::{event, instrument, span, Level};

impl<TData, Err> Saga<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<SagaError> + Send + Sync + 'static,
{
  /// Executes the saga against the given shared context `ctx_data`.
  ///
  /// Returns `Result<SagaOutcome, Err>`, where `Err` is the error type
  /// returned by this saga's actions.
  ///
  /// Failure semantics:
  /// - An action returning `StepControl::Stop` halts with `Ok(Stopped)`;
  ///   nothing is compensated.
  /// - An action error on an optional step is logged and execution continues.
  ///   The step does not count as completed.
  /// - An action error on a non-optional step (or a missing action for one)
  ///   triggers the compensations of every previously completed step, in
  ///   reverse order, before the error is returned.
  /// - A failing compensation is logged and the remaining compensations still
  ///   run.
  #[instrument(
        name = "Saga::run",
        skip_all,
        fields(
            saga_context_data_type = %std::any::type_name::<TData>(),
            saga_error_type = %std::any::type_name::<Err>(),
            num_steps = self.steps.len(),
        ),
        err(Display)
    )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<SagaOutcome, Err> {
    event!(Level::DEBUG, "Saga execution starting.");

    // Steps whose action completed successfully, in execution order.
    let mut completed: Vec<&StepDef<TData>> = Vec::with_capacity(self.steps.len());

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name_str = step_def.name.as_str();

      let step_span = span!(
        Level::INFO,
        "saga_step_execution",
        step_name = step_name_str,
        step_index = step_idx,
        optional = step_def.optional
      );
      let _step_span_guard = step_span.enter();
      event!(Level::DEBUG, "Processing step.");

      if let Some(skip_cond_fn) = &step_def.skip_if {
        if skip_cond_fn(ctx_data.clone()) {
          event!(Level::INFO, "Step skipped due to 'skip_if' condition.");
          continue;
        }
      }

      let action = match self.actions.get(step_name_str) {
        Some(a) => a,
        None if step_def.optional => {
          event!(Level::DEBUG, "Optional step has no action, skipping.");
          continue;
        }
        None => {
          event!(Level::ERROR, "Non-optional step has no action.");
          self.compensate(&completed, ctx_data.clone()).await;
          return Err(Err::from(SagaError::ActionMissing {
            step_name: step_def.name.clone(),
          }));
        }
      };

      match action(ctx_data.clone()).await {
        Ok(StepControl::Continue) => {
          completed.push(step_def);
        }
        Ok(StepControl::Stop) => {
          event!(Level::INFO, "Saga stopped by action.");
          return Ok(SagaOutcome::Stopped);
        }
        Err(e) if step_def.optional => {
          event!(Level::WARN, error = %e, "Optional step failed; continuing.");
        }
        Err(e) => {
          event!(Level::ERROR, error = %e, "Step action failed; compensating completed steps.");
          self.compensate(&completed, ctx_data.clone()).await;
          return Err(e);
        }
      }
      event!(Level::DEBUG, "Step processing finished.");
    }

    event!(Level::DEBUG, "Saga execution completed successfully.");
    Ok(SagaOutcome::Completed)
  }

  /// Runs the compensations of `completed` steps in reverse order.
  async fn compensate(&self, completed: &[&StepDef<TData>], ctx_data: ContextData<TData>) {
    for step_def in completed.iter().rev() {
      let step_name_str = step_def.name.as_str();
      let comp_span = span!(Level::INFO, "saga_step_compensation", step_name = step_name_str);
      let _comp_span_guard = comp_span.enter();

      let Some(compensation) = self.compensations.get(step_name_str) else {
        event!(Level::DEBUG, "Step has no compensation, skipping.");
        continue;
      };

      match compensation(ctx_data.clone()).await {
        Ok(()) => {
          event!(Level::INFO, "Step compensated.");
        }
        Err(e) => {
          event!(Level::WARN, error = %e, "Compensation failed; continuing with remaining compensations.");
        }
      }
    }
  }
}
