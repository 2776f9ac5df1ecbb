// tests/saga_execution_tests.rs
mod common; // Reference the common module

use common::*;
use saga::{ContextData, Saga, SagaError, SagaOutcome, StepControl};
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_saga_runs_steps_in_order() {
  setup_tracing();
  let mut saga =
    Saga::<TestContext, TestError>::new(&[("step1", false, None), ("step2", false, None), ("step3", false, None)]);

  saga.on_step("step1", simple_action("step1", " S1"));
  saga.on_step("step2", simple_action("step2", " S2"));
  saga.on_step("step3", simple_action("step3", " S3"));

  let ctx = ContextData::new(TestContext::default());
  let result = saga.run(ctx.clone()).await;

  assert!(result.is_ok());
  assert_eq!(result.unwrap(), SagaOutcome::Completed);

  let guard = ctx.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.message, " S1 S2 S3");
  assert_eq!(guard.steps_executed, vec!["step1", "step2", "step3"]);
  assert!(guard.compensations_executed.is_empty());
}

#[tokio::test]
#[serial]
async fn test_saga_stops_on_step_control_stop() {
  setup_tracing();
  let mut saga = Saga::<TestContext, TestError>::new(&[
    ("stepA", false, None),
    ("stopStep", false, None),
    ("stepC", false, None),
  ]);

  saga.on_step("stepA", simple_action("stepA", "A"));
  saga.on_step("stopStep", |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push("stopStep".to_string());
      Ok::<StepControl, TestError>(StepControl::Stop)
    })
  });
  saga.on_step("stepC", simple_action("stepC", "C")); // This should not run

  let ctx = ContextData::new(TestContext::default());
  let result = saga.run(ctx.clone()).await;

  assert!(result.is_ok());
  assert_eq!(result.unwrap(), SagaOutcome::Stopped);

  let guard = ctx.read();
  assert_eq!(guard.counter, 1); // Only stepA incremented
  assert_eq!(guard.message, "A");
  assert_eq!(guard.steps_executed, vec!["stepA", "stopStep"]);
  // A graceful stop compensates nothing.
  assert!(guard.compensations_executed.is_empty());
}

#[tokio::test]
#[serial]
async fn test_saga_propagates_action_error() {
  setup_tracing();
  let mut saga = Saga::<TestContext, TestError>::new(&[
    ("good_step", false, None),
    ("bad_step", false, None),
    ("another_step", false, None),
  ]);

  saga.on_step("good_step", simple_action("good_step", "Good"));
  saga.on_step("bad_step", failing_action("bad_step", "I am a bad step!"));
  saga.on_step("another_step", simple_action("another_step", "NeverRun"));

  let ctx = ContextData::new(TestContext::default());
  let result = saga.run(ctx.clone()).await;

  assert!(result.is_err());
  match result.err().unwrap() {
    TestError::Action(msg) => assert_eq!(msg, "I am a bad step!"),
    _ => panic!("Expected TestError::Action"),
  }

  let guard = ctx.read();
  assert_eq!(guard.counter, 1); // Only good_step incremented
  assert_eq!(guard.message, "Good");
  assert_eq!(guard.steps_executed, vec!["good_step", "bad_step"]);
}

#[tokio::test]
#[serial]
async fn test_saga_skips_step_if_condition_met() {
  setup_tracing();
  let mut saga = Saga::<TestContext, TestError>::new(&[
    ("step1", false, None),
    (
      "step_to_skip",
      false,
      Some(Arc::new(|ctx: ContextData<TestContext>| ctx.read().counter > 0)),
    ),
    ("step3", false, None),
  ]);

  saga.on_step("step1", simple_action("step1", " S1"));
  saga.on_step("step_to_skip", simple_action("step_to_skip", " SKIPPED_THIS"));
  saga.on_step("step3", simple_action("step3", " S3"));

  let ctx = ContextData::new(TestContext::default());
  let result = saga.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), SagaOutcome::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 2); // step1 and step3 ran
  assert_eq!(guard.message, " S1 S3");
  assert_eq!(guard.steps_executed, vec!["step1", "step3"]);
}

#[tokio::test]
#[serial]
async fn test_saga_errors_on_missing_action_for_required_step() {
  setup_tracing();
  let mut saga =
    Saga::<TestContext, TestError>::new(&[("step1", false, None), ("no_action_here", false, None)]);

  saga.on_step("step1", simple_action("step1", " S1"));
  // "no_action_here" never gets an action registered.

  let ctx = ContextData::new(TestContext::default());
  let result = saga.run(ctx.clone()).await;

  assert!(result.is_err());
  match result.err().unwrap() {
    TestError::Saga(msg) => assert!(msg.contains("no_action_here")),
    other => panic!("Expected TestError::Saga, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_saga_skips_missing_action_on_optional_step() {
  setup_tracing();
  let mut saga =
    Saga::<TestContext, TestError>::new(&[("step1", false, None), ("optional_no_action", true, None), ("step3", false, None)]);

  saga.on_step("step1", simple_action("step1", " S1"));
  saga.on_step("step3", simple_action("step3", " S3"));

  let ctx = ContextData::new(TestContext::default());
  let result = saga.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), SagaOutcome::Completed);
  let guard = ctx.read();
  assert_eq!(guard.steps_executed, vec!["step1", "step3"]);
}

#[tokio::test]
#[serial]
async fn test_saga_continues_after_optional_step_failure() {
  setup_tracing();
  let mut saga = Saga::<TestContext, TestError>::new(&[
    ("step1", false, None),
    ("flaky_optional", true, None),
    ("step3", false, None),
  ]);

  saga.on_step("step1", simple_action("step1", " S1"));
  saga.on_step("flaky_optional", failing_action("flaky_optional", "optional boom"));
  saga.on_step("step3", simple_action("step3", " S3"));

  let ctx = ContextData::new(TestContext::default());
  let result = saga.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), SagaOutcome::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 2);
  assert_eq!(
    guard.steps_executed,
    vec!["step1", "flaky_optional", "step3"]
  );
  // Nothing failed hard, so nothing was compensated.
  assert!(guard.compensations_executed.is_empty());
}

#[tokio::test]
#[serial]
async fn test_step_structure_manipulation() {
  setup_tracing();
  let mut saga = Saga::<TestContext, TestError>::new(&[("first", false, None), ("last", false, None)]);
  saga.insert_after_step("first", "middle", false, None);
  saga.insert_before_step("first", "zeroth", false, None);
  saga.remove_step("last");

  assert_eq!(saga.step_names(), vec!["zeroth", "first", "middle"]);

  saga.on_step("zeroth", simple_action("zeroth", " Z"));
  saga.on_step("first", simple_action("first", " F"));
  saga.on_step("middle", simple_action("middle", " M"));

  let ctx = ContextData::new(TestContext::default());
  let result = saga.run(ctx.clone()).await;
  assert_eq!(result.unwrap(), SagaOutcome::Completed);
  assert_eq!(ctx.read().message, " Z F M");
}

#[tokio::test]
#[serial]
async fn test_set_optional_and_set_skip_condition() {
  setup_tracing();
  let mut saga = Saga::<TestContext, TestError>::new(&[
    ("first", false, None),
    ("flaky", false, None),
    ("conditional", false, None),
  ]);

  // Downgrade "flaky" after construction and attach a skip condition to
  // "conditional" that fires once the first step has run.
  saga.set_optional("flaky", true);
  saga.set_skip_condition(
    "conditional",
    Some(Arc::new(|ctx: ContextData<TestContext>| ctx.read().counter >= 1)),
  );

  saga.on_step("first", simple_action("first", " F"));
  saga.on_step("flaky", failing_action("flaky", "tolerated boom"));
  saga.on_step("conditional", simple_action("conditional", " C"));

  let ctx = ContextData::new(TestContext::default());
  let result = saga.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), SagaOutcome::Completed);
  let guard = ctx.read();
  assert_eq!(guard.message, " F");
  assert_eq!(guard.steps_executed, vec!["first", "flaky"]);
}

#[tokio::test]
#[serial]
async fn test_saga_error_display() {
  setup_tracing();
  let err = SagaError::ActionMissing {
    step_name: "create_records".to_string(),
  };
  assert_eq!(
    err.to_string(),
    "Action missing for non-optional step: create_records"
  );
}
