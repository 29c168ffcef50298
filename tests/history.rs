// Recording runs and moving through the recorded states

use lazycore::interpreter::engine::{EngineConfig, Interpreter, Machine};
use lazycore::interpreter::errors::{ErrorKind, EvalError};
use lazycore::interpreter::gmachine::{self, GMachine};
use lazycore::interpreter::ti::{self, TemplateMachine};
use lazycore::parser::parse;

fn recording() -> EngineConfig {
    EngineConfig {
        record_history: true,
        ..EngineConfig::default()
    }
}

fn ti_interpreter(source: &str, config: EngineConfig) -> Interpreter<TemplateMachine> {
    let program = parse(source).expect("Parsing failed");
    Interpreter::new(ti::compile(&program).expect("Compilation failed"), config)
}

fn gm_interpreter(source: &str, config: EngineConfig) -> Interpreter<GMachine> {
    let program = parse(source).expect("Parsing failed");
    Interpreter::new(gmachine::compile(&program).expect("Compilation failed"), config)
}

#[test]
fn test_history_matches_trace() {
    let source = "main = twice twice I 3";
    let mut interpreter = ti_interpreter(source, recording());
    interpreter.run().expect("Evaluation failed");

    let program = parse(source).unwrap();
    let trace = ti::trace(ti::compile(&program).unwrap(), 10_000).unwrap();
    let history: Vec<_> = interpreter.history().cloned().collect();
    assert_eq!(history, trace);
    assert_eq!(interpreter.total_snapshots(), interpreter.steps_taken() + 1);
    assert!(interpreter.is_finished());
}

#[test]
fn test_navigation() {
    let mut interpreter = gm_interpreter("main = S K K 3", recording());
    interpreter.run().expect("Evaluation failed");
    let last = interpreter.total_snapshots() - 1;
    assert_eq!(interpreter.history_position(), last);
    assert_eq!(interpreter.current().result_number(), Some(3));

    let err = interpreter.step_forward().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HistoryUnavailable);

    interpreter.step_backward().expect("step back");
    assert_eq!(interpreter.history_position(), last - 1);
    assert_eq!(interpreter.current().result_number(), None);
    // the live state is not affected by navigation
    assert_eq!(interpreter.state().result_number(), Some(3));

    interpreter.rewind_to_start().expect("rewind");
    assert_eq!(interpreter.history_position(), 0);
    assert!(matches!(
        interpreter.step_backward(),
        Err(EvalError::HistoryUnavailable { .. })
    ));
    assert_eq!(GMachine::view(interpreter.current()).steps, 0);

    interpreter.step_forward().expect("step forward");
    assert_eq!(GMachine::view(interpreter.current()).steps, 1);

    interpreter.jump_to_end();
    assert_eq!(interpreter.history_position(), last);
}

#[test]
fn test_failed_run_keeps_its_history() {
    let mut interpreter = ti_interpreter("main = 1 + head Nil", recording());
    let err = interpreter.run().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExplicitAbort);
    assert_eq!(interpreter.error(), Some(&err));
    assert!(!interpreter.is_finished());
    assert_eq!(interpreter.total_snapshots(), interpreter.steps_taken() + 1);

    interpreter.rewind_to_start().expect("rewind");
    let first = TemplateMachine::view(interpreter.current());
    assert_eq!(first.stack.len(), 1);
    assert_eq!(first.result, None);
}

#[test]
fn test_step_limit() {
    let config = EngineConfig {
        max_steps: 50,
        ..EngineConfig::default()
    };
    let mut interpreter = gm_interpreter("loop x = loop x ; main = loop 1", config);
    assert_eq!(
        interpreter.run(),
        Err(EvalError::StepLimitExceeded { limit: 50 })
    );
    assert_eq!(interpreter.steps_taken(), 50);
}

#[test]
fn test_snapshot_limit() {
    let config = EngineConfig {
        snapshot_limit: 20_000,
        record_history: true,
        ..EngineConfig::default()
    };
    let mut interpreter = ti_interpreter("fac n = if (n == 0) 1 (n * fac (n - 1)) ; main = fac 10", config);
    let err = interpreter.run().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SnapshotLimitExceeded);
    assert!(interpreter.total_snapshots() > 0);
}

#[test]
fn test_nothing_recorded_without_history() {
    let mut interpreter = ti_interpreter("main = S K K 3", EngineConfig::default());
    interpreter.run().expect("Evaluation failed");
    assert_eq!(interpreter.total_snapshots(), 0);
    assert!(interpreter.rewind_to_start().is_err());
    // the live state stands in for the missing history
    assert_eq!(interpreter.current().result_number(), Some(3));
    assert_eq!(interpreter.into_state().result_number(), Some(3));
}
