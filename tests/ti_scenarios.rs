// Integration tests for the template instantiation engine

use lazycore::interpreter::errors::{CompileError, ErrorKind, EvalError};
use lazycore::interpreter::ti::{self, TiNode, TiState, TRUE_TAG};
use lazycore::parser::parse;

fn run(source: &str) -> Result<TiState, EvalError> {
    let program = parse(source).expect("Parsing failed");
    let state = ti::compile(&program).expect("Compilation failed");
    ti::evaluate_with_limit(state, 1_000_000)
}

fn run_number(source: &str) -> i64 {
    let state = run(source).expect("Evaluation failed");
    state.result_number().expect("Result is not a number")
}

#[test]
fn test_twice_twice_identity() {
    assert_eq!(run_number("main = twice twice I 3"), 3);
}

#[test]
fn test_skk_is_identity() {
    assert_eq!(run_number("main = S K K 3"), 3);
}

#[test]
fn test_factorial() {
    let source = r#"
        fac n = if (n == 0) 1 (n * fac (n - 1)) ;
        main = fac 10
    "#;
    assert_eq!(run_number(source), 3628800);
}

#[test]
fn test_nested_pairs() {
    let source = "main = fst (snd (fst (MkPair (MkPair 1 (MkPair 2 3)) 4)))";
    assert_eq!(run_number(source), 2);
}

#[test]
fn test_letrec_ties_the_knot() {
    let source = r#"
        pair x y f = f x y ;
        fst p = p K ;
        snd p = p K1 ;
        f x y = letrec
                    a = pair x b ;
                    b = pair y a
                in fst (snd (snd (snd a))) ;
        main = f 3 4
    "#;
    assert_eq!(run_number(source), 4);
}

#[test]
fn test_list_length() {
    let source = r#"
        list = Cons 3 (Cons 2 (Cons 1 Nil)) ;
        main = length list
    "#;
    assert_eq!(run_number(source), 3);
}

#[test]
fn test_head_of_nil_aborts() {
    let err = run("main = head Nil").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExplicitAbort);
    assert!(err.address().is_some());
}

#[test]
fn test_head_and_tail() {
    let source = r#"
        list = Cons 3 (Cons 2 (Cons 1 Nil)) ;
        main = head (tail list) * 10 + head list
    "#;
    assert_eq!(run_number(source), 23);
}

#[test]
fn test_print_list() {
    let source = "main = printList (Cons 1 (Cons (2 + 3) (Cons 6 Nil)))";
    let state = run(source).expect("Evaluation failed");
    assert_eq!(state.output, vec![1, 5, 6]);
    assert!(state.stack.is_empty());
    assert!(ti::is_final(&state));
}

#[test]
fn test_boolean_result_is_data() {
    let state = run("main = not (3 > 4) & (1 ~= 2)").expect("Evaluation failed");
    assert!(matches!(
        state.result(),
        Some(TiNode::Data { tag, components }) if *tag == TRUE_TAG && components.is_empty()
    ));
}

#[test]
fn test_let_shares_its_definition() {
    let source = r#"
        square x = x * x ;
        main = let y = square 7 in y + y
    "#;
    let state = run(source).expect("Evaluation failed");
    assert_eq!(state.result_number(), Some(98));
    // square is entered once even though y is used twice
    let squares = run("square x = x * x ; main = square 7 + square 7").expect("Evaluation failed");
    assert!(squares.stats.sc_reductions > state.stats.sc_reductions);
}

#[test]
fn test_expensive_letrec_binding_is_reduced_once() {
    let once = r#"
        sum n = if (n == 0) 0 (n + sum (n - 1)) ;
        main = letrec x = sum 200 in x + x
    "#;
    let twice = r#"
        sum n = if (n == 0) 0 (n + sum (n - 1)) ;
        main = sum 200 + sum 200
    "#;
    let shared = run(once).expect("Evaluation failed");
    let unshared = run(twice).expect("Evaluation failed");
    assert_eq!(shared.result_number(), Some(40200));
    assert_eq!(unshared.result_number(), Some(40200));
    // the shared run does roughly half the work
    assert!(shared.stats.sc_reductions * 3 < unshared.stats.sc_reductions * 2);
}

#[test]
fn test_user_definitions_shadow_prelude() {
    let source = r#"
        K x y = y ;
        main = K 1 2
    "#;
    assert_eq!(run_number(source), 2);
}

#[test]
fn test_compile_errors() {
    let missing = ti::compile(&parse("f = 1").unwrap()).unwrap_err();
    assert_eq!(missing, CompileError::MissingMain);

    let arity = ti::compile(&parse("main x = x").unwrap()).unwrap_err();
    assert_eq!(arity, CompileError::MainTakesArguments { arity: 1 });

    let lambda = ti::compile(&parse("main = (\\x . x) 1").unwrap()).unwrap_err();
    assert!(matches!(lambda, CompileError::Unsupported { construct: "lambda abstraction", .. }));
}

#[test]
fn test_unbound_name() {
    let err = run("main = missing 1").unwrap_err();
    assert!(matches!(err, EvalError::UnboundName { ref name } if name.as_str() == "missing"));
}

#[test]
fn test_stop_and_print_only_end_the_program() {
    let err = run("main = stop 1").unwrap_err();
    assert_eq!(
        err,
        EvalError::InvalidTermination {
            reason: "stop reached with arguments left on the stack"
        }
    );

    let err = run("main = negate (print 1 2)").unwrap_err();
    assert_eq!(
        err,
        EvalError::InvalidTermination {
            reason: "print reached while an argument was being forced"
        }
    );
}

#[test]
fn test_data_primitives_check_their_scrutinee() {
    let err = run("main = length 3").unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch { expected: "list", .. }));

    // a pair has tag 1 like False, but carries components
    let err = run("main = if (MkPair 1 2) 1 2").unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch { expected: "boolean", .. }));
}

#[test]
fn test_non_terminating_program_hits_step_limit() {
    let program = parse("loop x = loop x ; main = loop 1").unwrap();
    let err = ti::evaluate_with_limit(ti::compile(&program).unwrap(), 500).unwrap_err();
    assert_eq!(err, EvalError::StepLimitExceeded { limit: 500 });
}

#[test]
fn test_evaluation_is_deterministic() {
    let source = "fac n = if (n == 0) 1 (n * fac (n - 1)) ; main = fac 5";
    let program = parse(source).unwrap();
    let first = ti::trace(ti::compile(&program).unwrap(), 10_000).unwrap();
    let second = ti::trace(ti::compile(&program).unwrap(), 10_000).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.last().and_then(TiState::result_number), Some(120));
}
