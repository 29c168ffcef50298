// Both engines must agree on every program they can both run

use arbtest::arbitrary::{Result, Unstructured};
use arbtest::arbtest;
use lazycore::interpreter::errors::ErrorKind;
use lazycore::interpreter::{gmachine, ti};
use lazycore::parser::parse;

const HELPERS: &str = r#"
    double x = x + x ;
    pick c a b = if (c > 0) a b ;
    sum n = if (n <= 0) 0 (n + sum (n - 1)) ;
"#;

/// Final number or failure kind of one engine
type Outcome = std::result::Result<Option<i64>, ErrorKind>;

fn run_both(source: &str) -> (Outcome, Outcome) {
    let program = parse(source).unwrap_or_else(|e| panic!("{}\n{}", e, source));
    let ti_outcome = ti::evaluate_with_limit(ti::compile(&program).unwrap(), 1_000_000)
        .map(|s| s.result_number())
        .map_err(|e| e.kind());
    let gm_outcome = gmachine::evaluate_with_limit(gmachine::compile(&program).unwrap(), 1_000_000)
        .map(|s| s.result_number())
        .map_err(|e| e.kind());
    (ti_outcome, gm_outcome)
}

fn assert_agree(source: &str, expected: i64) {
    let (ti_outcome, gm_outcome) = run_both(source);
    assert_eq!(ti_outcome, Ok(Some(expected)), "ti on {}", source);
    assert_eq!(gm_outcome, Ok(Some(expected)), "gm on {}", source);
}

#[test]
fn test_scenarios_agree() {
    assert_agree("main = twice twice I 3", 3);
    assert_agree("main = S K K 3", 3);
    assert_agree("fac n = if (n == 0) 1 (n * fac (n - 1)) ; main = fac 10", 3628800);
    assert_agree(
        r#"
        pair x y f = f x y ;
        fst p = p K ;
        snd p = p K1 ;
        f x y = letrec a = pair x b ; b = pair y a in fst (snd (snd (snd a))) ;
        main = f 3 4
        "#,
        4,
    );
}

#[test]
fn test_helpers_agree() {
    let source = format!("{} main = pick (sum 4 - 9) (double 21) (sum 100)", HELPERS);
    assert_agree(&source, 42);
}

#[test]
fn test_division_by_zero_agrees() {
    let (ti_outcome, gm_outcome) = run_both("main = K 1 (1 / 0) + 10 / (2 - 2)");
    assert_eq!(ti_outcome, Err(ErrorKind::DivisionByZero));
    assert_eq!(gm_outcome, Err(ErrorKind::DivisionByZero));
}

/// Random numeric expression built from literals, arithmetic, `if`, `let`
/// and the helper definitions
fn expression(u: &mut Unstructured<'_>, depth: usize) -> Result<String> {
    let leaf = depth == 0 || u.ratio(1, 4)?;
    if leaf {
        let n = u.int_in_range(0..=20)?;
        return Ok(if u.ratio(1, 5)? {
            format!("(negate {})", n)
        } else {
            n.to_string()
        });
    }
    let choice = u.int_in_range(0..=6)?;
    Ok(match choice {
        0..=2 => {
            let op = u.choose(&["+", "-", "*", "/"])?;
            let left = expression(u, depth - 1)?;
            let right = expression(u, depth - 1)?;
            format!("({} {} {})", left, op, right)
        }
        3 => {
            let op = u.choose(&["<", "<=", ">", ">=", "==", "~="])?;
            let (a, b) = (expression(u, depth - 1)?, expression(u, depth - 1)?);
            let (then, otherwise) = (expression(u, depth - 1)?, expression(u, depth - 1)?);
            format!("(if ({} {} {}) {} {})", a, op, b, then, otherwise)
        }
        4 => format!("(double {})", expression(u, depth - 1)?),
        5 => {
            let c = expression(u, depth - 1)?;
            let a = expression(u, depth - 1)?;
            let b = expression(u, depth - 1)?;
            format!("(pick {} {} {})", c, a, b)
        }
        _ => {
            let bound = expression(u, depth - 1)?;
            let body = expression(u, depth - 1)?;
            format!("(let v = {} in {} + v * v)", bound, body)
        }
    })
}

#[test]
fn test_random_programs_agree() {
    arbtest(|u| {
        let main = expression(u, 4)?;
        let source = format!("{} main = {}", HELPERS, main);
        let (ti_outcome, gm_outcome) = run_both(&source);
        assert_eq!(ti_outcome, gm_outcome, "{}", source);
        if let Ok(value) = ti_outcome {
            assert!(value.is_some(), "{}", source);
        }
        Ok(())
    });
}
