//! Reduction rules for built-in primitives
//!
//! A primitive with arity N fires once N application nodes sit above it on
//! the stack. Operands that must be values are forced first: the whole
//! current spine is saved on the dump and a fresh stack holding only the
//! operand takes its place. When the operand reaches a value the saved spine
//! is restored and the primitive is retried.

use super::evaluator::{peek_arguments, take_arguments};
use super::node::{Primitive, TiNode, FALSE_TAG, TRUE_TAG};
use super::state::TiState;
use crate::interpreter::errors::EvalError;
use crate::memory::{stack::Stack, Addr, PLACEHOLDER};

/// Operand status after following indirections
enum Forced {
    Value(Addr, TiNode),
    Suspended,
}

pub(super) fn step(state: &mut TiState, primitive: Primitive) -> Result<(), EvalError> {
    match primitive {
        Primitive::Negate => arithmetic_unary(state, |n| n.wrapping_neg()),
        Primitive::Add => arithmetic(state, "+", |l, r| Some(l.wrapping_add(r))),
        Primitive::Subtract => arithmetic(state, "-", |l, r| Some(l.wrapping_sub(r))),
        Primitive::Multiply => arithmetic(state, "*", |l, r| Some(l.wrapping_mul(r))),
        Primitive::Divide => arithmetic(state, "/", |l, r| (r != 0).then(|| l.wrapping_div(r))),
        Primitive::Greater => comparison(state, ">", |l, r| l > r),
        Primitive::GreaterEq => comparison(state, ">=", |l, r| l >= r),
        Primitive::Less => comparison(state, "<", |l, r| l < r),
        Primitive::LessEq => comparison(state, "<=", |l, r| l <= r),
        Primitive::Equal => comparison(state, "==", |l, r| l == r),
        Primitive::NotEqual => comparison(state, "~=", |l, r| l != r),
        Primitive::If => if_step(state),
        Primitive::CasePair => case_pair(state),
        Primitive::CaseList => case_list(state),
        Primitive::Abort => Err(EvalError::ExplicitAbort {
            address: state.stack.peek("abort")?,
        }),
        Primitive::Stop => stop(state),
        Primitive::Print => print(state),
        Primitive::Constructor { tag, arity } => construct(state, tag, arity),
    }
}

/// Follow indirections from `addr`; suspend the current spine when the
/// node reached is not yet a value.
fn force(state: &mut TiState, addr: Addr) -> Result<Forced, EvalError> {
    let mut current = addr;
    // an indirection cycle can never become a value, so stop and suspend on it
    for _ in 0..=state.heap.len() {
        match state.heap.get(current)? {
            TiNode::Indirection(next) if *next != PLACEHOLDER => current = *next,
            TiNode::Indirection(_) => return Err(EvalError::DanglingAddress { address: current }),
            node if node.is_value() => return Ok(Forced::Value(current, node.clone())),
            _ => break,
        }
    }
    let spine = std::mem::replace(&mut state.stack, Stack::singleton(current));
    state.dump.push(spine);
    Ok(Forced::Suspended)
}

fn number(state: &mut TiState, addr: Addr, context: &str) -> Result<Option<i64>, EvalError> {
    match force(state, addr)? {
        Forced::Value(_, TiNode::Number(n)) => Ok(Some(n)),
        Forced::Value(found, _) => Err(EvalError::type_mismatch("number", found, context)),
        Forced::Suspended => Ok(None),
    }
}

/// Replace the primitive and its application nodes by the updated root
fn fire(state: &mut TiState, arity: usize, root: Addr, result: TiNode) -> Result<(), EvalError> {
    state.stack.drop_n(arity + 1, "primitive")?;
    state.heap.update(root, result)?;
    state.stack.push(root);
    state.stats.primitive_reductions += 1;
    Ok(())
}

fn arithmetic_unary(state: &mut TiState, op: fn(i64) -> i64) -> Result<(), EvalError> {
    let (root, args) = peek_arguments(state, 1, "negate")?;
    match number(state, args[0], "negate")? {
        Some(n) => fire(state, 1, root, TiNode::Number(op(n))),
        None => Ok(()),
    }
}

/// Force both operands left to right
fn operands(state: &mut TiState, context: &str) -> Result<Option<(Addr, i64, i64)>, EvalError> {
    let (root, args) = peek_arguments(state, 2, context)?;
    let Some(left) = number(state, args[0], context)? else {
        return Ok(None);
    };
    let Some(right) = number(state, args[1], context)? else {
        return Ok(None);
    };
    Ok(Some((root, left, right)))
}

fn arithmetic(
    state: &mut TiState,
    context: &str,
    op: fn(i64, i64) -> Option<i64>,
) -> Result<(), EvalError> {
    let Some((root, left, right)) = operands(state, context)? else {
        return Ok(());
    };
    let value = op(left, right).ok_or(EvalError::DivisionByZero { address: root })?;
    fire(state, 2, root, TiNode::Number(value))
}

fn comparison(state: &mut TiState, context: &str, op: fn(i64, i64) -> bool) -> Result<(), EvalError> {
    let Some((root, left, right)) = operands(state, context)? else {
        return Ok(());
    };
    fire(state, 2, root, TiNode::boolean(op(left, right)))
}

fn if_step(state: &mut TiState) -> Result<(), EvalError> {
    let (root, args) = peek_arguments(state, 3, "if")?;
    let chosen = match force(state, args[0])? {
        Forced::Suspended => return Ok(()),
        Forced::Value(_, TiNode::Data { tag: TRUE_TAG, components }) if components.is_empty() => {
            args[1]
        }
        Forced::Value(_, TiNode::Data { tag: FALSE_TAG, components }) if components.is_empty() => {
            args[2]
        }
        Forced::Value(found, _) => return Err(EvalError::type_mismatch("boolean", found, "if")),
    };
    fire(state, 3, root, TiNode::Indirection(chosen))
}

fn case_pair(state: &mut TiState) -> Result<(), EvalError> {
    let (root, args) = peek_arguments(state, 2, "casePair")?;
    let (first, second) = match force(state, args[0])? {
        Forced::Suspended => return Ok(()),
        Forced::Value(_, TiNode::Data { tag: 1, components }) if components.len() == 2 => {
            (components[0], components[1])
        }
        Forced::Value(found, _) => return Err(EvalError::type_mismatch("pair", found, "casePair")),
    };
    let partial = state.heap.alloc(TiNode::Application(args[1], first));
    fire(state, 2, root, TiNode::Application(partial, second))
}

fn case_list(state: &mut TiState) -> Result<(), EvalError> {
    let (root, args) = peek_arguments(state, 3, "caseList")?;
    let result = match force(state, args[0])? {
        Forced::Suspended => return Ok(()),
        Forced::Value(_, TiNode::Data { tag: 1, components }) if components.is_empty() => {
            TiNode::Indirection(args[1])
        }
        Forced::Value(_, TiNode::Data { tag: 2, components }) if components.len() == 2 => {
            let partial = state.heap.alloc(TiNode::Application(args[2], components[0]));
            TiNode::Application(partial, components[1])
        }
        Forced::Value(found, _) => return Err(EvalError::type_mismatch("list", found, "caseList")),
    };
    fire(state, 3, root, result)
}

fn stop(state: &mut TiState) -> Result<(), EvalError> {
    if !state.dump.is_empty() {
        return Err(EvalError::InvalidTermination {
            reason: "stop reached while an argument was being forced",
        });
    }
    if state.stack.len() > 1 {
        return Err(EvalError::InvalidTermination {
            reason: "stop reached with arguments left on the stack",
        });
    }
    take_arguments(state, 0, "stop")?;
    state.stats.primitive_reductions += 1;
    Ok(())
}

fn print(state: &mut TiState) -> Result<(), EvalError> {
    let (_, args) = peek_arguments(state, 2, "print")?;
    let Some(value) = number(state, args[0], "print")? else {
        return Ok(());
    };
    if !state.dump.is_empty() {
        return Err(EvalError::InvalidTermination {
            reason: "print reached while an argument was being forced",
        });
    }
    state.output.push(value);
    take_arguments(state, 2, "print")?;
    state.stack.push(args[1]);
    state.stats.primitive_reductions += 1;
    Ok(())
}

fn construct(state: &mut TiState, tag: u32, arity: usize) -> Result<(), EvalError> {
    let (root, components) = peek_arguments(state, arity, "Pack")?;
    fire(state, arity, root, TiNode::Data { tag, components })
}

#[cfg(test)]
mod tests {
    use crate::interpreter::errors::EvalError;
    use crate::interpreter::ti::{compile, evaluate};
    use crate::language::{Expr, Program, ScDefn};

    fn eval_main(body: Expr) -> Result<crate::interpreter::ti::TiState, EvalError> {
        evaluate(compile(&Program::new(vec![ScDefn::new("main", vec![], body)])).unwrap())
    }

    #[test]
    fn test_arithmetic_forces_nested_operands() {
        // (3 * 4) - negate 2
        let body = Expr::binary(
            "-",
            Expr::binary("*", Expr::num(3), Expr::num(4)),
            Expr::ap(Expr::var("negate"), Expr::num(2)),
        );
        assert_eq!(eval_main(body).unwrap().result_number(), Some(14));
    }

    #[test]
    fn test_division_by_zero() {
        let err = eval_main(Expr::binary("/", Expr::num(1), Expr::num(0))).unwrap_err();
        assert!(matches!(err, EvalError::DivisionByZero { .. }));
    }

    #[test]
    fn test_if_does_not_force_the_other_branch() {
        let body = Expr::apply(
            Expr::var("if"),
            [
                Expr::binary("<", Expr::num(1), Expr::num(2)),
                Expr::num(10),
                Expr::var("abort"),
            ],
        );
        assert_eq!(eval_main(body).unwrap().result_number(), Some(10));
    }

    #[test]
    fn test_if_rejects_numbers() {
        let body = Expr::apply(Expr::var("if"), [Expr::num(1), Expr::num(2), Expr::num(3)]);
        let err = eval_main(body).unwrap_err();
        assert!(matches!(err, EvalError::TypeMismatch { expected: "boolean", .. }));
    }

    #[test]
    fn test_if_result_applied_to_more_arguments() {
        // if True K K1 1 2 == K 1 2
        let body = Expr::apply(
            Expr::var("if"),
            [Expr::var("True"), Expr::var("K"), Expr::var("K1"), Expr::num(1), Expr::num(2)],
        );
        assert_eq!(eval_main(body).unwrap().result_number(), Some(1));
    }

    #[test]
    fn test_print_streams_output() {
        let body = Expr::ap2(Expr::var("print"), Expr::binary("+", Expr::num(1), Expr::num(2)), Expr::var("stop"));
        let state = eval_main(body).unwrap();
        assert_eq!(state.output, vec![3]);
        assert!(state.stack.is_empty());
    }

    #[test]
    fn test_case_pair_rejects_lists() {
        let body = Expr::ap(Expr::var("fst"), Expr::var("Nil"));
        let err = eval_main(body).unwrap_err();
        assert!(matches!(err, EvalError::TypeMismatch { expected: "pair", .. }));
    }
}
