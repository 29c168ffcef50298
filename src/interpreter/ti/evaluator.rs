//! Template instantiation evaluator
//!
//! One [`step`] inspects the node on top of the stack:
//! - `Number`/`Data`: return to the suspended spine on the dump, or finish
//! - `Application`: walk down the spine (or collapse an indirect argument)
//! - `Supercombinator`: instantiate the body over the redex root
//! - `Indirection`: follow it
//! - `Primitive`: see [`super::primitives`]

use super::instantiate::{instantiate, Env};
use super::node::TiNode;
use super::primitives;
use super::state::TiState;
use crate::interpreter::constants::DEFAULT_MAX_STEPS;
use crate::interpreter::errors::EvalError;
use crate::language::{Expr, Name};
use crate::memory::{Addr, PLACEHOLDER};
use log::trace;

/// The machine has stopped: no suspended spines and at most one value left
pub fn is_final(state: &TiState) -> bool {
    if !state.dump.is_empty() {
        return false;
    }
    match state.stack.len() {
        0 => true,
        1 => state.head_node().is_ok_and(TiNode::is_value),
        _ => false,
    }
}

/// Perform one transition. Does nothing on a final state.
pub fn step(state: &mut TiState) -> Result<(), EvalError> {
    if is_final(state) {
        return Ok(());
    }
    state.stats.steps += 1;

    let top = state.stack.peek("step")?;
    let node = state.heap.get(top)?.clone();
    trace!("ti: #{} {:?}", top, node);

    match node {
        TiNode::Number(_) | TiNode::Data { .. } => value_step(state, top, &node),
        TiNode::Application(function, argument) => {
            application_step(state, top, function, argument)
        }
        TiNode::Supercombinator { name, params, body } => {
            supercombinator_step(state, &name, &params, &body)
        }
        TiNode::Indirection(target) => {
            if target == PLACEHOLDER {
                return Err(EvalError::DanglingAddress { address: top });
            }
            state.stack.replace_top(target, "indirection")
        }
        TiNode::Primitive { primitive, .. } => primitives::step(state, primitive),
    }?;

    state.stats.max_stack_depth = state.stats.max_stack_depth.max(state.stack.len());
    Ok(())
}

fn value_step(state: &mut TiState, top: Addr, node: &TiNode) -> Result<(), EvalError> {
    if state.stack.len() > 1 {
        return Err(EvalError::ArityMisuse {
            address: top,
            context: match node {
                TiNode::Number(n) => format!("Number {}", n),
                _ => "Data value".to_string(),
            },
        });
    }
    // the forced argument is now a value; resume the spine that asked for it
    if let Some(saved) = state.dump.pop() {
        state.stack = saved;
    }
    Ok(())
}

fn application_step(
    state: &mut TiState,
    top: Addr,
    function: Addr,
    argument: Addr,
) -> Result<(), EvalError> {
    match state.heap.get(argument)? {
        TiNode::Indirection(target) if *target != PLACEHOLDER => {
            let target = *target;
            state.heap.update(top, TiNode::Application(function, target))
        }
        _ => {
            state.stack.push(function);
            Ok(())
        }
    }
}

fn supercombinator_step(
    state: &mut TiState,
    name: &Name,
    params: &[Name],
    body: &Expr,
) -> Result<(), EvalError> {
    let (root, args) = take_arguments(state, params.len(), name.as_str())?;

    let mut env = Env::new(&state.globals);
    for (param, arg) in params.iter().zip(args) {
        env.bind(param.clone(), arg);
    }
    instantiate(body, &mut state.heap, &env, Some(root))?;

    state.stack.push(root);
    state.stats.sc_reductions += 1;
    Ok(())
}

/// Pop the function node and `count` application nodes above it.
///
/// Returns the outermost application (the redex root) and the argument
/// addresses in parameter order. With no arguments the root is the function
/// node itself.
pub(super) fn take_arguments(
    state: &mut TiState,
    count: usize,
    context: &str,
) -> Result<(Addr, Vec<Addr>), EvalError> {
    let popped = state.stack.pop_n(count + 1, context)?;
    let root = popped[count];
    let args = popped[1..]
        .iter()
        .map(|&ap| argument_of(state, ap, context))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((root, args))
}

/// Like [`take_arguments`] but leaves the stack untouched
pub(super) fn peek_arguments(
    state: &TiState,
    count: usize,
    context: &str,
) -> Result<(Addr, Vec<Addr>), EvalError> {
    let mut args = Vec::with_capacity(count);
    for depth in 1..=count {
        let ap = state.stack.peek_at(depth, context)?;
        args.push(argument_of(state, ap, context)?);
    }
    let root = state.stack.peek_at(count, context)?;
    Ok((root, args))
}

fn argument_of(state: &TiState, ap: Addr, context: &str) -> Result<Addr, EvalError> {
    match state.heap.get(ap)? {
        TiNode::Application(_, argument) => Ok(*argument),
        _ => Err(EvalError::type_mismatch("application", ap, context)),
    }
}

/// Run to completion with the default step budget
pub fn evaluate(state: TiState) -> Result<TiState, EvalError> {
    evaluate_with_limit(state, DEFAULT_MAX_STEPS)
}

pub fn evaluate_with_limit(mut state: TiState, max_steps: usize) -> Result<TiState, EvalError> {
    let mut taken = 0;
    while !is_final(&state) {
        if taken >= max_steps {
            return Err(EvalError::StepLimitExceeded { limit: max_steps });
        }
        step(&mut state)?;
        taken += 1;
    }
    Ok(state)
}

/// Every state from the initial one to the final one
pub fn trace(state: TiState, max_steps: usize) -> Result<Vec<TiState>, EvalError> {
    let mut states = vec![state];
    loop {
        let current = match states.last() {
            Some(current) if !is_final(current) => current,
            _ => break,
        };
        if states.len() > max_steps {
            return Err(EvalError::StepLimitExceeded { limit: max_steps });
        }
        let mut next = current.clone();
        step(&mut next)?;
        states.push(next);
    }
    Ok(states)
}
