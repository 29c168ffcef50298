//! G-machine evaluator
//!
//! Each [`step`] dequeues one instruction and executes it. The machine is
//! final when the code queue is empty; the result is then on top of the
//! stack.

use super::instruction::{Instruction, PrimOp};
use super::node::GmNode;
use super::state::{DumpFrame, GmState};
use crate::interpreter::constants::DEFAULT_MAX_STEPS;
use crate::interpreter::errors::EvalError;
use crate::memory::{stack::Stack, Addr, PLACEHOLDER};
use log::trace;
use std::collections::VecDeque;

pub fn is_final(state: &GmState) -> bool {
    state.code.is_empty()
}

pub fn step(state: &mut GmState) -> Result<(), EvalError> {
    let Some(instruction) = state.code.pop_front() else {
        return Ok(());
    };
    state.stats.steps += 1;
    trace!("gm: {}", instruction);

    match instruction {
        Instruction::Unwind => unwind(state)?,
        Instruction::PushGlobal(name) => {
            let addr = state.global(name.as_str())?;
            state.stack.push(addr);
        }
        Instruction::PushInt(n) => {
            let addr = state.heap.alloc(GmNode::Number(n));
            state.stack.push(addr);
        }
        Instruction::Push(depth) => {
            let addr = state.stack.peek_at(depth, "Push")?;
            state.stack.push(addr);
        }
        Instruction::MkAp => {
            let function = state.stack.pop("MkAp")?;
            let argument = state.stack.pop("MkAp")?;
            let addr = state.heap.alloc(GmNode::Application(function, argument));
            state.stack.push(addr);
        }
        Instruction::Update(depth) => {
            let value = state.stack.pop("Update")?;
            let root = state.stack.peek_at(depth, "Update")?;
            state.heap.update(root, GmNode::Indirection(value))?;
        }
        Instruction::Pop(n) => state.stack.drop_n(n, "Pop")?,
        Instruction::Slide(n) => {
            let top = state.stack.pop("Slide")?;
            state.stack.drop_n(n, "Slide")?;
            state.stack.push(top);
        }
        Instruction::Alloc(n) => {
            for _ in 0..n {
                let addr = state.heap.alloc(GmNode::Indirection(PLACEHOLDER));
                state.stack.push(addr);
            }
        }
        Instruction::Eval => {
            let addr = state.stack.pop("Eval")?;
            let frame = DumpFrame {
                code: std::mem::replace(&mut state.code, VecDeque::from([Instruction::Unwind])),
                stack: std::mem::replace(&mut state.stack, Stack::singleton(addr)),
            };
            state.dump.push(frame);
        }
        Instruction::Prim(op) => primitive(state, op)?,
        Instruction::Cond {
            then_code,
            else_code,
        } => {
            let addr = state.stack.pop("Cond")?;
            let branch = match state.heap.get(addr)? {
                GmNode::Number(1) => then_code,
                GmNode::Number(0) => else_code,
                _ => return Err(EvalError::type_mismatch("boolean", addr, "Cond")),
            };
            for instruction in branch.into_iter().rev() {
                state.code.push_front(instruction);
            }
        }
    }

    state.stats.max_stack_depth = state.stats.max_stack_depth.max(state.stack.len());
    Ok(())
}

fn primitive(state: &mut GmState, op: PrimOp) -> Result<(), EvalError> {
    let context = op.to_string();
    // popped top first, the right operand of a binary op is on top
    let mut addrs = state.stack.pop_n(op.arity(), &context)?;
    addrs.reverse();
    let operands = addrs
        .iter()
        .map(|&addr| state.number_at(addr, &context))
        .collect::<Result<Vec<_>, _>>()?;
    let value = op.apply(&operands).ok_or(EvalError::DivisionByZero {
        address: addrs[addrs.len() - 1],
    })?;
    let addr = state.heap.alloc(GmNode::Number(value));
    state.stack.push(addr);
    Ok(())
}

fn unwind(state: &mut GmState) -> Result<(), EvalError> {
    state.stats.unwinds += 1;
    let top = state.stack.peek("Unwind")?;

    match state.heap.get(top)?.clone() {
        GmNode::Number(n) => {
            if state.stack.len() > 1 {
                return Err(EvalError::ArityMisuse {
                    address: top,
                    context: format!("Number {}", n),
                });
            }
            if let Some(frame) = state.dump.pop() {
                state.code = frame.code;
                state.stack = frame.stack;
                state.stack.push(top);
            }
        }
        GmNode::Application(function, _) => {
            state.stack.push(function);
            state.code.push_front(Instruction::Unwind);
        }
        GmNode::Global { name, arity, code } => {
            if state.stack.len() <= arity {
                return return_partial_application(state, name.as_str(), arity);
            }
            // the global and the application nodes above it, innermost first
            let spine = state.stack.pop_n(arity + 1, name.as_str())?;
            let root = spine[arity];
            state.stack.push(root);
            for &ap in spine[1..].iter().rev() {
                match state.heap.get(ap)? {
                    GmNode::Application(_, argument) => state.stack.push(*argument),
                    _ => return Err(EvalError::type_mismatch("application", ap, name.as_str())),
                }
            }
            state.code = code.iter().cloned().collect();
        }
        GmNode::Indirection(target) => {
            if target == PLACEHOLDER {
                return Err(EvalError::DanglingAddress { address: top });
            }
            state.stack.replace_top(target, "Unwind")?;
            state.code.push_front(Instruction::Unwind);
        }
    }
    Ok(())
}

/// A global applied to too few arguments is already in weak head normal
/// form. Under `Eval` the root of the partial application (the bottom of the
/// current stack) goes back to the suspended caller; at the top level there
/// is no caller and the missing arguments are an error.
fn return_partial_application(state: &mut GmState, name: &str, arity: usize) -> Result<(), EvalError> {
    let available = state.stack.len();
    let Some(&root) = state.stack.as_slice().first() else {
        return Err(EvalError::stack_underflow(arity + 1, 0, name));
    };
    match state.dump.pop() {
        Some(frame) => {
            state.code = frame.code;
            state.stack = frame.stack;
            state.stack.push(root);
            Ok(())
        }
        None => Err(EvalError::stack_underflow(arity + 1, available, name)),
    }
}

/// Run to completion with the default step budget
pub fn evaluate(state: GmState) -> Result<GmState, EvalError> {
    evaluate_with_limit(state, DEFAULT_MAX_STEPS)
}

pub fn evaluate_with_limit(mut state: GmState, max_steps: usize) -> Result<GmState, EvalError> {
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
pub fn trace(state: GmState, max_steps: usize) -> Result<Vec<GmState>, EvalError> {
    let mut states = vec![state];
    while let Some(current) = states.last().filter(|s| !is_final(s)) {
        if states.len() > max_steps {
            return Err(EvalError::StepLimitExceeded { limit: max_steps });
        }
        let mut next = current.clone();
        step(&mut next)?;
        states.push(next);
    }
    Ok(states)
}

/// Address of the result once the code queue has drained
pub fn result_addr(state: &GmState) -> Option<Addr> {
    is_final(state).then(|| state.stack.peek("result").ok()).flatten()
}
