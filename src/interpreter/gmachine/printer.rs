// Text rendering of G-machine states

use super::evaluator::{is_final, result_addr};
use super::instruction::Instruction;
use super::node::GmNode;
use super::state::GmState;
use crate::interpreter::engine::StateView;
use crate::memory::{heap::Heap, stack::Stack, Addr, PLACEHOLDER};
use std::fmt::Write;

fn show_addr(addr: Addr) -> String {
    if addr == PLACEHOLDER {
        "#?".to_string()
    } else {
        format!("#{}", addr)
    }
}

pub fn show_node(node: &GmNode) -> String {
    match node {
        GmNode::Application(function, argument) => {
            format!("Ap {} {}", show_addr(*function), show_addr(*argument))
        }
        GmNode::Global { name, arity, .. } => format!("Global {}/{}", name, arity),
        GmNode::Number(n) => format!("Num {}", n),
        GmNode::Indirection(target) => format!("Ind {}", show_addr(*target)),
    }
}

fn show_entry(heap: &Heap<GmNode>, addr: Addr) -> String {
    match heap.get(addr) {
        Ok(node) => format!("{}: {}", show_addr(addr), show_node(node)),
        Err(_) => format!("{}: <dangling>", show_addr(addr)),
    }
}

fn show_stack(heap: &Heap<GmNode>, stack: &Stack) -> Vec<String> {
    stack.iter().map(|addr| show_entry(heap, addr)).collect()
}

pub fn show_code<'a>(code: impl IntoIterator<Item = &'a Instruction>) -> String {
    let parts: Vec<String> = code.into_iter().map(Instruction::to_string).collect();
    format!("[{}]", parts.join("; "))
}

pub fn show_result(state: &GmState) -> Option<String> {
    let addr = result_addr(state)?;
    match state.heap.get(addr).ok()? {
        GmNode::Number(n) => Some(n.to_string()),
        node => Some(show_node(node)),
    }
}

/// Multi-line dump of the whole machine state
pub fn show_state(state: &GmState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Code {}", show_code(&state.code));
    let _ = writeln!(out, "Stk [");
    for line in show_stack(&state.heap, &state.stack) {
        let _ = writeln!(out, "    {}", line);
    }
    let _ = writeln!(out, "]");
    let _ = writeln!(out, "Dump depth {}", state.dump.len());
    let _ = write!(
        out,
        "Heap {} nodes ({} allocated), {} steps, {} unwinds",
        state.heap.len(),
        state.heap.allocations(),
        state.stats.steps,
        state.stats.unwinds
    );
    out
}

/// Compiled code of every global, in address order
pub fn show_globals(state: &GmState) -> String {
    let mut out = String::new();
    for (addr, node) in state.heap.entries() {
        if let GmNode::Global { name, arity, code } = node {
            let _ = writeln!(out, "{} {}/{}:", show_addr(addr), name, arity);
            for instruction in code.iter() {
                let _ = writeln!(out, "    {}", instruction);
            }
        }
    }
    out
}

pub fn view(state: &GmState) -> StateView {
    let dump = state
        .dump
        .iter()
        .rev()
        .enumerate()
        .map(|(depth, frame)| {
            let entries: Vec<String> = frame.stack.iter().map(show_addr).collect();
            format!(
                "{}: {} instr, [{}]",
                depth,
                frame.code.len(),
                entries.join(" ")
            )
        })
        .collect();

    StateView {
        stack: show_stack(&state.heap, &state.stack),
        dump,
        code: state.code.iter().map(Instruction::to_string).collect(),
        heap: state
            .heap
            .entries()
            .into_iter()
            .map(|(addr, node)| format!("{}: {}", show_addr(addr), show_node(node)))
            .collect(),
        output: Vec::new(),
        result: if is_final(state) { show_result(state) } else { None },
        active: state
            .stack
            .peek("view")
            .ok()
            .and_then(|top| match state.heap.get(top) {
                Ok(GmNode::Global { name, .. }) => Some(name.to_string()),
                _ => None,
            }),
        steps: state.stats.steps,
    }
}
