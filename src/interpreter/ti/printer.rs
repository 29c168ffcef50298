// Text and Graphviz renderings of a template instantiation state

use super::node::TiNode;
use super::state::TiState;
use crate::interpreter::engine::StateView;
use crate::memory::{heap::Heap, Addr, PLACEHOLDER};
use rustc_hash::FxHashSet;
use std::fmt::Write;

fn show_addr(addr: Addr) -> String {
    if addr == PLACEHOLDER {
        "#?".to_string()
    } else {
        format!("#{}", addr)
    }
}

/// One-line description of a heap node
pub fn show_node(node: &TiNode) -> String {
    match node {
        TiNode::Application(function, argument) => {
            format!("Ap {} {}", show_addr(*function), show_addr(*argument))
        }
        TiNode::Supercombinator { name, params, .. } => {
            format!("Sc {}/{}", name, params.len())
        }
        TiNode::Number(n) => format!("Num {}", n),
        TiNode::Indirection(target) => format!("Ind {}", show_addr(*target)),
        TiNode::Primitive { name, .. } => format!("Prim {}", name),
        TiNode::Data { tag, components } => {
            let mut text = format!("Data <{}>", tag);
            for component in components {
                text.push(' ');
                text.push_str(&show_addr(*component));
            }
            text
        }
    }
}

/// `#addr: node`, or a dangling marker
pub fn show_entry(heap: &Heap<TiNode>, addr: Addr) -> String {
    match heap.get(addr) {
        Ok(node) => format!("{}: {}", show_addr(addr), show_node(node)),
        Err(_) => format!("{}: <dangling>", show_addr(addr)),
    }
}

/// Stack entries, top first, with the argument of each spine application
/// shown alongside it
fn show_stack_entries(heap: &Heap<TiNode>, stack: &crate::memory::stack::Stack) -> Vec<String> {
    stack
        .iter()
        .map(|addr| match heap.get(addr) {
            Ok(TiNode::Application(_, argument)) => {
                format!("{}  ({})", show_entry(heap, addr), show_entry(heap, *argument))
            }
            _ => show_entry(heap, addr),
        })
        .collect()
}

/// Final value of a stopped machine
pub fn show_result(state: &TiState) -> Option<String> {
    if !super::is_final(state) {
        return None;
    }
    match state.result() {
        Some(TiNode::Number(n)) => Some(n.to_string()),
        Some(TiNode::Data { tag, components }) => Some(format!("Pack{{{},{}}}", tag, components.len())),
        _ if state.stack.is_empty() => Some("stopped".to_string()),
        _ => None,
    }
}

/// Multi-line dump of the whole machine state
pub fn show_state(state: &TiState) -> String {
    let mut out = String::new();
    let output: Vec<String> = state.output.iter().map(i64::to_string).collect();
    let _ = writeln!(out, "Out [{}]", output.join(", "));
    let _ = writeln!(out, "Stk [");
    for line in show_stack_entries(&state.heap, &state.stack) {
        let _ = writeln!(out, "    {}", line);
    }
    let _ = writeln!(out, "]");
    let _ = writeln!(out, "Dump depth {}", state.dump.len());
    let _ = write!(
        out,
        "Heap {} nodes ({} allocated), {} steps, {} sc / {} prim reductions, {} gc runs",
        state.heap.len(),
        state.heap.allocations(),
        state.stats.steps,
        state.stats.sc_reductions,
        state.stats.primitive_reductions,
        state.stats.gc_runs
    );
    out
}

pub fn view(state: &TiState) -> StateView {
    let dump = state
        .dump
        .iter()
        .rev()
        .enumerate()
        .map(|(depth, saved)| {
            let entries: Vec<String> = saved.iter().map(show_addr).collect();
            format!("{}: [{}]", depth, entries.join(" "))
        })
        .collect();

    StateView {
        stack: show_stack_entries(&state.heap, &state.stack),
        dump,
        code: Vec::new(),
        heap: state
            .heap
            .entries()
            .into_iter()
            .map(|(addr, node)| format!("{}: {}", show_addr(addr), show_node(node)))
            .collect(),
        output: state.output.iter().map(i64::to_string).collect(),
        result: show_result(state),
        active: match state.head_node() {
            Ok(TiNode::Supercombinator { name, .. }) | Ok(TiNode::Primitive { name, .. }) => {
                Some(name.to_string())
            }
            _ => None,
        },
        steps: state.stats.steps,
    }
}

/// Graphviz rendering of the stack, the dump and every node reachable from
/// them. Globals are left out unless a reachable node refers to one.
pub fn to_dot(state: &TiState) -> String {
    let mut out = String::from("digraph ti {\n    node [shape=box, fontname=monospace];\n");

    let mut worklist: Vec<Addr> = Vec::new();
    let _ = writeln!(out, "    subgraph cluster_stack {{\n        label=\"stack\";");
    for (depth, addr) in state.stack.iter().enumerate() {
        let _ = writeln!(out, "        s{} [label=\"{}\", shape=plaintext];", depth, depth);
        let _ = writeln!(out, "        s{} -> n{};", depth, addr);
        worklist.push(addr);
    }
    let _ = writeln!(out, "    }}");

    for (frame, saved) in state.dump.iter().rev().enumerate() {
        let _ = writeln!(
            out,
            "    subgraph cluster_dump{} {{\n        label=\"dump {}\";",
            frame, frame
        );
        for (depth, addr) in saved.iter().enumerate() {
            let _ = writeln!(
                out,
                "        d{}_{} [label=\"{}\", shape=plaintext];",
                frame, depth, depth
            );
            let _ = writeln!(out, "        d{}_{} -> n{};", frame, depth, addr);
            worklist.push(addr);
        }
        let _ = writeln!(out, "    }}");
    }

    let mut seen = FxHashSet::default();
    while let Some(addr) = worklist.pop() {
        if addr == PLACEHOLDER || !seen.insert(addr) {
            continue;
        }
        let Ok(node) = state.heap.get(addr) else {
            let _ = writeln!(out, "    n{} [label=\"#{} dangling\", color=red];", addr, addr);
            continue;
        };
        let label = show_node(node).replace('"', "\\\"");
        let _ = writeln!(out, "    n{} [label=\"#{}: {}\"];", addr, addr, label);
        let children: Vec<(Addr, &str)> = match node {
            TiNode::Application(function, argument) => vec![(*function, "fun"), (*argument, "arg")],
            TiNode::Indirection(target) => vec![(*target, "ind")],
            TiNode::Data { components, .. } => components.iter().map(|c| (*c, "")).collect(),
            _ => Vec::new(),
        };
        for (child, edge) in children {
            if child == PLACEHOLDER {
                continue;
            }
            let _ = writeln!(out, "    n{} -> n{} [label=\"{}\"];", addr, child, edge);
            worklist.push(child);
        }
    }

    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::ti::{compile, evaluate};
    use crate::language::{Expr, Name, Program, ScDefn};

    fn double_program() -> Program {
        Program::new(vec![
            ScDefn::new(
                "double",
                vec![Name::new("x")],
                Expr::binary("+", Expr::var("x"), Expr::var("x")),
            ),
            ScDefn::new("main", vec![], Expr::ap(Expr::var("double"), Expr::num(21))),
        ])
    }

    #[test]
    fn test_node_descriptions() {
        assert_eq!(show_node(&TiNode::Application(3, 4)), "Ap #3 #4");
        assert_eq!(show_node(&TiNode::Number(-2)), "Num -2");
        assert_eq!(show_node(&TiNode::Indirection(PLACEHOLDER)), "Ind #?");
        assert_eq!(
            show_node(&TiNode::Data {
                tag: 2,
                components: vec![5, 6]
            }),
            "Data <2> #5 #6"
        );
    }

    #[test]
    fn test_state_text_for_finished_run() {
        let state = evaluate(compile(&double_program()).unwrap()).unwrap();
        let text = show_state(&state);
        assert!(text.starts_with("Out []\nStk [\n"));
        assert!(text.contains("Num 42"));
        assert!(text.contains("Dump depth 0"));
        assert_eq!(show_result(&state).as_deref(), Some("42"));
    }

    #[test]
    fn test_view_of_initial_state() {
        let state = compile(&double_program()).unwrap();
        let view = view(&state);
        assert_eq!(view.stack.len(), 1);
        assert!(view.stack[0].ends_with("Sc main/0"));
        assert!(view.dump.is_empty());
        assert_eq!(view.heap.len(), state.heap.len());
        assert_eq!(view.result, None);
    }

    #[test]
    fn test_dot_covers_reachable_nodes_only() {
        let state = compile(&double_program()).unwrap();
        let main = state.global("main").unwrap();
        let dot = to_dot(&state);
        assert!(dot.starts_with("digraph ti {"));
        assert!(dot.contains(&format!("s0 -> n{};", main)));
        assert!(dot.contains("Sc main/0"));
        assert!(!dot.contains("Sc double/1"));
        assert!(dot.trim_end().ends_with('}'));
    }
}
