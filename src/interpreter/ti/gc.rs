//! Mark-sweep collector for the template instantiation heap
//!
//! Roots are the stack, every stack saved on the dump, and the globals.
//!
//! Marking walks the graph from the roots, setting a node's mark before
//! visiting its children, so cyclic `letrec` structures terminate. References
//! to indirection chains are replaced by the chain's final target and the
//! intermediate indirections are left unmarked. A chain that loops back on
//! itself has no final target; its nodes are kept unchanged.
//!
//! Sweeping drops every unmarked node and resets the allocation pointer.

use super::node::TiNode;
use super::state::TiState;
use crate::interpreter::errors::EvalError;
use crate::memory::{heap::Heap, Addr, PLACEHOLDER};
use log::debug;
use rustc_hash::FxHashSet;

/// Outcome of one collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GcReport {
    pub live: usize,
    pub freed: usize,
}

/// Collect garbage, returning the state with a swept heap and every root
/// rewritten past indirections.
pub fn collect(mut state: TiState) -> Result<TiState, EvalError> {
    collect_in_place(&mut state)?;
    Ok(state)
}

pub fn collect_in_place(state: &mut TiState) -> Result<GcReport, EvalError> {
    let mut worklist = Vec::new();

    let roots = state
        .stack
        .iter_mut()
        .chain(state.dump.iter_mut().flat_map(|saved| saved.iter_mut()))
        .chain(state.globals.values_mut());
    for root in roots {
        *root = resolve(&state.heap, *root)?;
        worklist.push(*root);
    }

    let marked = mark(&mut state.heap, worklist)?;
    let freed = state.heap.sweep(|addr, _| marked.contains(&addr));
    state.stats.gc_runs += 1;

    let report = GcReport {
        live: state.heap.len(),
        freed,
    };
    debug!("ti gc: kept {} nodes, freed {}", report.live, report.freed);
    Ok(report)
}

fn mark(heap: &mut Heap<TiNode>, mut worklist: Vec<Addr>) -> Result<FxHashSet<Addr>, EvalError> {
    let mut marked = FxHashSet::default();

    while let Some(addr) = worklist.pop() {
        if !marked.insert(addr) {
            continue;
        }
        let children: Vec<Addr> = match heap.get(addr)? {
            TiNode::Application(function, argument) => {
                let (function, argument) = (resolve(heap, *function)?, resolve(heap, *argument)?);
                heap.update(addr, TiNode::Application(function, argument))?;
                vec![function, argument]
            }
            TiNode::Data { tag, components } => {
                let tag = *tag;
                let components = components
                    .iter()
                    .map(|&c| resolve(heap, c))
                    .collect::<Result<Vec<_>, _>>()?;
                heap.update(
                    addr,
                    TiNode::Data {
                        tag,
                        components: components.clone(),
                    },
                )?;
                components
            }
            // only reached for cycles and unfilled placeholders
            TiNode::Indirection(target) if *target != PLACEHOLDER => vec![*target],
            _ => Vec::new(),
        };
        worklist.extend(children);
    }

    Ok(marked)
}

/// Final target of the indirection chain starting at `addr`; `addr` itself
/// when the chain is cyclic or ends in a placeholder.
fn resolve(heap: &Heap<TiNode>, addr: Addr) -> Result<Addr, EvalError> {
    let mut seen = FxHashSet::default();
    let mut current = addr;
    loop {
        match heap.get(current)? {
            TiNode::Indirection(next) if *next != PLACEHOLDER => {
                if !seen.insert(current) {
                    return Ok(addr);
                }
                current = *next;
            }
            TiNode::Indirection(_) => return Ok(addr),
            _ => return Ok(current),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::ti::{compile, evaluate, step};
    use crate::language::{Expr, Name, Program, ScDefn};
    use rustc_hash::FxHashMap;

    fn state_with(heap: Heap<TiNode>, stack: Vec<Addr>) -> TiState {
        let mut state = TiState::new(heap, FxHashMap::default(), 0);
        state.stack = stack.into();
        state
    }

    #[test]
    fn test_unreachable_nodes_are_dropped() {
        let mut heap = Heap::new();
        let kept = heap.alloc(TiNode::Number(1));
        let _garbage = heap.alloc(TiNode::Number(2));

        let state = collect(state_with(heap, vec![kept])).unwrap();
        assert_eq!(state.heap.len(), 1);
        assert_eq!(state.stats.gc_runs, 1);
    }

    #[test]
    fn test_indirection_chains_are_collapsed() {
        let mut heap = Heap::new();
        let value = heap.alloc(TiNode::Number(7));
        let ind1 = heap.alloc(TiNode::Indirection(value));
        let ind2 = heap.alloc(TiNode::Indirection(ind1));
        let f = heap.alloc(TiNode::Number(0));
        let ap = heap.alloc(TiNode::Application(f, ind2));

        let state = collect(state_with(heap, vec![ap, ind2])).unwrap();
        assert_eq!(state.stack.as_slice(), &[ap, value]);
        assert_eq!(state.heap.get(ap), Ok(&TiNode::Application(f, value)));
        assert!(!state.heap.contains(ind1));
        assert!(!state.heap.contains(ind2));
    }

    #[test]
    fn test_cycles_terminate() {
        let mut heap = Heap::new();
        let a = heap.alloc(TiNode::Number(0));
        let b = heap.alloc(TiNode::Application(a, a));
        heap.update(a, TiNode::Application(b, b)).unwrap();
        let loop1 = heap.alloc(TiNode::Indirection(0));
        let loop2 = heap.alloc(TiNode::Indirection(loop1));
        heap.update(loop1, TiNode::Indirection(loop2)).unwrap();

        let state = collect(state_with(heap, vec![a, loop1])).unwrap();
        assert_eq!(state.heap.len(), 4);
        assert_eq!(state.stack.as_slice(), &[a, loop1]);
    }

    #[test]
    fn test_collection_mid_run_preserves_result() {
        // fac 5 with a collection after every step
        let fac = ScDefn::new(
            "fac",
            vec![Name::new("n")],
            Expr::apply(
                Expr::var("if"),
                [
                    Expr::binary("==", Expr::var("n"), Expr::num(0)),
                    Expr::num(1),
                    Expr::binary(
                        "*",
                        Expr::var("n"),
                        Expr::ap(Expr::var("fac"), Expr::binary("-", Expr::var("n"), Expr::num(1))),
                    ),
                ],
            ),
        );
        let main = ScDefn::new("main", vec![], Expr::ap(Expr::var("fac"), Expr::num(5)));
        let mut state = compile(&Program::new(vec![fac, main])).unwrap();
        let expected = evaluate(state.clone()).unwrap().result_number();

        while !crate::interpreter::ti::is_final(&state) {
            step(&mut state).unwrap();
            collect_in_place(&mut state).unwrap();
        }
        assert_eq!(state.result_number(), expected);
        assert_eq!(expected, Some(120));
    }
}
