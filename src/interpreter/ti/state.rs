// Template instantiation machine state

use super::node::TiNode;
use crate::interpreter::constants::{ENTRY_SIZE_ESTIMATE, NODE_SIZE_ESTIMATE};
use crate::interpreter::errors::EvalError;
use crate::language::Name;
use crate::memory::{heap::Heap, stack::Stack, Addr};
use crate::snapshot::Snapshot;
use rustc_hash::FxHashMap;

/// Counters kept alongside the machine state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TiStats {
    pub steps: usize,
    pub sc_reductions: usize,
    pub primitive_reductions: usize,
    pub gc_runs: usize,
    pub max_stack_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiState {
    /// Values emitted by `print`, oldest first
    pub output: Vec<i64>,
    /// Current reduction spine
    pub stack: Stack,
    /// Suspended spines waiting for a forced argument
    pub dump: Vec<Stack>,
    pub heap: Heap<TiNode>,
    pub globals: FxHashMap<Name, Addr>,
    pub stats: TiStats,
}

impl TiState {
    pub fn new(heap: Heap<TiNode>, globals: FxHashMap<Name, Addr>, entry: Addr) -> Self {
        TiState {
            output: Vec::new(),
            stack: Stack::singleton(entry),
            dump: Vec::new(),
            heap,
            globals,
            stats: TiStats::default(),
        }
    }

    pub fn global(&self, name: &str) -> Result<Addr, EvalError> {
        self.globals
            .get(name)
            .copied()
            .ok_or_else(|| EvalError::UnboundName { name: Name::new(name) })
    }

    /// Node at the top of the stack
    pub fn head_node(&self) -> Result<&TiNode, EvalError> {
        self.heap.get(self.stack.peek("head node")?)
    }

    /// The value left on the stack by a finished run
    pub fn result(&self) -> Option<&TiNode> {
        if self.stack.len() != 1 {
            return None;
        }
        self.head_node().ok().filter(|node| node.is_value())
    }

    /// The numeric result of a finished run
    pub fn result_number(&self) -> Option<i64> {
        match self.result() {
            Some(TiNode::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

impl Snapshot for TiState {
    fn estimated_size(&self) -> usize {
        let spine_entries =
            self.stack.len() + self.dump.iter().map(Stack::len).sum::<usize>() + self.output.len();
        self.heap.len() * NODE_SIZE_ESTIMATE
            + (spine_entries + self.globals.len()) * ENTRY_SIZE_ESTIMATE
    }
}
