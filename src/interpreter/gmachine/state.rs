// G-machine state

use super::instruction::Instruction;
use super::node::GmNode;
use crate::interpreter::constants::{ENTRY_SIZE_ESTIMATE, NODE_SIZE_ESTIMATE};
use crate::interpreter::errors::EvalError;
use crate::language::Name;
use crate::memory::{heap::Heap, stack::Stack, Addr};
use crate::snapshot::Snapshot;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::rc::Rc;

/// Context saved by `Eval` and restored when the forced value is reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpFrame {
    pub code: VecDeque<Instruction>,
    pub stack: Stack,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GmStats {
    pub steps: usize,
    pub unwinds: usize,
    pub max_stack_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GmState {
    /// Pending instructions, next first
    pub code: VecDeque<Instruction>,
    pub stack: Stack,
    pub dump: Vec<DumpFrame>,
    pub heap: Heap<GmNode>,
    /// Fixed after compilation, shared between recorded states
    pub globals: Rc<FxHashMap<Name, Addr>>,
    pub stats: GmStats,
}

impl GmState {
    pub fn new(
        code: impl IntoIterator<Item = Instruction>,
        heap: Heap<GmNode>,
        globals: FxHashMap<Name, Addr>,
    ) -> Self {
        GmState {
            code: code.into_iter().collect(),
            stack: Stack::new(),
            dump: Vec::new(),
            heap,
            globals: Rc::new(globals),
            stats: GmStats::default(),
        }
    }

    pub fn global(&self, name: &str) -> Result<Addr, EvalError> {
        self.globals
            .get(name)
            .copied()
            .ok_or_else(|| EvalError::UnboundName { name: Name::new(name) })
    }

    /// Number read from the node at `addr`
    pub fn number_at(&self, addr: Addr, context: &str) -> Result<i64, EvalError> {
        match self.heap.get(addr)? {
            GmNode::Number(n) => Ok(*n),
            _ => Err(EvalError::type_mismatch("number", addr, context)),
        }
    }

    /// The value on top of the stack once the code queue has drained
    pub fn result(&self) -> Option<&GmNode> {
        if !self.code.is_empty() {
            return None;
        }
        let top = self.stack.peek("result").ok()?;
        self.heap.get(top).ok()
    }

    pub fn result_number(&self) -> Option<i64> {
        match self.result() {
            Some(GmNode::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

impl Snapshot for GmState {
    fn estimated_size(&self) -> usize {
        let entries = self.code.len()
            + self.stack.len()
            + self
                .dump
                .iter()
                .map(|frame| frame.code.len() + frame.stack.len())
                .sum::<usize>();
        self.heap.len() * NODE_SIZE_ESTIMATE + entries * ENTRY_SIZE_ESTIMATE
    }
}
