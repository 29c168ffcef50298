// Heap nodes of the G-machine

use super::instruction::Instruction;
use crate::language::Name;
use crate::memory::Addr;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GmNode {
    Application(Addr, Addr),
    /// Compiled supercombinator or primitive
    Global {
        name: Name,
        arity: usize,
        code: Rc<[Instruction]>,
    },
    Number(i64),
    Indirection(Addr),
}
