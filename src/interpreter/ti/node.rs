// Heap nodes of the template instantiation machine

use crate::language::{Expr, Name};
use crate::memory::Addr;
use std::rc::Rc;

/// Built-in operations with hard-wired reduction rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Negate,
    Add,
    Subtract,
    Multiply,
    Divide,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    Equal,
    NotEqual,
    If,
    CasePair,
    CaseList,
    Abort,
    Stop,
    Print,
    /// Saturated `Pack{tag,arity}` builds a data value
    Constructor { tag: u32, arity: usize },
}

/// Every primitive that is reachable by name
pub const NAMED_PRIMITIVES: &[(&str, Primitive)] = &[
    ("negate", Primitive::Negate),
    ("+", Primitive::Add),
    ("-", Primitive::Subtract),
    ("*", Primitive::Multiply),
    ("/", Primitive::Divide),
    (">", Primitive::Greater),
    (">=", Primitive::GreaterEq),
    ("<", Primitive::Less),
    ("<=", Primitive::LessEq),
    ("==", Primitive::Equal),
    ("~=", Primitive::NotEqual),
    ("if", Primitive::If),
    ("casePair", Primitive::CasePair),
    ("caseList", Primitive::CaseList),
    ("abort", Primitive::Abort),
    ("stop", Primitive::Stop),
    ("print", Primitive::Print),
];

impl Primitive {
    /// Number of arguments consumed when the primitive fires
    pub fn arity(self) -> usize {
        match self {
            Primitive::Abort | Primitive::Stop => 0,
            Primitive::Negate => 1,
            Primitive::If | Primitive::CaseList => 3,
            Primitive::Constructor { arity, .. } => arity,
            _ => 2,
        }
    }
}

/// Boolean encoding shared with the prelude's `True`/`False`
pub const FALSE_TAG: u32 = 1;
pub const TRUE_TAG: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TiNode {
    Application(Addr, Addr),
    Supercombinator {
        name: Name,
        params: Rc<[Name]>,
        body: Rc<Expr>,
    },
    Number(i64),
    Indirection(Addr),
    Primitive {
        name: Name,
        primitive: Primitive,
    },
    Data {
        tag: u32,
        components: Vec<Addr>,
    },
}

impl TiNode {
    /// Weak head normal form: numbers and data values
    pub fn is_value(&self) -> bool {
        matches!(self, TiNode::Number(_) | TiNode::Data { .. })
    }

    pub fn boolean(value: bool) -> Self {
        TiNode::Data {
            tag: if value { TRUE_TAG } else { FALSE_TAG },
            components: Vec::new(),
        }
    }
}
