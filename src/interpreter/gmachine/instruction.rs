// G-machine instruction set

use crate::language::Name;
use std::fmt;

/// Arithmetic and comparison operations on evaluated numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimOp {
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Binary operators, by source name
pub const BINARY_PRIMS: &[(&str, PrimOp)] = &[
    ("+", PrimOp::Add),
    ("-", PrimOp::Sub),
    ("*", PrimOp::Mul),
    ("/", PrimOp::Div),
    ("==", PrimOp::Eq),
    ("~=", PrimOp::Ne),
    ("<", PrimOp::Lt),
    ("<=", PrimOp::Le),
    (">", PrimOp::Gt),
    (">=", PrimOp::Ge),
];

impl PrimOp {
    pub fn binary(operator: &str) -> Option<PrimOp> {
        BINARY_PRIMS
            .iter()
            .find(|(name, _)| *name == operator)
            .map(|(_, op)| *op)
    }

    /// Operands popped by `Prim`
    pub fn arity(self) -> usize {
        match self {
            PrimOp::Neg => 1,
            _ => 2,
        }
    }

    /// Apply to operands given left first. `None` on division by zero.
    /// Comparisons yield 1 for true and 0 for false.
    pub fn apply(self, operands: &[i64]) -> Option<i64> {
        let flag = |b: bool| i64::from(b);
        match (self, operands) {
            (PrimOp::Neg, [x]) => Some(x.wrapping_neg()),
            (PrimOp::Add, [l, r]) => Some(l.wrapping_add(*r)),
            (PrimOp::Sub, [l, r]) => Some(l.wrapping_sub(*r)),
            (PrimOp::Mul, [l, r]) => Some(l.wrapping_mul(*r)),
            (PrimOp::Div, [l, r]) => (*r != 0).then(|| l.wrapping_div(*r)),
            (PrimOp::Eq, [l, r]) => Some(flag(l == r)),
            (PrimOp::Ne, [l, r]) => Some(flag(l != r)),
            (PrimOp::Lt, [l, r]) => Some(flag(l < r)),
            (PrimOp::Le, [l, r]) => Some(flag(l <= r)),
            (PrimOp::Gt, [l, r]) => Some(flag(l > r)),
            (PrimOp::Ge, [l, r]) => Some(flag(l >= r)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Unwind,
    PushGlobal(Name),
    PushInt(i64),
    /// Push the address at this depth (0 = top)
    Push(usize),
    MkAp,
    /// Pop, then overwrite the node at this depth with an indirection
    Update(usize),
    Pop(usize),
    /// Keep the top, discard the entries below it
    Slide(usize),
    /// Push fresh placeholder indirections
    Alloc(usize),
    Eval,
    Prim(PrimOp),
    Cond {
        then_code: Vec<Instruction>,
        else_code: Vec<Instruction>,
    },
}

impl fmt::Display for PrimOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimOp::Neg => "Neg",
            PrimOp::Add => "Add",
            PrimOp::Sub => "Sub",
            PrimOp::Mul => "Mul",
            PrimOp::Div => "Div",
            PrimOp::Eq => "Eq",
            PrimOp::Ne => "Ne",
            PrimOp::Lt => "Lt",
            PrimOp::Le => "Le",
            PrimOp::Gt => "Gt",
            PrimOp::Ge => "Ge",
        };
        f.write_str(name)
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, code: &[Instruction]) -> fmt::Result {
    write!(f, "[")?;
    for (i, instr) in code.iter().enumerate() {
        if i > 0 {
            write!(f, "; ")?;
        }
        write!(f, "{}", instr)?;
    }
    write!(f, "]")
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Unwind => write!(f, "Unwind"),
            Instruction::PushGlobal(name) => write!(f, "PushGlobal {}", name),
            Instruction::PushInt(n) => write!(f, "PushInt {}", n),
            Instruction::Push(k) => write!(f, "Push {}", k),
            Instruction::MkAp => write!(f, "MkAp"),
            Instruction::Update(k) => write!(f, "Update {}", k),
            Instruction::Pop(n) => write!(f, "Pop {}", n),
            Instruction::Slide(n) => write!(f, "Slide {}", n),
            Instruction::Alloc(n) => write!(f, "Alloc {}", n),
            Instruction::Eval => write!(f, "Eval"),
            Instruction::Prim(op) => write!(f, "{}", op),
            Instruction::Cond {
                then_code,
                else_code,
            } => {
                write!(f, "Cond ")?;
                write_block(f, then_code)?;
                write!(f, " ")?;
                write_block(f, else_code)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prim_semantics() {
        assert_eq!(PrimOp::Sub.apply(&[10, 3]), Some(7));
        assert_eq!(PrimOp::Div.apply(&[7, 2]), Some(3));
        assert_eq!(PrimOp::Div.apply(&[7, 0]), None);
        assert_eq!(PrimOp::Le.apply(&[3, 3]), Some(1));
        assert_eq!(PrimOp::Gt.apply(&[3, 3]), Some(0));
        assert_eq!(PrimOp::Neg.apply(&[5]), Some(-5));
        assert_eq!(PrimOp::Add.apply(&[i64::MAX, 1]), Some(i64::MIN));
        assert_eq!(PrimOp::binary("~="), Some(PrimOp::Ne));
        assert_eq!(PrimOp::binary("&"), None);
    }

    #[test]
    fn test_display() {
        let cond = Instruction::Cond {
            then_code: vec![Instruction::Push(1)],
            else_code: vec![Instruction::Push(2), Instruction::Eval],
        };
        assert_eq!(cond.to_string(), "Cond [Push 1] [Push 2; Eval]");
        assert_eq!(Instruction::Prim(PrimOp::Mul).to_string(), "Mul");
        assert_eq!(
            Instruction::PushGlobal(Name::new("fac")).to_string(),
            "PushGlobal fac"
        );
    }
}
