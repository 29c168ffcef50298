//! G-machine
//!
//! Supercombinators are compiled to instruction sequences
//! ([`compile`]) which run on a stack machine over a graph heap. `Eval`
//! saves the current code and stack on the dump and evaluates a node to weak
//! head normal form (a number or a partial application); `Unwind` walks
//! application spines and enters compiled globals.
//!
//! Only the base combinators, arithmetic, comparisons and `if` are
//! available; data constructors, `case` and lambdas are rejected at compile
//! time.
//!
//! Free names are not checked by the compiler. A name with no global, such
//! as `abort` or `Nil` from the data prelude, compiles to `PushGlobal` and
//! fails with [`EvalError::UnboundName`] when that instruction runs, even if
//! the value would never be forced.

mod compiler;
mod evaluator;
mod instruction;
mod node;
pub mod printer;
mod state;

pub use compiler::{compile, compile_definition};
pub use evaluator::{evaluate, evaluate_with_limit, is_final, result_addr, step, trace};
pub use instruction::{Instruction, PrimOp, BINARY_PRIMS};
pub use node::GmNode;
pub use state::{DumpFrame, GmState, GmStats};

use super::engine::{Machine, StateView};
use super::errors::EvalError;

/// [`Machine`] adapter for the driver and the UI
pub struct GMachine;

impl Machine for GMachine {
    type State = GmState;

    const NAME: &'static str = "gm";

    fn is_final(state: &GmState) -> bool {
        evaluator::is_final(state)
    }

    fn step(state: &mut GmState) -> Result<(), EvalError> {
        evaluator::step(state)
    }

    fn view(state: &GmState) -> StateView {
        printer::view(state)
    }
}
