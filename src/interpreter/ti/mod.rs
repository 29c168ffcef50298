//! Template instantiation graph reducer
//!
//! Programs are compiled to a heap of supercombinator and primitive nodes
//! ([`compile`]); evaluation unwinds the application spine on the stack,
//! instantiates supercombinator bodies over the redex root (so every
//! reduction is shared), and suspends the spine on the dump while a
//! primitive forces one of its operands. [`collect`] is a mark-sweep
//! collector over the same state.

mod compiler;
mod evaluator;
mod gc;
mod instantiate;
mod node;
mod primitives;
pub mod printer;
mod state;

pub use compiler::compile;
pub use evaluator::{evaluate, evaluate_with_limit, is_final, step, trace};
pub use gc::{collect, collect_in_place, GcReport};
pub use instantiate::{instantiate, Env};
pub use node::{Primitive, TiNode, FALSE_TAG, NAMED_PRIMITIVES, TRUE_TAG};
pub use state::{TiState, TiStats};

use super::engine::{Machine, StateView};
use super::errors::EvalError;

/// [`Machine`] adapter for the driver and the UI
pub struct TemplateMachine;

impl Machine for TemplateMachine {
    type State = TiState;

    const NAME: &'static str = "ti";

    fn is_final(state: &TiState) -> bool {
        evaluator::is_final(state)
    }

    fn step(state: &mut TiState) -> Result<(), EvalError> {
        evaluator::step(state)
    }

    fn collect(state: &mut TiState) -> Result<(), EvalError> {
        collect_in_place(state).map(|_| ())
    }

    fn view(state: &TiState) -> StateView {
        printer::view(state)
    }
}
