//! TUI pane rendering modules
//!
//! Every pane is a stateless render function over the [`StateView`] of the
//! state under the history cursor.
//!
//! # Pane Modules
//!
//! - [`source`]: Core source with syntax highlighting and the definition being entered
//! - [`stack`]: the address stack, top first
//! - [`control`]: pending instructions and the dump
//! - [`heap`]: every live heap node
//! - [`terminal`]: printed output, the final value or the error
//! - [`status`]: status bar with keybindings and history position
//! - `utils`: shared list rendering and entry highlighting
//!
//! [`StateView`]: crate::interpreter::engine::StateView

mod utils;

pub mod control;
pub mod heap;
pub mod source;
pub mod stack;
pub mod status;
pub mod terminal;

// Re-export render functions for convenience
pub use control::render_control_pane;
pub use heap::render_heap_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use stack::render_stack_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use terminal::render_terminal_pane;
