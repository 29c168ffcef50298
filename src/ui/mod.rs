//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus and autoplay
//! - **[`panes`]**: stateless render functions for each visible pane (source, stack,
//!   control, heap, output, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a finished
//! [`Interpreter`] that recorded its history and call [`App::run`] to browse
//! the run step by step.
//!
//! [`Interpreter`]: crate::interpreter::engine::Interpreter
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
