//! # Introduction
//!
//! lazycore evaluates programs in Core, a small lazy functional language of
//! supercombinator definitions, with two abstract machines: a template
//! instantiation graph reducer and a G-machine. Every machine state can be
//! recorded and navigated forward and backward through a terminal UI built
//! with [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → Program → Compiler → Machine steps → Snapshots → TUI
//! ```
//!
//! 1. [`parser`] tokenises the source and builds a [`language::Program`].
//! 2. [`language`] holds the syntax tree, the prelude and the program printer.
//! 3. [`interpreter`] compiles the program for either engine and runs it.
//! 4. [`memory`] provides the address-indexed graph [`memory::heap::Heap`]
//!    and the address [`memory::stack::Stack`] both machines share.
//! 5. [`snapshot`] stores recorded states under a memory limit.
//! 6. [`ui`] is the ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use lazycore::interpreter::ti;
//! use lazycore::parser::parse;
//!
//! let program = parse("main = S K K 3").unwrap();
//! let state = ti::evaluate(ti::compile(&program).unwrap()).unwrap();
//! assert_eq!(state.result_number(), Some(3));
//! ```

pub mod interpreter;
pub mod language;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod ui;
