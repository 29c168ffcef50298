//! Evaluation engines for Core programs
//!
//! - [`ti`]: template instantiation graph reducer with a mark-sweep collector
//! - [`gmachine`]: compiler to G-machine instructions plus the machine itself
//! - [`engine`]: the [`engine::Machine`] trait both implement and the
//!   [`engine::Interpreter`] driver that runs them with a step budget,
//!   periodic collection and recorded history
//! - [`errors`]: compile-time and run-time error types
//!
//! # Execution Model
//!
//! Both engines keep their whole state (stack, dump, heap, globals) in one
//! owned value and advance it one transition at a time. Suspended work lives
//! on the explicit dump, so every intermediate state can be cloned, shown
//! and replayed.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod gmachine;
pub mod ti;
