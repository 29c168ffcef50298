//! Core language data model
//!
//! This module holds everything both evaluation engines share:
//! - [`ast`]: names, expressions, case alternatives, supercombinator definitions
//! - [`prelude`]: the standard combinators and the data-structure helpers
//! - [`printer`]: `Display` implementations that print a program back as Core source
//!
//! # Binders
//!
//! Expressions are generic over the type of their binders (`Expr<B>`). The
//! parser and both compilers work with [`Name`] binders; the parameter exists
//! so later passes can attach extra information to each binding site without
//! a second expression type.

pub mod ast;
pub mod prelude;
pub mod printer;

pub use ast::{Alternative, Expr, Name, Program, ScDefn};
