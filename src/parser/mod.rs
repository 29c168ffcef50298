//! Core source code parser
//!
//! This module transforms Core source text into a [`Program`]:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parser`]: Parsing (tokens → [`Program`])
//!
//! # Grammar
//!
//! A program is a `;`-separated list of supercombinator definitions
//! `name params = expr`. Expressions are `let`/`letrec` blocks, `case`
//! expressions with `<tag> params -> expr` alternatives, lambdas `\x . e`,
//! constructors `Pack{tag,arity}`, application and the infix operators
//! below, loosest first:
//!
//! | Operators | Associativity |
//! |---|---|
//! | `\|` | right |
//! | `&` | right |
//! | `== ~= < <= > >=` | none |
//! | `+` / `-` | right / none |
//! | `*` / `/` | right / none |
//!
//! Hand-written recursive descent parser, no external parser generator.

pub mod lexer;
pub mod parser;

pub use lexer::SourceLocation;
pub use parser::{ParseError, Parser};

use crate::language::Program;

/// Parse a whole program from source text
pub fn parse(source: &str) -> Result<Program, ParseError> {
    Parser::new(source)?.parse_program()
}
