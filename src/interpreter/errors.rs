//! Error types for compilation and evaluation
//!
//! [`CompileError`] is raised while building an initial machine state from a
//! [`Program`](crate::language::Program); [`EvalError`] is raised by a machine
//! step. Both are fatal: evaluation stops at the first failure and the driver
//! reports it together with the offending primitive/instruction and address.

use crate::language::Name;
use crate::memory::Addr;
use std::fmt;

/// Errors that can occur while a machine is running
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A global lookup failed
    UnboundName { name: Name },

    /// A pop or offset needed more stack entries than were present
    StackUnderflow {
        needed: usize,
        available: usize,
        context: String,
    },

    /// A value had the wrong node shape or tag
    TypeMismatch {
        expected: &'static str,
        address: Addr,
        context: String,
    },

    /// A number or data value sits on top of further arguments
    ArityMisuse { address: Addr, context: String },

    /// The `abort` primitive was forced
    ExplicitAbort { address: Addr },

    /// `stop` or `print` reached in a context where the program cannot end
    InvalidTermination { reason: &'static str },

    /// Address missing from the heap, or an unfilled `letrec` placeholder
    DanglingAddress { address: Addr },

    DivisionByZero { address: Addr },

    /// An expression form the machine cannot build a graph for
    UnsupportedExpression { construct: &'static str },

    /// Step budget exhausted
    StepLimitExceeded { limit: usize },

    /// Snapshot history limit exceeded
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// Navigation past either end of the recorded history
    HistoryUnavailable { message: &'static str },
}

/// Field-less tag for matching on the failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnboundName,
    StackUnderflow,
    TypeMismatch,
    ArityMisuse,
    ExplicitAbort,
    InvalidTermination,
    DanglingAddress,
    DivisionByZero,
    UnsupportedExpression,
    StepLimitExceeded,
    SnapshotLimitExceeded,
    HistoryUnavailable,
}

impl EvalError {
    pub fn stack_underflow(needed: usize, available: usize, context: impl Into<String>) -> Self {
        EvalError::StackUnderflow {
            needed,
            available,
            context: context.into(),
        }
    }

    pub fn type_mismatch(expected: &'static str, address: Addr, context: impl Into<String>) -> Self {
        EvalError::TypeMismatch {
            expected,
            address,
            context: context.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::UnboundName { .. } => ErrorKind::UnboundName,
            EvalError::StackUnderflow { .. } => ErrorKind::StackUnderflow,
            EvalError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            EvalError::ArityMisuse { .. } => ErrorKind::ArityMisuse,
            EvalError::ExplicitAbort { .. } => ErrorKind::ExplicitAbort,
            EvalError::InvalidTermination { .. } => ErrorKind::InvalidTermination,
            EvalError::DanglingAddress { .. } => ErrorKind::DanglingAddress,
            EvalError::DivisionByZero { .. } => ErrorKind::DivisionByZero,
            EvalError::UnsupportedExpression { .. } => ErrorKind::UnsupportedExpression,
            EvalError::StepLimitExceeded { .. } => ErrorKind::StepLimitExceeded,
            EvalError::SnapshotLimitExceeded { .. } => ErrorKind::SnapshotLimitExceeded,
            EvalError::HistoryUnavailable { .. } => ErrorKind::HistoryUnavailable,
        }
    }

    /// Heap address the failure is about, when there is one
    pub fn address(&self) -> Option<Addr> {
        match self {
            EvalError::TypeMismatch { address, .. }
            | EvalError::ArityMisuse { address, .. }
            | EvalError::ExplicitAbort { address }
            | EvalError::DanglingAddress { address }
            | EvalError::DivisionByZero { address } => Some(*address),
            EvalError::UnboundName { .. }
            | EvalError::StackUnderflow { .. }
            | EvalError::InvalidTermination { .. }
            | EvalError::UnsupportedExpression { .. }
            | EvalError::StepLimitExceeded { .. }
            | EvalError::SnapshotLimitExceeded { .. }
            | EvalError::HistoryUnavailable { .. } => None,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnboundName { name } => write!(f, "Unbound name '{}'", name),
            EvalError::StackUnderflow {
                needed,
                available,
                context,
            } => {
                write!(
                    f,
                    "Stack underflow in {}: needed {} entr{}, found {}",
                    context,
                    needed,
                    if *needed == 1 { "y" } else { "ies" },
                    available
                )
            }
            EvalError::TypeMismatch {
                expected,
                address,
                context,
            } => {
                write!(
                    f,
                    "Type mismatch in {}: #{} is not a {}",
                    context, address, expected
                )
            }
            EvalError::ArityMisuse { address, context } => {
                write!(
                    f,
                    "{} at #{} applied to extra arguments",
                    context, address
                )
            }
            EvalError::ExplicitAbort { address } => {
                write!(f, "Program aborted (abort forced at #{})", address)
            }
            EvalError::InvalidTermination { reason } => {
                write!(f, "Invalid termination: {}", reason)
            }
            EvalError::DanglingAddress { address } => {
                write!(f, "Dangling heap address #{}", address)
            }
            EvalError::DivisionByZero { address } => {
                write!(f, "Division by zero at #{}", address)
            }
            EvalError::UnsupportedExpression { construct } => {
                write!(f, "Cannot instantiate a {}", construct)
            }
            EvalError::StepLimitExceeded { limit } => {
                write!(f, "Step limit of {} exceeded", limit)
            }
            EvalError::SnapshotLimitExceeded { current, limit } => {
                write!(
                    f,
                    "Snapshot memory limit exceeded: {} bytes used, limit is {}",
                    current, limit
                )
            }
            EvalError::HistoryUnavailable { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for EvalError {}

/// Errors raised while building an initial machine state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// No definition named `main`
    MissingMain,

    /// `main` must take no arguments
    MainTakesArguments { arity: usize },

    /// A construct the selected engine has no translation for
    Unsupported {
        construct: &'static str,
        definition: Name,
    },

    /// Two program definitions share a name
    DuplicateDefinition { name: Name },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::MissingMain => write!(f, "No main definition found"),
            CompileError::MainTakesArguments { arity } => {
                write!(
                    f,
                    "main must take no arguments, but takes {}",
                    arity
                )
            }
            CompileError::Unsupported {
                construct,
                definition,
            } => {
                write!(
                    f,
                    "{} is not supported by this engine (in '{}')",
                    construct, definition
                )
            }
            CompileError::DuplicateDefinition { name } => {
                write!(f, "'{}' is defined more than once", name)
            }
        }
    }
}

impl std::error::Error for CompileError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_address() {
        let err = EvalError::type_mismatch("boolean", 12, "if");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.address(), Some(12));
        assert_eq!(err.to_string(), "Type mismatch in if: #12 is not a boolean");

        let err = EvalError::stack_underflow(3, 1, "Pop");
        assert_eq!(err.address(), None);
        assert_eq!(err.to_string(), "Stack underflow in Pop: needed 3 entries, found 1");
    }
}
