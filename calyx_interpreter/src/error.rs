//! Error types for evaluation and for running source text.

use crate::ast::ValueKind;
use calyx_parser::ParseError;
use std::fmt;
use thiserror::Error;

pub type EvalResult<T> = Result<T, EvalError>;

/// Why an assignment target was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignFailure {
    /// No binding for the name is in scope.
    Unbound,
    /// The name is bound to a plain value, not a storage cell.
    NotACell,
    /// The cell holds a function defined with `letfun`.
    HoldsFunction,
}

impl fmt::Display for AssignFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            AssignFailure::Unbound => "unbound variable",
            AssignFailure::NotACell => "not a mutable variable",
            AssignFailure::HoldsFunction => "it names a function",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("unbound variable '{0}'")]
    UnboundName(String),

    #[error("{construct} expects {expected}, got {actual}")]
    TypeMismatch {
        construct: &'static str,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {0}")]
    IntegerOverflow(&'static str),

    #[error("'{0}' is not a function")]
    NotAFunction(String),

    #[error("cannot assign to '{name}': {reason}")]
    InvalidAssignTarget { name: String, reason: AssignFailure },

    #[error("read expects an integer, got {0:?}")]
    InputParseFailure(String),

    #[error("maximum call depth of {0} exceeded")]
    RecursionLimit(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EvalError {
    pub fn type_mismatch(construct: &'static str, expected: ValueKind, actual: ValueKind) -> Self {
        EvalError::TypeMismatch {
            construct,
            expected,
            actual,
        }
    }

    pub fn invalid_assign(name: impl Into<String>, reason: AssignFailure) -> Self {
        EvalError::InvalidAssignTarget {
            name: name.into(),
            reason,
        }
    }
}

/// Failure of `Interpreter::eval_source`: either the text did not parse or
/// the resulting program failed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Eval(#[from] EvalError),
}
