//! Error types for parsing and evaluating permission expressions.

use derive_more::{Display, Error, From};

/// Lexer or parser failure.
///
/// `position` is the character offset of the offending token in the
/// expression text.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("syntax error at position {position}: {message}")]
pub struct SyntaxError {
    pub position: usize,
    pub message: String,
}

impl SyntaxError {
    pub(crate) fn new(position: usize, message: impl Into<String>) -> Self {
        SyntaxError {
            position,
            message: message.into(),
        }
    }
}

/// Failure while evaluating (or semantically checking) a parsed expression.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum EvaluationError {
    /// Function name not present in the registry
    #[display("unknown function: '{name}'")]
    UnknownFunction { name: String },

    /// Operand, argument or result of the wrong type
    #[display("type mismatch: {message}")]
    TypeMismatch { message: String },

    /// Function called with the wrong number of arguments
    #[display("function '{function}' expects {expected} argument(s), found {found}")]
    ArgumentCount {
        function: String,
        expected: String,
        found: usize,
    },

    /// Variable or field missing from the context (strict mode only)
    #[display("unknown variable: '#{name}'")]
    UnknownVariable { name: String },
}

impl EvaluationError {
    pub(crate) fn type_mismatch(message: impl Into<String>) -> Self {
        EvaluationError::TypeMismatch {
            message: message.into(),
        }
    }
}

/// Combined error type for parsing and evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum ExpressionError {
    /// Parse error
    #[display("parse error: {_0}")]
    Syntax(SyntaxError),
    /// Evaluation error
    #[display("evaluation error: {_0}")]
    Evaluation(EvaluationError),
}
