//! Formula error types
//!
//! These are structural failures. Spreadsheet-level errors such as `#DIV/0!` are
//! not represented here; they are ordinary values (see [`crate::CalcValue::Error`]).

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula tokenizing, parsing or function dispatch
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FormulaError {
    /// Malformed formula text
    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// Function failure that is not itself a spreadsheet error value
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// No function registered under this name
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },
}

impl FormulaError {
    /// Create a syntax error at a character position
    pub fn syntax<S: Into<String>>(position: usize, message: S) -> Self {
        FormulaError::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Check whether this is a structural (syntax) failure
    pub fn is_syntax(&self) -> bool {
        matches!(self, FormulaError::Syntax { .. })
    }
}
