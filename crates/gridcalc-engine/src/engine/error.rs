//! Error types produced by the formula engine.
//!
//! Two families live here:
//! - [`FormulaFormatError`] and [`CycleError`] reject an edit outright.
//! - [`FormulaError`] is an ordinary *value*: the result of evaluating a
//!   well-formed formula that could not produce a number.

use thiserror::Error;

/// Reasons a formula string is rejected by [`Formula::parse_with`](super::Formula::parse_with).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaFormatError {
    #[error("Formula is empty")]
    Empty,

    #[error("Unrecognised token '{0}'")]
    InvalidToken(String),

    #[error("Number '{0}' is out of range")]
    NumberOutOfRange(String),

    #[error("Formula must start with a number, variable or '(' but starts with '{0}'")]
    InvalidStart(String),

    #[error("Formula must end with a number, variable or ')' but ends with '{0}'")]
    InvalidEnd(String),

    #[error("Unmatched ')' at token {position}")]
    UnmatchedClose { position: usize },

    #[error("'{token}' must be followed by a number, variable or '(' but is followed by '{next}'")]
    ExpectedOperand { token: String, next: String },

    #[error("'{token}' must be followed by an operator or ')' but is followed by '{next}'")]
    ExpectedOperator { token: String, next: String },

    #[error("Unbalanced parentheses: {open} '(' and {close} ')'")]
    UnbalancedParens { open: usize, close: usize },

    #[error("Invalid variable '{0}'")]
    InvalidVariable(String),
}

/// A failed evaluation. Returned as a value and cached like any other result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Unresolved variable '{0}'")]
    UnresolvedVariable(String),

    #[error("Division by zero")]
    DivisionByZero,

    /// Operand or operator stack ran dry. Parsing rules out this case for
    /// every formula built through [`Formula::parse_with`](super::Formula::parse_with).
    #[error("Malformed expression")]
    Malformed,
}

/// Committing an edit would make a cell (transitively) reference itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Circular dependency: {}", path.join(" -> "))]
pub struct CycleError {
    /// Names along the offending path; the first and last entries are equal.
    pub path: Vec<String>,
}

impl CycleError {
    /// The name the cycle was discovered from.
    pub fn cell(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }
}
