//! Validation error taxonomy.
//!
//! Each kind names exactly one violated invariant and carries no payload.
//! The first violation found wins; errors are never accumulated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while validating or evaluating an expression.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Expression is empty")]
    EmptyExpression,

    #[error("Invalid character(s) found in expression")]
    InvalidCharacters,

    #[error("Invalid syntax for unary operator")]
    InvalidUnaryOperatorSyntax,

    #[error("Invalid syntax for binary operator")]
    InvalidBinaryOperatorSyntax,

    #[error("Mismatched parentheses in expression")]
    MismatchedParentheses,

    #[error("Invalid expression syntax")]
    InvalidSyntax,
}

impl ValidationError {
    /// Every kind, in the order the structural checks run.
    pub const ALL: [ValidationError; 6] = [
        ValidationError::EmptyExpression,
        ValidationError::InvalidCharacters,
        ValidationError::InvalidUnaryOperatorSyntax,
        ValidationError::InvalidBinaryOperatorSyntax,
        ValidationError::MismatchedParentheses,
        ValidationError::InvalidSyntax,
    ];

    /// Stable machine-readable name, identical to the serialized form.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::EmptyExpression => "empty_expression",
            ValidationError::InvalidCharacters => "invalid_characters",
            ValidationError::InvalidUnaryOperatorSyntax => "invalid_unary_operator_syntax",
            ValidationError::InvalidBinaryOperatorSyntax => "invalid_binary_operator_syntax",
            ValidationError::MismatchedParentheses => "mismatched_parentheses",
            ValidationError::InvalidSyntax => "invalid_syntax",
        }
    }
}
