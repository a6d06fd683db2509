//! # boolex-core
//!
//! Validation and evaluation engine for textual boolean expressions.
//!
//! Expressions are built from the literals `true`/`false`, NOT (`!`), AND (`&`),
//! OR (`|`) and parentheses. AND binds tighter than OR.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same output
//! 2. **First failure wins**: Every rejection names exactly one `ValidationError` kind
//! 3. **Stack-safe**: Nesting depth is handled by loops and explicit stacks, never recursion
//! 4. **Parallel-safe**: `Validator` and `Evaluator` hold no mutable state
//!
//! ## Example
//!
//! ```rust
//! use boolex_core::{evaluate, ValidationError};
//!
//! assert_eq!(evaluate("true | false & false"), Ok(true));
//! assert_eq!(evaluate("!(true & false)"), Ok(true));
//! assert_eq!(evaluate("true &"), Err(ValidationError::InvalidBinaryOperatorSyntax));
//! ```

pub mod error;
pub mod evaluator;
pub mod expression;
pub mod suite;
pub mod syntax;
pub mod validator;

// Re-export main types at crate root
pub use error::ValidationError;
pub use evaluator::Evaluator;
pub use expression::{Expression, Node, NodeId};
pub use suite::{Case, CaseOutcome, Expectation, Suite, SuiteError, SuiteReport};
pub use validator::Validator;

use std::sync::OnceLock;

/// Shared evaluator (validator alphabet built once, reused).
static DEFAULT_EVALUATOR: OnceLock<Evaluator> = OnceLock::new();

fn default_evaluator() -> &'static Evaluator {
    DEFAULT_EVALUATOR.get_or_init(Evaluator::new)
}

/// Evaluate a boolean expression.
///
/// This is the main entry point; it uses a process-wide `Evaluator`.
pub fn evaluate(expression: &str) -> Result<bool, ValidationError> {
    default_evaluator().evaluate(expression)
}

/// Parse a boolean expression into an [`Expression`] tree.
///
/// Accepts exactly the inputs `evaluate` accepts.
pub fn parse(expression: &str) -> Result<Expression, ValidationError> {
    default_evaluator().parse(expression)
}
