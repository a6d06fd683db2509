//! Evaluator: reduces a validated expression to a single boolean.
//!
//! Evaluation is a rewriting system over the expression text:
//! 1. Structural validation of the raw input
//! 2. Innermost parenthesized groups are evaluated and replaced by their literal
//! 3. NOT is folded into literals until a fixed point is reached
//! 4. The flat string is checked and evaluated (AND binds tighter than OR)
//!
//! Every rewrite removes one pair of parentheses, so the loop terminates and
//! nesting depth never turns into call depth.

use std::ops::Range;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::ValidationError;
use crate::expression::{parser, Expression};
use crate::syntax::{
    self, FALSE_LITERAL, LEFT_PARENTHESIS, NOT_FALSE, NOT_TRUE, OPERATOR_AND, OPERATOR_OR,
    RIGHT_PARENTHESIS, TRUE_LITERAL,
};
use crate::validator::Validator;

/// Evaluates boolean expressions.
///
/// Holds no mutable state; a single instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct Evaluator {
    validator: Arc<Validator>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_validator(Arc::new(Validator::new()))
    }

    /// Create an evaluator sharing an already constructed validator.
    pub fn with_validator(validator: Arc<Validator>) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Evaluate an expression.
    ///
    /// Returns the first validation failure encountered; there is no partial result.
    pub fn evaluate(&self, expression: &str) -> Result<bool, ValidationError> {
        let result = self
            .validator
            .validate(expression)
            .and_then(|()| self.reduce(expression));

        match &result {
            Ok(value) => debug!(expression, value, "Expression evaluated"),
            Err(error) => debug!(expression, kind = error.kind(), "Expression rejected"),
        }
        result
    }

    /// Parse an expression into an [`Expression`] tree.
    ///
    /// The input goes through `evaluate` first, so an expression is accepted
    /// here exactly when `evaluate` accepts it, with the same error kind.
    pub fn parse(&self, expression: &str) -> Result<Expression, ValidationError> {
        self.evaluate(expression)?;
        parser::build(expression)
    }

    /// Resolve parenthesized groups innermost-first, then evaluate the flat remainder.
    fn reduce(&self, expression: &str) -> Result<bool, ValidationError> {
        let mut expression = expression.to_string();

        while let Some(group) = first_parenthesized_group(&expression) {
            let value = self.evaluate_flat(&expression[group.clone()])?;
            trace!(group = &expression[group.clone()], value, "Group reduced");
            expression.replace_range(group.start - 1..group.end + 1, syntax::literal(value));
        }

        self.evaluate_flat(&expression)
    }

    /// Evaluate a string that holds no non-empty parenthesized group.
    fn evaluate_flat(&self, input: &str) -> Result<bool, ValidationError> {
        let expression = fold_negations(input);
        self.validator.validate_boolean_syntax(&expression)?;

        // Every disjunct is checked, even after one has come out true.
        let mut value = false;
        for disjunct in pieces(&expression, OPERATOR_OR) {
            let mut operands = pieces(disjunct, OPERATOR_AND).peekable();
            if operands.peek().is_none() {
                return Err(ValidationError::InvalidBinaryOperatorSyntax);
            }
            value |= operands.all(|operand| operand == TRUE_LITERAL);
        }
        Ok(value)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Range of the content of the earliest-closing parenthesis pair with
/// non-empty content. That pair holds no other non-empty pair.
fn first_parenthesized_group(expression: &str) -> Option<Range<usize>> {
    let mut open_positions = Vec::new();

    for (index, c) in expression.char_indices() {
        match c {
            LEFT_PARENTHESIS => open_positions.push(index),
            RIGHT_PARENTHESIS => {
                if let Some(open) = open_positions.pop() {
                    let content = open + LEFT_PARENTHESIS.len_utf8()..index;
                    if !content.is_empty() {
                        return Some(content);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on `separator`, skipping empty pieces left by dangling operators.
fn pieces(text: &str, separator: char) -> impl Iterator<Item = &str> {
    text.split(separator).filter(|piece| !piece.is_empty())
}

/// Replace `!true`/`!false` by their complement until neither occurs, then drop whitespace.
fn fold_negations(input: &str) -> String {
    let mut folded = input.to_string();
    loop {
        let next = folded
            .replace(NOT_TRUE, FALSE_LITERAL)
            .replace(NOT_FALSE, TRUE_LITERAL);
        if next == folded {
            break;
        }
        folded = next;
    }
    folded.retain(|c| !c.is_whitespace());
    folded
}
