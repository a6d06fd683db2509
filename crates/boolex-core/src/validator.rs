//! Structural and semantic validation of boolean expressions.
//!
//! The validator is stateless after construction. It answers two questions:
//! - Is the raw input well-formed? (`validate`)
//! - Is a fully reduced, parenthesis-free string a valid chain of literals? (`validate_boolean_syntax`)

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;
use crate::syntax::{
    FALSE_LITERAL, LEFT_PARENTHESIS, OPERATOR_AND, OPERATOR_NOT, OPERATOR_OR, RIGHT_PARENTHESIS,
    SPACE, TRUE_LITERAL,
};

lazy_static! {
    /// A run of NOT operators bound to a literal or an opening parenthesis.
    static ref NEGATION_CHAIN: Regex = Regex::new(r"!+(?:true|false|\()").unwrap();
}

/// Validates expressions against the fixed alphabet and operator rules.
#[derive(Debug, Clone)]
pub struct Validator {
    unary_operators: HashSet<char>,
    binary_operators: HashSet<char>,
    allowed_chars: HashSet<char>,
    literals: [&'static str; 2],
}

impl Validator {
    pub fn new() -> Self {
        let unary_operators: HashSet<char> = [OPERATOR_NOT].into_iter().collect();
        let binary_operators: HashSet<char> = [OPERATOR_AND, OPERATOR_OR].into_iter().collect();
        let literals = [TRUE_LITERAL, FALSE_LITERAL];

        let mut allowed_chars: HashSet<char> = [LEFT_PARENTHESIS, RIGHT_PARENTHESIS, SPACE]
            .into_iter()
            .collect();
        allowed_chars.extend(unary_operators.iter().copied());
        allowed_chars.extend(binary_operators.iter().copied());
        allowed_chars.extend(literals.iter().flat_map(|literal| literal.chars()));

        Self {
            unary_operators,
            binary_operators,
            allowed_chars,
            literals,
        }
    }

    /// Validate a raw expression.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// 1. not empty
    /// 2. allowed characters
    /// 3. unary operator syntax
    /// 4. binary operator syntax
    /// 5. parenthesis matching
    pub fn validate(&self, expression: &str) -> Result<(), ValidationError> {
        self.validate_not_empty(expression)?;
        self.validate_allowed_characters(expression)?;
        self.validate_unary_operator_syntax(expression)?;
        self.validate_binary_operator_syntax(expression)?;
        self.validate_parentheses_match(expression)?;
        Ok(())
    }

    /// Validate a reduced expression: no parentheses, NOT already folded.
    ///
    /// Every operand between binary operators must be exactly a literal. Once
    /// more than one operand is present, operators must alternate with them;
    /// a lone operand may carry dangling operators, which evaluation skips.
    pub fn validate_boolean_syntax(&self, reduced: &str) -> Result<(), ValidationError> {
        let operands: Vec<&str> = reduced
            .split(|c| self.is_binary_operator(c))
            .filter(|operand| !operand.is_empty())
            .map(str::trim)
            .collect();

        if operands
            .iter()
            .any(|operand| !self.literals.contains(operand))
        {
            return Err(ValidationError::InvalidSyntax);
        }

        let operators = reduced.chars().filter(|c| self.is_binary_operator(*c)).count();
        if operands.len() > 1 && operands.len() != operators + 1 {
            return Err(ValidationError::InvalidBinaryOperatorSyntax);
        }

        // Nothing but operators is left, e.g. from `( & )`.
        if operands.is_empty() {
            return Err(ValidationError::InvalidBinaryOperatorSyntax);
        }

        Ok(())
    }

    pub fn is_binary_operator(&self, c: char) -> bool {
        self.binary_operators.contains(&c)
    }

    pub fn is_unary_operator(&self, c: char) -> bool {
        self.unary_operators.contains(&c)
    }

    fn validate_not_empty(&self, input: &str) -> Result<(), ValidationError> {
        if input.trim().is_empty() {
            return Err(ValidationError::EmptyExpression);
        }
        Ok(())
    }

    fn validate_allowed_characters(&self, input: &str) -> Result<(), ValidationError> {
        if input.chars().any(|c| !self.allowed_chars.contains(&c)) {
            return Err(ValidationError::InvalidCharacters);
        }
        Ok(())
    }

    /// NOT must follow start-of-string, whitespace, `(` or another NOT, and
    /// each run of NOTs must be glued to a literal or an opening parenthesis.
    fn validate_unary_operator_syntax(&self, input: &str) -> Result<(), ValidationError> {
        let chars: Vec<char> = input.chars().collect();

        for (index, &c) in chars.iter().enumerate().skip(1) {
            if !self.is_unary_operator(c) {
                continue;
            }
            let left = chars[index - 1];
            if !left.is_whitespace() && left != LEFT_PARENTHESIS && !self.is_unary_operator(left)
            {
                return Err(ValidationError::InvalidUnaryOperatorSyntax);
            }
        }

        let operators = chars.iter().filter(|c| self.is_unary_operator(**c)).count();
        let bound_operators: usize = NEGATION_CHAIN
            .find_iter(input)
            .map(|chain| {
                chain
                    .as_str()
                    .chars()
                    .filter(|c| self.is_unary_operator(*c))
                    .count()
            })
            .sum();

        if operators != bound_operators {
            return Err(ValidationError::InvalidUnaryOperatorSyntax);
        }
        Ok(())
    }

    fn validate_binary_operator_syntax(&self, input: &str) -> Result<(), ValidationError> {
        let chars: Vec<char> = input.chars().collect();

        let first = chars.iter().copied().find(|c| !c.is_whitespace());
        let last = chars.iter().copied().rev().find(|c| !c.is_whitespace());
        match (first, last) {
            (Some(first), Some(last))
                if !self.is_binary_operator(first) && !self.is_binary_operator(last) => {}
            _ => return Err(ValidationError::InvalidBinaryOperatorSyntax),
        }

        // Operators on the outermost positions were rejected above.
        for window in chars.windows(3) {
            let (left, operator, right) = (window[0], window[1], window[2]);
            if self.is_binary_operator(operator) && !accepts_operands(left, right) {
                return Err(ValidationError::InvalidBinaryOperatorSyntax);
            }
        }
        Ok(())
    }

    fn validate_parentheses_match(&self, input: &str) -> Result<(), ValidationError> {
        let mut open_positions = Vec::new();

        for (index, c) in input.char_indices() {
            match c {
                LEFT_PARENTHESIS => open_positions.push(index),
                RIGHT_PARENTHESIS => {
                    if open_positions.pop().is_none() {
                        return Err(ValidationError::MismatchedParentheses);
                    }
                }
                _ => {}
            }
        }

        if !open_positions.is_empty() {
            return Err(ValidationError::MismatchedParentheses);
        }
        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Neighbour patterns under which a binary operator sits between two operands.
fn accepts_operands(left: char, right: char) -> bool {
    (left.is_alphabetic() && right.is_alphabetic()) // a&b
        || (left == RIGHT_PARENTHESIS && right == LEFT_PARENTHESIS) // (a)|(b)
        || (left == RIGHT_PARENTHESIS && right.is_alphabetic()) // (a)&b
        || (left.is_alphabetic() && right == LEFT_PARENTHESIS) // a&(b)
        || (left.is_whitespace() && right.is_whitespace()) // a | b
}
