//! Tree construction for accepted expressions.
//!
//! Input is text that `Evaluator::evaluate` has already accepted. Whitespace is
//! dropped, the remaining characters are tokenized and assembled with an
//! operator stack: NOT binds tightest, then AND, then OR, and binary operators
//! are left-associative. Nodes come out in post-order, matching the layout the
//! `Expression` combinators produce.
//!
//! A binary operator with no operand on one side (`( true & )`) is dropped,
//! the same way evaluation skips the empty piece it leaves behind.

use std::iter::Peekable;
use std::str::CharIndices;

use super::{Expression, Node, NodeId};
use crate::error::ValidationError;
use crate::syntax::{
    self, LEFT_PARENTHESIS, OPERATOR_AND, OPERATOR_NOT, OPERATOR_OR, RIGHT_PARENTHESIS,
};

/// **(internal)** Tokens of a whitespace-free expression.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Token {
    Not,
    And,
    Or,
    Open,
    Close,
    Literal(bool),
}

/// **(internal)** Operators waiting on the stack for their operands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Pending {
    Not,
    And,
    Or,
    Open,
}

impl Pending {
    fn precedence(self) -> u8 {
        match self {
            Pending::Not => 3,
            Pending::And => 2,
            Pending::Or => 1,
            Pending::Open => 0,
        }
    }
}

/// Build the tree for an expression.
pub(crate) fn build(expression: &str) -> Result<Expression, ValidationError> {
    let text: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
    let mut builder = TreeBuilder::default();

    for token in tokenize(&text)? {
        match token {
            Token::Literal(value) => builder.push_operand(Node::Literal(value)),
            Token::Not => builder.push_prefix(Pending::Not),
            Token::Open => builder.push_prefix(Pending::Open),
            Token::And => builder.push_binary(Pending::And)?,
            Token::Or => builder.push_binary(Pending::Or)?,
            Token::Close => builder.close_group()?,
        }
    }
    builder.finish()
}

/// **(internal)** Turn whitespace-free text into tokens. Letter runs must spell a literal.
fn tokenize(text: &str) -> Result<Vec<Token>, ValidationError> {
    let mut chars = text.char_indices().peekable();
    let mut tokens = Vec::new();

    while let Some((start, c)) = chars.next() {
        let token = match c {
            OPERATOR_NOT => Token::Not,
            OPERATOR_AND => Token::And,
            OPERATOR_OR => Token::Or,
            LEFT_PARENTHESIS => Token::Open,
            RIGHT_PARENTHESIS => Token::Close,
            c if c.is_alphabetic() => {
                let end = word_end(&mut chars, start + c.len_utf8());
                syntax::parse_literal(&text[start..end])
                    .map(Token::Literal)
                    .ok_or(ValidationError::InvalidSyntax)?
            }
            _ => return Err(ValidationError::InvalidCharacters),
        };
        tokens.push(token);
    }
    Ok(tokens)
}

/// **(internal)** Consume the rest of a letter run and return its end offset.
fn word_end(chars: &mut Peekable<CharIndices>, mut end: usize) -> usize {
    while let Some(&(index, c)) = chars.peek() {
        if !c.is_alphabetic() {
            break;
        }
        end = index + c.len_utf8();
        chars.next();
    }
    end
}

#[derive(Default)]
struct TreeBuilder {
    nodes: Vec<Node>,
    operands: Vec<NodeId>,
    operators: Vec<Pending>,
    /// Whether the last token completed an operand.
    after_operand: bool,
}

impl TreeBuilder {
    fn push_operand(&mut self, node: Node) {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.operands.push(id);
        self.after_operand = true;
    }

    fn push_prefix(&mut self, operator: Pending) {
        self.operators.push(operator);
        self.after_operand = false;
    }

    fn pop_operand(&mut self) -> Result<NodeId, ValidationError> {
        self.operands.pop().ok_or(ValidationError::InvalidSyntax)
    }

    /// Reduce everything that binds at least as tightly, then push `operator`.
    fn push_binary(&mut self, operator: Pending) -> Result<(), ValidationError> {
        if !self.after_operand {
            return Ok(());
        }
        while let Some(&top) = self.operators.last() {
            if top.precedence() < operator.precedence() {
                break;
            }
            self.operators.pop();
            self.apply(top)?;
        }
        self.operators.push(operator);
        self.after_operand = false;
        Ok(())
    }

    /// Discard a binary operator still waiting for its right operand.
    fn drop_dangling(&mut self) {
        if !self.after_operand
            && matches!(self.operators.last(), Some(Pending::And | Pending::Or))
        {
            self.operators.pop();
        }
    }

    fn close_group(&mut self) -> Result<(), ValidationError> {
        self.drop_dangling();
        loop {
            match self.operators.pop() {
                Some(Pending::Open) => {
                    self.after_operand = true;
                    return Ok(());
                }
                Some(operator) => self.apply(operator)?,
                None => return Err(ValidationError::MismatchedParentheses),
            }
        }
    }

    fn apply(&mut self, operator: Pending) -> Result<(), ValidationError> {
        let node = match operator {
            Pending::Not => Node::Not(self.pop_operand()?),
            Pending::And => {
                let right = self.pop_operand()?;
                Node::And(self.pop_operand()?, right)
            }
            Pending::Or => {
                let right = self.pop_operand()?;
                Node::Or(self.pop_operand()?, right)
            }
            Pending::Open => return Err(ValidationError::MismatchedParentheses),
        };
        self.push_operand(node);
        Ok(())
    }

    fn finish(mut self) -> Result<Expression, ValidationError> {
        self.drop_dangling();
        while let Some(operator) = self.operators.pop() {
            self.apply(operator)?;
        }

        let root_is_last = matches!(
            self.operands.as_slice(),
            [root] if root.0 + 1 == self.nodes.len()
        );
        if !root_is_last {
            return Err(ValidationError::InvalidSyntax);
        }
        Ok(Expression { nodes: self.nodes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(expression: &str) -> String {
        build(expression).unwrap().to_string()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("!(true&false)|true").unwrap(),
            vec![
                Token::Not,
                Token::Open,
                Token::Literal(true),
                Token::And,
                Token::Literal(false),
                Token::Close,
                Token::Or,
                Token::Literal(true),
            ]
        );
        assert_eq!(tokenize("trrue"), Err(ValidationError::InvalidSyntax));
        assert_eq!(tokenize("true$"), Err(ValidationError::InvalidCharacters));
    }

    #[test]
    fn test_operator_priority() {
        assert_eq!(canonical("true | false & false"), "(true | (false & false))");
        assert_eq!(canonical("!true & false | !false"), "((!true & false) | !false)");
        assert_eq!(canonical("(true | false) & false"), "((true | false) & false)");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(canonical("true & false & true"), "((true & false) & true)");
        assert_eq!(canonical("true | false | true"), "((true | false) | true)");
    }

    #[test]
    fn test_negation() {
        assert_eq!(canonical("!!true"), "!!true");
        assert_eq!(canonical("!(!true)"), "!!true");
        assert_eq!(canonical("!(true & false) | true"), "(!(true & false) | true)");
    }

    #[test]
    fn test_redundant_parentheses_and_whitespace() {
        assert_eq!(canonical("((true))"), "true");
        assert_eq!(canonical(" ( true|false ) "), "(true | false)");
        assert_eq!(canonical("tr ue"), "true");
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        assert_eq!(build("true true").unwrap_err(), ValidationError::InvalidSyntax);
        assert_eq!(build("()").unwrap_err(), ValidationError::InvalidSyntax);
        assert_eq!(build("(true").unwrap_err(), ValidationError::MismatchedParentheses);
        assert_eq!(build("true)").unwrap_err(), ValidationError::MismatchedParentheses);
    }

    #[test]
    fn test_dangling_operators_are_dropped() {
        assert_eq!(canonical("( true & )"), "true");
        assert_eq!(canonical("( & false )"), "false");
        assert_eq!(canonical("( | true ) & false"), "(true & false)");
        assert_eq!(canonical("!( true | )"), "!true");
        assert_eq!(canonical("( true & | )"), "true");
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 2_000;
        let text = format!("{}false{}", "!(".repeat(depth), ")".repeat(depth));
        let expression = build(&text).unwrap();
        assert_eq!(expression.node_count(), depth + 1);
        assert!(!expression.eval());
    }
}
