//! Expression trees.
//!
//! An `Expression` is an arena of nodes stored in post-order: children always
//! precede their parent and the root is the last node. Evaluation, depth and
//! rendering walk the arena with explicit stacks, so nesting depth never turns
//! into call depth (and dropping a tree is a flat `Vec` drop).
//!
//! ```rust
//! use boolex_core::Expression;
//!
//! let expression: Expression = "!(true & false) | false".parse().unwrap();
//! assert!(expression.eval());
//! assert_eq!(expression.to_string(), "(!(true & false) | false)");
//! ```

pub(crate) mod parser;

use std::fmt::{self, Display, Formatter};
use std::ops::{BitAnd, BitOr, Not};
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValidationError;
use crate::syntax;

/// Index of a node inside its `Expression` arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single node of the expression tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Literal(bool),
    Not(NodeId),
    And(NodeId, NodeId),
    Or(NodeId, NodeId),
}

impl Node {
    fn shifted(self, offset: usize) -> Node {
        let shift = |id: NodeId| NodeId(id.0 + offset);
        match self {
            Node::Literal(value) => Node::Literal(value),
            Node::Not(inner) => Node::Not(shift(inner)),
            Node::And(left, right) => Node::And(shift(left), shift(right)),
            Node::Or(left, right) => Node::Or(shift(left), shift(right)),
        }
    }
}

/// Arena-indexed boolean expression tree.
///
/// Always holds at least one node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Expression {
    nodes: Vec<Node>,
}

impl Expression {
    pub fn literal(value: bool) -> Self {
        Self {
            nodes: vec![Node::Literal(value)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// All nodes in post-order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Evaluate the tree bottom-up.
    pub fn eval(&self) -> bool {
        let mut values: Vec<bool> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let value = match *node {
                Node::Literal(value) => value,
                Node::Not(inner) => !values[inner.0],
                Node::And(left, right) => values[left.0] && values[right.0],
                Node::Or(left, right) => values[left.0] || values[right.0],
            };
            values.push(value);
        }
        values[self.root().0]
    }

    /// Length of the longest root-to-leaf path, counted in nodes.
    pub fn depth(&self) -> usize {
        let mut depths: Vec<usize> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let depth = match *node {
                Node::Literal(_) => 1,
                Node::Not(inner) => depths[inner.0] + 1,
                Node::And(left, right) | Node::Or(left, right) => {
                    depths[left.0].max(depths[right.0]) + 1
                }
            };
            depths.push(depth);
        }
        depths[self.root().0]
    }

    fn join(mut self, other: Expression, make: fn(NodeId, NodeId) -> Node) -> Self {
        let left = self.root();
        let offset = self.nodes.len();
        self.nodes
            .extend(other.nodes.into_iter().map(|node| node.shifted(offset)));
        let right = self.root();
        self.nodes.push(make(left, right));
        self
    }
}

impl Not for Expression {
    type Output = Expression;

    fn not(mut self) -> Expression {
        let inner = self.root();
        self.nodes.push(Node::Not(inner));
        self
    }
}

impl BitAnd for Expression {
    type Output = Expression;

    fn bitand(self, rhs: Expression) -> Expression {
        self.join(rhs, Node::And)
    }
}

impl BitOr for Expression {
    type Output = Expression;

    fn bitor(self, rhs: Expression) -> Expression {
        self.join(rhs, Node::Or)
    }
}

impl FromStr for Expression {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s)
    }
}

/// Canonical form: binary nodes fully parenthesized, NOT as a bare prefix.
/// The output is itself a valid expression with the same value.
impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        enum Step {
            Visit(NodeId),
            Text(&'static str),
        }

        let mut stack = vec![Step::Visit(self.root())];
        while let Some(step) = stack.pop() {
            match step {
                Step::Text(text) => f.write_str(text)?,
                Step::Visit(id) => match self.nodes[id.0] {
                    Node::Literal(value) => f.write_str(syntax::literal(value))?,
                    Node::Not(inner) => {
                        write!(f, "{}", syntax::OPERATOR_NOT)?;
                        stack.push(Step::Visit(inner));
                    }
                    Node::And(left, right) => {
                        write!(f, "{}", syntax::LEFT_PARENTHESIS)?;
                        stack.extend([
                            Step::Text(")"),
                            Step::Visit(right),
                            Step::Text(" & "),
                            Step::Visit(left),
                        ]);
                    }
                    Node::Or(left, right) => {
                        write!(f, "{}", syntax::LEFT_PARENTHESIS)?;
                        stack.extend([
                            Step::Text(")"),
                            Step::Visit(right),
                            Step::Text(" | "),
                            Step::Visit(left),
                        ]);
                    }
                },
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Evaluator;
    use proptest::prelude::*;

    fn t() -> Expression {
        Expression::literal(true)
    }

    fn f() -> Expression {
        Expression::literal(false)
    }

    #[test]
    fn test_combinators_build_post_order() {
        let expression = t() & !f();
        assert_eq!(
            expression.nodes(),
            &[
                Node::Literal(true),
                Node::Literal(false),
                Node::Not(NodeId(1)),
                Node::And(NodeId(0), NodeId(2)),
            ]
        );
        assert_eq!(expression.root(), NodeId(3));
        assert_eq!(expression.root().index(), expression.node_count() - 1);
        assert_eq!(expression.node(NodeId(2)), Some(&Node::Not(NodeId(1))));
        assert_eq!(expression.node(NodeId(4)), None);
    }

    #[test]
    fn test_eval() {
        assert!(t().eval());
        assert!(!f().eval());
        assert!(!(t() & f()).eval());
        assert!((t() | f()).eval());
        assert!((!f()).eval());
        assert!((t() | f() & f()).eval());
        assert!(!((t() | f()) & f()).eval());
    }

    #[test]
    fn test_depth() {
        assert_eq!(t().depth(), 1);
        assert_eq!((!t()).depth(), 2);
        assert_eq!(((t() & f()) | t()).depth(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(t().to_string(), "true");
        assert_eq!((!!f()).to_string(), "!!false");
        assert_eq!((t() & f() | t()).to_string(), "((true & false) | true)");
        assert_eq!((!(t() | f()) & t()).to_string(), "(!(true | false) & true)");
    }

    #[test]
    fn test_from_str() {
        let expression: Expression = "true | false & !false".parse().unwrap();
        assert_eq!(expression, t() | (f() & !f()));

        let error = "true &".parse::<Expression>().unwrap_err();
        assert_eq!(error, ValidationError::InvalidBinaryOperatorSyntax);
    }

    #[test]
    fn test_deep_tree_without_recursion() {
        let mut expression = t();
        for _ in 0..100_000 {
            expression = !expression;
        }
        assert!(expression.eval());
        assert_eq!(expression.depth(), 100_001);
        assert_eq!(expression.to_string().len(), 100_004);
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_value(!t()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "nodes": [{ "literal": true }, { "not": 0 }] })
        );
    }

    fn expression_strategy() -> impl Strategy<Value = Expression> {
        let leaf = any::<bool>().prop_map(Expression::literal);
        leaf.prop_recursive(6, 64, 2, |inner| {
            prop_oneof![
                inner.clone().prop_map(|e| !e),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| l & r),
                (inner.clone(), inner).prop_map(|(l, r)| l | r),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_canonical_form_evaluates_to_tree_value(expression in expression_strategy()) {
            let evaluator = Evaluator::new();
            prop_assert_eq!(evaluator.evaluate(&expression.to_string()), Ok(expression.eval()));
        }

        #[test]
        fn prop_canonical_form_parses_back(expression in expression_strategy()) {
            let evaluator = Evaluator::new();
            prop_assert_eq!(evaluator.parse(&expression.to_string()), Ok(expression));
        }

        #[test]
        fn prop_grouping_is_transparent(expression in expression_strategy()) {
            let evaluator = Evaluator::new();
            let text = expression.to_string();
            prop_assert_eq!(evaluator.evaluate(&format!("({text})")), evaluator.evaluate(&text));
        }
    }
}
