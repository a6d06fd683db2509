//! Alphabet of the expression language.
//!
//! Every character of an input expression is checked against these constants.
//! The set is closed: anything not listed here is rejected.

/// Unary negation.
pub const OPERATOR_NOT: char = '!';

/// Binary conjunction. Binds tighter than `OPERATOR_OR`.
pub const OPERATOR_AND: char = '&';

/// Binary disjunction.
pub const OPERATOR_OR: char = '|';

pub const TRUE_LITERAL: &str = "true";
pub const FALSE_LITERAL: &str = "false";

pub const LEFT_PARENTHESIS: char = '(';
pub const RIGHT_PARENTHESIS: char = ')';

/// The only whitespace character accepted in an expression.
pub const SPACE: char = ' ';

/// Negated literals, rewritten to their complement during NOT folding.
pub const NOT_TRUE: &str = "!true";
pub const NOT_FALSE: &str = "!false";

/// Text of the literal for `value`.
pub fn literal(value: bool) -> &'static str {
    if value {
        TRUE_LITERAL
    } else {
        FALSE_LITERAL
    }
}

/// Value of `text` if it is exactly one of the two literals.
pub fn parse_literal(text: &str) -> Option<bool> {
    match text {
        TRUE_LITERAL => Some(true),
        FALSE_LITERAL => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_round_trip() {
        assert_eq!(parse_literal(literal(true)), Some(true));
        assert_eq!(parse_literal(literal(false)), Some(false));
    }

    #[test]
    fn test_parse_literal_is_exact() {
        assert_eq!(parse_literal("True"), None);
        assert_eq!(parse_literal(" true"), None);
        assert_eq!(parse_literal("truefalse"), None);
        assert_eq!(parse_literal(""), None);
    }

    #[test]
    fn test_negated_literals_match_operators() {
        assert_eq!(NOT_TRUE, format!("{OPERATOR_NOT}{TRUE_LITERAL}"));
        assert_eq!(NOT_FALSE, format!("{OPERATOR_NOT}{FALSE_LITERAL}"));
    }
}
