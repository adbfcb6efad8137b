//! Recursive-descent rule parser
//!
//! Parsing is a pure function of the token slice; nothing is kept between
//! calls, so a single parser can serve any number of threads.

use crate::error::GrammarError;
use crate::rule::ast::{Comparison, LogicalOperator, Node, Operator};
use crate::rule::tokenizer::tokenize;
use crate::rule::value::Scalar;

const OPEN_PAREN: &str = "(";
const CLOSE_PAREN: &str = ")";

/// Deepest nesting of groups and logical operators a rule may have
///
/// Every tree the parser accepts has `Node::depth() <= MAX_DEPTH`, which also
/// keeps its JSON form within `serde_json`'s recursion limit.
pub const MAX_DEPTH: usize = 100;

/// Tokenize and parse a rule string into an AST
pub fn parse_rule(rule: &str) -> Result<Node, GrammarError> {
    let tokens = tokenize(rule);
    parse(&tokens)
}

/// Parse a token sequence into an AST
///
/// Chains associate to the right: after a group or comparison, the logical
/// operator takes the entire remaining token stream as its right operand, so
/// `(A) AND (B) OR (C)` becomes `A AND (B OR C)`.
pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Node, GrammarError> {
    parse_at(tokens, 0)
}

/// `depth` counts the groups and logical operators enclosing `tokens`
fn parse_at<S: AsRef<str>>(tokens: &[S], depth: usize) -> Result<Node, GrammarError> {
    if depth > MAX_DEPTH {
        return Err(GrammarError::TooDeep { limit: MAX_DEPTH });
    }

    let Some(first) = tokens.first() else {
        return Err(GrammarError::EmptyRule);
    };

    if first.as_ref() == OPEN_PAREN {
        let close = matching_close(tokens)?;
        let left = parse_at(&tokens[1..close], depth + 1)?;
        parse_tail(left, &tokens[close + 1..], depth)
    } else {
        if tokens.len() < 3 {
            return Err(GrammarError::InvalidComparison {
                found: tokens.len(),
            });
        }
        let left = parse_comparison(&tokens[..3])?;
        parse_tail(left, &tokens[3..], depth)
    }
}

/// Index of the `)` closing the `(` at index 0
fn matching_close<S: AsRef<str>>(tokens: &[S]) -> Result<usize, GrammarError> {
    let mut depth = 1usize;

    for (i, token) in tokens.iter().enumerate().skip(1) {
        match token.as_ref() {
            OPEN_PAREN => depth += 1,
            CLOSE_PAREN => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }

    Err(GrammarError::UnbalancedParentheses)
}

/// Either nothing follows `left`, or `AND|OR <expr>` does
fn parse_tail<S: AsRef<str>>(
    left: Node,
    rest: &[S],
    depth: usize,
) -> Result<Node, GrammarError> {
    let Some((op_token, right_tokens)) = rest.split_first() else {
        return Ok(left);
    };

    let operator = logical_operator(op_token.as_ref())?;
    let right = parse_at(right_tokens, depth + 1)?;
    Ok(Node::logical(operator, left, right))
}

fn logical_operator(token: &str) -> Result<LogicalOperator, GrammarError> {
    Operator::from_symbol(token)
        .and_then(Operator::as_logical)
        .ok_or_else(|| GrammarError::ExpectedLogicalOperator(token.to_string()))
}

/// Parse exactly `field operator value`
fn parse_comparison<S: AsRef<str>>(tokens: &[S]) -> Result<Node, GrammarError> {
    let [field, op, value] = tokens else {
        return Err(GrammarError::InvalidComparison {
            found: tokens.len(),
        });
    };
    let (field, op, value) = (field.as_ref(), op.as_ref(), value.as_ref());

    if [field, op, value]
        .iter()
        .any(|t| *t == OPEN_PAREN || *t == CLOSE_PAREN)
    {
        return Err(GrammarError::UnexpectedParenthesis);
    }

    let operator = match Operator::from_symbol(op) {
        Some(parsed) => match parsed.as_comparison() {
            Some(cmp) => cmp,
            None => return Err(GrammarError::MisplacedLogicalOperator(op.to_string())),
        },
        None => return Err(GrammarError::UnknownOperator(op.to_string())),
    };

    Ok(Node::Comparison(Comparison {
        field: field.to_string(),
        operator,
        value: Scalar::from_literal(value),
    }))
}
