//! Rule evaluator

use std::cmp::Ordering;

use crate::error::EvaluationError;
use crate::rule::ast::{Comparison, ComparisonOperator, LogicalOperator, Node};
use crate::rule::value::Record;

/// Evaluate an AST against a data record
///
/// AND stops at the first false operand and OR at the first true one; the
/// skipped subtree is never looked at, so errors it would raise do not
/// surface.
pub fn evaluate<R: Record + ?Sized>(node: &Node, record: &R) -> Result<bool, EvaluationError> {
    match node {
        Node::Comparison(cmp) => evaluate_comparison(cmp, record),
        Node::Logical(logical) => {
            let left = evaluate(&logical.left, record)?;
            match (logical.operator, left) {
                (LogicalOperator::And, false) => Ok(false),
                (LogicalOperator::Or, true) => Ok(true),
                _ => evaluate(&logical.right, record),
            }
        }
    }
}

fn evaluate_comparison<R: Record + ?Sized>(
    cmp: &Comparison,
    record: &R,
) -> Result<bool, EvaluationError> {
    let actual = record
        .field(&cmp.field)
        .ok_or_else(|| EvaluationError::FieldNotFound(cmp.field.clone()))?;

    match actual.partial_order(&cmp.value) {
        Some(ordering) => Ok(ordering.is_some_and(|ord| cmp.operator.holds_for(ord))),
        None => Err(EvaluationError::TypeMismatch {
            field: cmp.field.clone(),
            actual: actual.type_name(),
            expected: cmp.value.type_name(),
        }),
    }
}

impl ComparisonOperator {
    /// Whether `actual <op> expected` holds, given `actual.cmp(expected)`
    #[inline]
    pub fn holds_for(self, ordering: Ordering) -> bool {
        match self {
            ComparisonOperator::Greater => ordering == Ordering::Greater,
            ComparisonOperator::Less => ordering == Ordering::Less,
            ComparisonOperator::Equal => ordering == Ordering::Equal,
            ComparisonOperator::GreaterEqual => ordering != Ordering::Less,
            ComparisonOperator::LessEqual => ordering != Ordering::Greater,
        }
    }
}
