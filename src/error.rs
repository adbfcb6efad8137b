//! Error types for the rule engine

use thiserror::Error;

/// Malformed rule text, detected while parsing a token stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("empty rule")]
    EmptyRule,

    #[error("unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("expected `field operator value`, found {found} token(s)")]
    InvalidComparison { found: usize },

    #[error("unexpected parenthesis inside a comparison")]
    UnexpectedParenthesis,

    #[error("unknown comparison operator `{0}`")]
    UnknownOperator(String),

    #[error("logical operator `{0}` cannot be used in a comparison")]
    MisplacedLogicalOperator(String),

    #[error("expected AND or OR, found `{0}`")]
    ExpectedLogicalOperator(String),

    #[error("rule nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// Failure while evaluating an AST against a data record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("field not found: {0}")]
    FieldNotFound(String),

    #[error("cannot compare field `{field}` of type {actual} with a {expected} literal")]
    TypeMismatch {
        field: String,
        actual: &'static str,
        expected: &'static str,
    },

    #[error("malformed node: {0}")]
    MalformedNode(String),
}

/// Coarse error classification, stable across message changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Grammar,
    Input,
    Evaluation,
    Config,
}

/// Main error type for the rule engine
#[derive(Error, Debug)]
pub enum RuleEngineError {
    #[error("Invalid rule: {0}")]
    Grammar(#[from] GrammarError),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Error evaluating rule: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl RuleEngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuleEngineError::Grammar(_) => ErrorKind::Grammar,
            RuleEngineError::Input(_) => ErrorKind::Input,
            RuleEngineError::Evaluation(_) => ErrorKind::Evaluation,
            RuleEngineError::Config(_) => ErrorKind::Config,
        }
    }
}

/// Result type alias for the rule engine
pub type Result<T> = std::result::Result<T, RuleEngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_variant() {
        let err: RuleEngineError = GrammarError::EmptyRule.into();
        assert_eq!(err.kind(), ErrorKind::Grammar);

        let err: RuleEngineError = EvaluationError::FieldNotFound("age".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Evaluation);

        assert_eq!(
            RuleEngineError::Input("No rules provided".to_string()).kind(),
            ErrorKind::Input
        );
    }

    #[test]
    fn test_messages_wrap_inner_error() {
        let err: RuleEngineError = EvaluationError::FieldNotFound("age".to_string()).into();
        assert_eq!(err.to_string(), "Error evaluating rule: field not found: age");

        let err: RuleEngineError = GrammarError::InvalidComparison { found: 2 }.into();
        assert_eq!(
            err.to_string(),
            "Invalid rule: expected `field operator value`, found 2 token(s)"
        );
    }
}
