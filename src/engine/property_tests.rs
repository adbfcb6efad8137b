//! Property tests for the engine facade

use proptest::prelude::*;

use crate::engine::RuleEngine;
use crate::error::ErrorKind;
use crate::rule::{record_from_json, ComparisonOperator, LogicalOperator, Node};

fn simple_rule_strategy() -> impl Strategy<Value = (String, Node)> {
    (
        "[a-z]{1,8}",
        prop_oneof![
            Just((">", ComparisonOperator::Greater)),
            Just(("<", ComparisonOperator::Less)),
            Just(("=", ComparisonOperator::Equal)),
            Just((">=", ComparisonOperator::GreaterEqual)),
            Just(("<=", ComparisonOperator::LessEqual)),
        ],
        -1000..=1000i64,
    )
        .prop_map(|(field, (symbol, op), value)| {
            let rule = format!("{} {} {}", field, symbol, value);
            (rule, Node::comparison(field, op, value))
        })
}

proptest! {
    /// combine_rules folds pairwise from the left, in input order
    #[test]
    fn prop_combine_folds_left(
        rules in prop::collection::vec(simple_rule_strategy(), 1..8),
        use_or in any::<bool>()
    ) {
        let op = if use_or { LogicalOperator::Or } else { LogicalOperator::And };
        let engine = RuleEngine::new();
        let texts: Vec<&str> = rules.iter().map(|(text, _)| text.as_str()).collect();

        let combined = engine.combine_rules(&texts, op).unwrap();

        let mut nodes = rules.into_iter().map(|(_, node)| node);
        let first = nodes.next().unwrap();
        let expected = nodes.fold(first, |acc, node| Node::logical(op, acc, node));
        prop_assert_eq!(combined, expected);
    }

    /// A single rule is returned without a wrapping node
    #[test]
    fn prop_combine_single_rule((rule, node) in simple_rule_strategy()) {
        let engine = RuleEngine::new();
        prop_assert_eq!(engine.combine_rules(&[rule.as_str()], LogicalOperator::And).unwrap(), node);
    }

    /// The engine gives the same verdict no matter how often it is asked
    #[test]
    fn prop_evaluate_rule_idempotent(age in 0..=120i64, threshold in 0..=120i64) {
        let engine = RuleEngine::new();
        let ast = engine.create_rule(&format!("age > {} AND department = 'Sales'", threshold)).unwrap();
        let data = record_from_json(&serde_json::json!({"age": age, "department": "Sales"})).unwrap();

        let first = engine.evaluate_rule(&ast, &data).unwrap();
        prop_assert_eq!(first, age > threshold);
        for _ in 0..3 {
            prop_assert_eq!(engine.evaluate_rule(&ast, &data).unwrap(), first);
        }
    }

    /// Any rule list containing a malformed rule fails as a grammar error
    #[test]
    fn prop_combine_reports_grammar_errors(
        rules in prop::collection::vec(simple_rule_strategy(), 0..4),
        position in 0..4usize
    ) {
        let engine = RuleEngine::new();
        let mut texts: Vec<String> = rules.into_iter().map(|(text, _)| text).collect();
        let position = position.min(texts.len());
        texts.insert(position, "field >".to_string());

        let err = engine.combine_rules(&texts, LogicalOperator::And).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Grammar);
    }
}
