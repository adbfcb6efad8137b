//! Rule engine facade

use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::error::{GrammarError, Result, RuleEngineError};
use crate::rule::{evaluate, LogicalOperator, Node, Record, RuleCache, MAX_DEPTH};

/// Entry point for creating, combining and evaluating rules
///
/// The engine keeps no per-call state; the only thing it owns besides its
/// configuration is an internally synchronized parse cache, so one value can
/// be shared freely between threads.
#[derive(Debug)]
pub struct RuleEngine {
    config: EngineConfig,
    cache: RuleCache,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let cache = RuleCache::new(config.cache_capacity);
        Self { config, cache }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &RuleCache {
        &self.cache
    }

    /// Create an AST from a rule string
    #[instrument(level = "debug", skip(self))]
    pub fn create_rule(&self, rule: &str) -> Result<Node> {
        let ast = self.cache.get_or_parse(rule)?;
        Ok(Node::clone(&ast))
    }

    /// Combine multiple rules into a single AST
    ///
    /// A single rule comes back exactly as `create_rule` would return it.
    /// Several rules are folded from the left: `((r1 op r2) op r3) op ...`.
    /// The folded tree obeys the same `MAX_DEPTH` bound as a parsed rule.
    #[instrument(level = "debug", skip(self, rules), fields(count = rules.len()))]
    pub fn combine_rules<S: AsRef<str>>(
        &self,
        rules: &[S],
        combine_operator: LogicalOperator,
    ) -> Result<Node> {
        let Some((first, rest)) = rules.split_first() else {
            return Err(RuleEngineError::Input("No rules provided".to_string()));
        };

        let mut combined = self.create_rule(first.as_ref())?;
        let mut depth = combined.depth();
        for rule in rest {
            let node = self.create_rule(rule.as_ref())?;
            depth = depth.max(node.depth()) + 1;
            if depth > MAX_DEPTH {
                return Err(GrammarError::TooDeep { limit: MAX_DEPTH }.into());
            }
            combined = Node::logical(combine_operator, combined, node);
        }

        Ok(combined)
    }

    /// Combine rules with the configured default operator
    pub fn combine<S: AsRef<str>>(&self, rules: &[S]) -> Result<Node> {
        self.combine_rules(rules, self.config.default_combine_operator)
    }

    /// Evaluate a rule against provided data
    #[instrument(level = "debug", skip_all)]
    pub fn evaluate_rule<R: Record + ?Sized>(&self, ast: &Node, data: &R) -> Result<bool> {
        evaluate(ast, data).map_err(|e| {
            debug!(error = %e, "rule evaluation failed");
            RuleEngineError::from(e)
        })
    }

    /// Evaluate one rule against several records, stopping at the first failure
    pub fn evaluate_many<R: Record>(&self, ast: &Node, records: &[R]) -> Result<Vec<bool>> {
        records
            .iter()
            .map(|record| self.evaluate_rule(ast, record))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, EvaluationError, GrammarError};
    use crate::rule::{record_from_json, ComparisonOperator, Scalar};
    use serde_json::json;
    use std::collections::HashMap;

    const SALES_RULE: &str = "age > 30 AND department = 'Sales'";
    const SENIOR_RULE: &str = "salary > 50000 OR experience > 5";

    fn sales_ast() -> Node {
        Node::and(
            Node::comparison("age", ComparisonOperator::Greater, 30),
            Node::comparison("department", ComparisonOperator::Equal, "Sales"),
        )
    }

    #[test]
    fn test_create_rule() {
        let engine = RuleEngine::new();
        assert_eq!(engine.create_rule(SALES_RULE).unwrap(), sales_ast());
    }

    #[test]
    fn test_evaluate_rule() {
        let engine = RuleEngine::new();
        let ast = engine.create_rule(SALES_RULE).unwrap();

        let data = record_from_json(&json!({"age": 35, "department": "Sales"})).unwrap();
        assert!(engine.evaluate_rule(&ast, &data).unwrap());

        let data = record_from_json(&json!({"age": 25, "department": "Sales"})).unwrap();
        assert!(!engine.evaluate_rule(&ast, &data).unwrap());
    }

    #[test]
    fn test_combine_rules() {
        let engine = RuleEngine::new();
        let combined = engine
            .combine_rules(&[SALES_RULE, SENIOR_RULE], LogicalOperator::And)
            .unwrap();

        let expected = Node::and(sales_ast(), engine.create_rule(SENIOR_RULE).unwrap());
        assert_eq!(combined, expected);
    }

    #[test]
    fn test_combine_folds_left() {
        let engine = RuleEngine::new();
        let combined = engine
            .combine_rules(&["a = 1", "b = 2", "c = 3"], LogicalOperator::Or)
            .unwrap();

        let cmp = |f: &str, v: i64| Node::comparison(f, ComparisonOperator::Equal, v);
        assert_eq!(
            combined,
            Node::or(Node::or(cmp("a", 1), cmp("b", 2)), cmp("c", 3))
        );
    }

    #[test]
    fn test_combine_single_rule_is_unwrapped() {
        let engine = RuleEngine::new();
        assert_eq!(
            engine.combine_rules(&[SALES_RULE], LogicalOperator::Or).unwrap(),
            engine.create_rule(SALES_RULE).unwrap()
        );
    }

    #[test]
    fn test_combine_empty_is_input_error() {
        let engine = RuleEngine::new();
        let rules: [&str; 0] = [];
        let err = engine.combine_rules(&rules, LogicalOperator::And).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_combine_propagates_grammar_error() {
        let engine = RuleEngine::new();
        let err = engine
            .combine_rules(&["a = 1", "broken"], LogicalOperator::And)
            .unwrap_err();
        assert!(matches!(
            err,
            RuleEngineError::Grammar(GrammarError::InvalidComparison { found: 1 })
        ));
    }

    #[test]
    fn test_combine_uses_configured_default() {
        let engine = RuleEngine::with_config(EngineConfig {
            default_combine_operator: LogicalOperator::Or,
            ..EngineConfig::default()
        });
        let combined = engine.combine(&["a = 1", "b = 2"]).unwrap();
        assert!(matches!(combined, Node::Logical(ref l) if l.operator == LogicalOperator::Or));
    }

    #[test]
    fn test_combine_rejects_too_many_rules() {
        let engine = RuleEngine::new();
        let rules = vec!["a > 1"; 10_000];
        let err = engine.combine_rules(&rules, LogicalOperator::Or).unwrap_err();
        assert!(matches!(
            err,
            RuleEngineError::Grammar(GrammarError::TooDeep { limit: MAX_DEPTH })
        ));

        let rules = vec!["a > 1"; MAX_DEPTH + 1];
        let combined = engine.combine_rules(&rules, LogicalOperator::Or).unwrap();
        assert_eq!(combined.depth(), MAX_DEPTH);
    }

    #[test]
    fn test_invalid_rule() {
        let engine = RuleEngine::new();
        let err = engine.create_rule("invalid rule syntax").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Grammar);
    }

    #[test]
    fn test_missing_field() {
        let engine = RuleEngine::new();
        let ast = Node::comparison("missing_field", ComparisonOperator::Greater, 1);
        let data: HashMap<String, Scalar> = HashMap::new();

        let err = engine.evaluate_rule(&ast, &data).unwrap_err();
        assert!(matches!(
            err,
            RuleEngineError::Evaluation(EvaluationError::FieldNotFound(ref f)) if f == "missing_field"
        ));
    }

    #[test]
    fn test_create_rule_uses_cache() {
        let engine = RuleEngine::new();
        engine.create_rule(SALES_RULE).unwrap();
        engine.create_rule(SALES_RULE).unwrap();
        assert_eq!(engine.cache().len(), 1);
    }

    #[test]
    fn test_evaluate_many() {
        let engine = RuleEngine::new();
        let ast = engine.create_rule("age > 30").unwrap();
        let records = vec![
            record_from_json(&json!({"age": 31})).unwrap(),
            record_from_json(&json!({"age": 30})).unwrap(),
        ];
        assert_eq!(engine.evaluate_many(&ast, &records).unwrap(), vec![true, false]);

        let records = vec![record_from_json(&json!({})).unwrap()];
        assert!(engine.evaluate_many(&ast, &records).is_err());
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        let engine = std::sync::Arc::new(RuleEngine::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let engine = std::sync::Arc::clone(&engine);
                std::thread::spawn(move || {
                    let ast = engine.create_rule(&format!("(x > {}) OR (y < {})", i, i)).unwrap();
                    let data = record_from_json(&json!({"x": i + 1, "y": 100})).unwrap();
                    engine.evaluate_rule(&ast, &data).unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
