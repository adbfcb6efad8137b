//! Rule Engine Core - compiler and evaluator for a small boolean rule language
//!
//! Rules are comparisons on named fields joined by `AND`/`OR`, with
//! parenthesized grouping:
//!
//! ```
//! use rule_engine_core::engine::RuleEngine;
//! use rule_engine_core::rule::record_from_json;
//!
//! let engine = RuleEngine::new();
//! let ast = engine.create_rule("age > 30 AND department = 'Sales'").unwrap();
//!
//! let data = record_from_json(&serde_json::json!({"age": 35, "department": "Sales"})).unwrap();
//! assert!(engine.evaluate_rule(&ast, &data).unwrap());
//! ```
//!
//! Python bindings via PyO3 are available behind the `python` feature.

pub mod config;
pub mod engine;
pub mod error;
pub mod rule;

#[cfg(feature = "python")]
pub mod python;

pub use config::EngineConfig;
pub use engine::RuleEngine;
pub use error::{ErrorKind, EvaluationError, GrammarError, Result, RuleEngineError};
pub use rule::{LogicalOperator, Node, Operator, Record, Scalar};
