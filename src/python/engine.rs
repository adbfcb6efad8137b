//! RuleEngine PyClass
//!
//! Holds a shared `RuleEngine` so Python request handlers can construct one
//! engine and reuse it; the engine itself is immutable apart from its parse
//! cache.

use std::sync::Arc;

use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::config::EngineConfig;
use crate::engine::RuleEngine;
use crate::rule::LogicalOperator;

use super::convert::{extract_record, node_from_py, node_to_py, py_to_json};

#[pyclass(name = "RuleEngine", module = "rule_engine_core", frozen)]
pub struct PyRuleEngine {
    inner: Arc<RuleEngine>,
}

#[pymethods]
impl PyRuleEngine {
    /// Create an engine, optionally from a config dict
    /// (`default_combine_operator`, `cache_capacity`)
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let config = match config {
            Some(dict) => EngineConfig::from_json_value(py_to_json(dict.as_any())?)?,
            None => EngineConfig::default(),
        };

        Ok(Self {
            inner: Arc::new(RuleEngine::with_config(config)),
        })
    }

    /// Parse a rule string and return its AST as a dict
    fn create_rule<'py>(&self, py: Python<'py>, rule: &str) -> PyResult<Bound<'py, PyAny>> {
        let ast = self.inner.create_rule(rule)?;
        node_to_py(py, &ast)
    }

    /// Combine several rule strings into one AST dict
    #[pyo3(signature = (rules, combine_operator="AND"))]
    fn combine_rules<'py>(
        &self,
        py: Python<'py>,
        rules: Vec<String>,
        combine_operator: &str,
    ) -> PyResult<Bound<'py, PyAny>> {
        let operator: LogicalOperator = combine_operator.parse()?;
        let ast = self.inner.combine_rules(&rules, operator)?;
        node_to_py(py, &ast)
    }

    /// Evaluate an AST dict against a data dict
    fn evaluate_rule(
        &self,
        rule_ast: &Bound<'_, PyAny>,
        data: &Bound<'_, PyDict>,
    ) -> PyResult<bool> {
        let ast = node_from_py(rule_ast)?;
        let record = extract_record(data)?;
        Ok(self.inner.evaluate_rule(&ast, &record)?)
    }

    /// Evaluate an AST dict against many data dicts off the event loop
    ///
    /// Returns an awaitable resolving to a list of booleans, one per record.
    fn evaluate_many_async<'py>(
        &self,
        py: Python<'py>,
        rule_ast: &Bound<'py, PyAny>,
        records: Vec<Bound<'py, PyDict>>,
    ) -> PyResult<Bound<'py, PyAny>> {
        // Convert while we still hold the GIL
        let ast = node_from_py(rule_ast)?;
        let records = records
            .iter()
            .map(|dict| extract_record(dict))
            .collect::<PyResult<Vec<_>>>()?;
        let engine = Arc::clone(&self.inner);

        pyo3_async_runtimes::tokio::future_into_py(py, async move {
            let verdicts = tokio::task::spawn_blocking(move || engine.evaluate_many(&ast, &records))
                .await
                .map_err(|e| {
                    PyRuntimeError::new_err(format!("Evaluation task panicked: {}", e))
                })??;

            Ok(verdicts)
        })
    }

    /// Drop every cached AST
    fn clear_cache(&self) {
        self.inner.cache().clear();
    }

    #[getter]
    fn cache_size(&self) -> usize {
        self.inner.cache().len()
    }

    fn __repr__(&self) -> String {
        let config = self.inner.config();
        format!(
            "RuleEngine(default_combine_operator='{}', cache_capacity={})",
            config.default_combine_operator, config.cache_capacity
        )
    }
}
