//! Python bindings via PyO3
//!
//! Each error kind gets its own exception class; all of them derive from
//! `ValueError`, so callers that do not care about the kind can catch that.

mod convert;
mod engine;

use pyo3::create_exception;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::{ErrorKind, RuleEngineError};

pub use convert::*;
pub use engine::PyRuleEngine;

create_exception!(rule_engine_core, GrammarError, PyValueError, "Malformed rule text");
create_exception!(rule_engine_core, InputError, PyValueError, "Invalid call arguments");
create_exception!(rule_engine_core, EvaluationError, PyValueError, "Rule evaluation failed");
create_exception!(rule_engine_core, ConfigError, PyValueError, "Invalid engine configuration");

impl From<RuleEngineError> for PyErr {
    fn from(err: RuleEngineError) -> PyErr {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Grammar => GrammarError::new_err(message),
            ErrorKind::Input => InputError::new_err(message),
            ErrorKind::Evaluation => EvaluationError::new_err(message),
            ErrorKind::Config => ConfigError::new_err(message),
        }
    }
}

/// Split a rule string into tokens (useful when debugging grammar errors)
#[pyfunction]
fn tokenize(rule: &str) -> Vec<String> {
    crate::rule::tokenize(rule)
}

/// Python module definition
#[pymodule]
fn rule_engine_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add_class::<PyRuleEngine>()?;
    m.add_function(wrap_pyfunction!(tokenize, m)?)?;
    m.add("GrammarError", py.get_type::<GrammarError>())?;
    m.add("InputError", py.get_type::<InputError>())?;
    m.add("EvaluationError", py.get_type::<EvaluationError>())?;
    m.add("ConfigError", py.get_type::<ConfigError>())?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
