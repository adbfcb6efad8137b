//! Conversions between Python objects and engine types

use ahash::AHashMap;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyInt, PyList, PyString, PyTuple};
use pyo3::IntoPyObjectExt;
use serde_json::{Map, Number, Value};

use crate::error::RuleEngineError;
use crate::rule::{Node, Scalar, MAX_DEPTH};

/// Deepest dict/list nesting accepted from Python; an AST at `MAX_DEPTH`
/// needs one level more
const MAX_NESTING: usize = MAX_DEPTH + 1;

/// Convert a JSON-like Python object (dict, list, str, int, float, bool, None)
pub fn py_to_json(obj: &Bound<'_, PyAny>) -> PyResult<Value> {
    py_to_json_at(obj, 0)
}

fn py_to_json_at(obj: &Bound<'_, PyAny>, nesting: usize) -> PyResult<Value> {
    if obj.is_none() {
        return Ok(Value::Null);
    }
    // bool first: Python bools are also ints
    if obj.is_instance_of::<PyBool>() {
        return Ok(Value::Bool(obj.extract()?));
    }
    if obj.is_instance_of::<PyInt>() {
        if let Ok(i) = obj.extract::<i64>() {
            return Ok(Value::from(i));
        }
        if let Ok(u) = obj.extract::<u64>() {
            return Ok(Value::from(u));
        }
        return float_to_json(obj.extract()?);
    }
    if obj.is_instance_of::<PyFloat>() {
        return float_to_json(obj.extract()?);
    }
    if obj.is_instance_of::<PyString>() {
        return Ok(Value::String(obj.extract()?));
    }

    let is_container =
        obj.is_instance_of::<PyDict>() || obj.is_instance_of::<PyList>() || obj.is_instance_of::<PyTuple>();
    if is_container && nesting >= MAX_NESTING {
        return Err(RuleEngineError::Input(format!(
            "value nests deeper than {} levels",
            MAX_NESTING
        ))
        .into());
    }

    if let Ok(dict) = obj.cast::<PyDict>() {
        let mut map = Map::with_capacity(dict.len());
        for (key, value) in dict.iter() {
            let key: String = key.extract()?;
            map.insert(key, py_to_json_at(&value, nesting + 1)?);
        }
        return Ok(Value::Object(map));
    }
    if let Ok(list) = obj.cast::<PyList>() {
        return list
            .iter()
            .map(|item| py_to_json_at(&item, nesting + 1))
            .collect::<PyResult<_>>()
            .map(Value::Array);
    }
    if let Ok(tuple) = obj.cast::<PyTuple>() {
        return tuple
            .iter()
            .map(|item| py_to_json_at(&item, nesting + 1))
            .collect::<PyResult<_>>()
            .map(Value::Array);
    }

    Err(RuleEngineError::Input(format!(
        "unsupported Python type: {}",
        obj.get_type().name()?
    ))
    .into())
}

fn float_to_json(f: f64) -> PyResult<Value> {
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| RuleEngineError::Input(format!("non-finite float: {}", f)).into())
}

/// Convert a JSON value into the equivalent Python object
pub fn json_to_py<'py>(py: Python<'py>, value: &Value) -> PyResult<Bound<'py, PyAny>> {
    match value {
        Value::Null => Ok(py.None().into_bound(py)),
        Value::Bool(b) => (*b).into_bound_py_any(py),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into_bound_py_any(py)
            } else if let Some(u) = n.as_u64() {
                u.into_bound_py_any(py)
            } else {
                n.as_f64().unwrap_or(f64::NAN).into_bound_py_any(py)
            }
        }
        Value::String(s) => s.as_str().into_bound_py_any(py),
        Value::Array(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(json_to_py(py, item)?)?;
            }
            Ok(list.into_any())
        }
        Value::Object(map) => {
            let dict = PyDict::new(py);
            for (key, item) in map {
                dict.set_item(key, json_to_py(py, item)?)?;
            }
            Ok(dict.into_any())
        }
    }
}

/// AST as a Python dict in the interchange shape
pub fn node_to_py<'py>(py: Python<'py>, node: &Node) -> PyResult<Bound<'py, PyAny>> {
    let value = node.to_json_value()?;
    json_to_py(py, &value)
}

/// AST from a Python dict in the interchange shape
pub fn node_from_py(obj: &Bound<'_, PyAny>) -> PyResult<Node> {
    Ok(Node::from_json_value(py_to_json(obj)?)?)
}

/// Deserialize a data record from a Python dict of scalars
pub fn extract_record(dict: &Bound<'_, PyDict>) -> PyResult<AHashMap<String, Scalar>> {
    let mut record = AHashMap::with_capacity(dict.len());
    for (key, value) in dict.iter() {
        let field: String = key.extract()?;
        let scalar = extract_scalar(&field, &value)?;
        record.insert(field, scalar);
    }
    Ok(record)
}

fn extract_scalar(field: &str, obj: &Bound<'_, PyAny>) -> PyResult<Scalar> {
    if obj.is_instance_of::<PyBool>() {
        let b: bool = obj.extract()?;
        return Ok(Scalar::Integer(i64::from(b)));
    }
    if obj.is_instance_of::<PyInt>() {
        // Out-of-range ints compare as floats
        return Ok(match obj.extract::<i64>() {
            Ok(i) => Scalar::Integer(i),
            Err(_) => Scalar::Float(obj.extract()?),
        });
    }
    if obj.is_instance_of::<PyFloat>() {
        return Ok(Scalar::Float(obj.extract()?));
    }
    if obj.is_instance_of::<PyString>() {
        return Ok(Scalar::String(obj.extract()?));
    }

    Err(RuleEngineError::Input(format!(
        "field `{}` has unsupported value type {}",
        field,
        obj.get_type().name()?
    ))
    .into())
}
