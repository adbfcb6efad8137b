//! JSON interchange format for ASTs and data records
//!
//! A node is an object carrying only the keys that apply to its shape:
//!
//! ```text
//! {"type": "comparison", "operator": ">", "value": 30, "field": "age"}
//! {"type": "operator", "operator": "AND", "left": {..}, "right": {..}}
//! ```

use ahash::AHashMap;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EvaluationError, Result, RuleEngineError};
use crate::rule::ast::{Comparison, Logical, Node, NodeType, Operator};
use crate::rule::parser::MAX_DEPTH;
use crate::rule::value::Scalar;

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Comparison(cmp) => {
                let mut node = serializer.serialize_struct("Node", 4)?;
                node.serialize_field("type", &NodeType::Comparison)?;
                node.serialize_field("operator", &Operator::from(cmp.operator))?;
                node.serialize_field("value", &cmp.value)?;
                node.serialize_field("field", &cmp.field)?;
                node.end()
            }
            Node::Logical(logical) => {
                let mut node = serializer.serialize_struct("Node", 4)?;
                node.serialize_field("type", &NodeType::Operator)?;
                node.serialize_field("operator", &Operator::from(logical.operator))?;
                node.serialize_field("left", logical.left.as_ref())?;
                node.serialize_field("right", logical.right.as_ref())?;
                node.end()
            }
        }
    }
}

/// Wire shape before validation; every key but `type` is optional
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNode {
    #[serde(rename = "type")]
    node_type: NodeType,
    operator: Option<Operator>,
    value: Option<Scalar>,
    field: Option<String>,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl RawNode {
    fn into_node(self) -> std::result::Result<Node, EvaluationError> {
        let malformed = |msg: &str| EvaluationError::MalformedNode(msg.to_string());

        match self.node_type {
            NodeType::Comparison => {
                if self.left.is_some() || self.right.is_some() {
                    return Err(malformed("comparison node cannot have children"));
                }
                let operator = self
                    .operator
                    .ok_or_else(|| malformed("comparison node is missing `operator`"))?;
                let operator = operator.as_comparison().ok_or_else(|| {
                    EvaluationError::MalformedNode(format!(
                        "`{}` is not a comparison operator",
                        operator
                    ))
                })?;
                let field = self
                    .field
                    .filter(|f| !f.is_empty())
                    .ok_or_else(|| malformed("comparison node is missing `field`"))?;
                let value = self
                    .value
                    .ok_or_else(|| malformed("comparison node is missing `value`"))?;

                Ok(Node::Comparison(Comparison {
                    field,
                    operator,
                    value,
                }))
            }
            NodeType::Operator => {
                if self.field.is_some() || self.value.is_some() {
                    return Err(malformed("operator node cannot have `field` or `value`"));
                }
                let operator = self
                    .operator
                    .ok_or_else(|| malformed("operator node is missing `operator`"))?;
                let operator = operator.as_logical().ok_or_else(|| {
                    EvaluationError::MalformedNode(format!("unsupported operator: {}", operator))
                })?;
                let (Some(left), Some(right)) = (self.left, self.right) else {
                    return Err(malformed("operator node needs both `left` and `right`"));
                };
                if 1 + left.depth().max(right.depth()) > MAX_DEPTH {
                    return Err(too_deep());
                }

                Ok(Node::Logical(Logical {
                    operator,
                    left,
                    right,
                }))
            }
            NodeType::Operand => Err(malformed("node type `operand` is reserved")),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawNode::deserialize(deserializer)?;
        raw.into_node().map_err(de::Error::custom)
    }
}

fn codec_error(err: serde_json::Error) -> RuleEngineError {
    EvaluationError::MalformedNode(err.to_string()).into()
}

fn too_deep() -> EvaluationError {
    EvaluationError::MalformedNode(format!("tree is deeper than {} levels", MAX_DEPTH))
}

/// Deepest object/array nesting in `value`, counted without recursion
fn nesting_depth(value: &Value) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(value, 1)];

    while let Some((value, level)) = stack.pop() {
        match value {
            Value::Object(map) => {
                deepest = deepest.max(level);
                stack.extend(map.values().map(|child| (child, level + 1)));
            }
            Value::Array(items) => {
                deepest = deepest.max(level);
                stack.extend(items.iter().map(|child| (child, level + 1)));
            }
            _ => {}
        }
    }

    deepest
}

impl Node {
    pub fn to_json_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(codec_error)
    }

    /// Decode an AST; values nested past `MAX_DEPTH` are rejected before
    /// any node is built
    pub fn from_json_value(value: Value) -> Result<Node> {
        // A node at depth d sits inside d + 1 JSON objects
        if nesting_depth(&value) > MAX_DEPTH + 1 {
            return Err(too_deep().into());
        }
        serde_json::from_value(value).map_err(codec_error)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(codec_error)
    }

    pub fn from_json_str(json: &str) -> Result<Node> {
        serde_json::from_str(json).map_err(codec_error)
    }
}

/// Decode a flat JSON object into a data record
///
/// Booleans count as the integers 0 and 1. Nulls, arrays and nested objects
/// are rejected.
pub fn record_from_json(value: &Value) -> Result<AHashMap<String, Scalar>> {
    let Value::Object(map) = value else {
        return Err(RuleEngineError::Input(
            "data record must be a JSON object".to_string(),
        ));
    };

    let mut record = AHashMap::with_capacity(map.len());
    for (field, value) in map {
        record.insert(field.clone(), scalar_from_json(field, value)?);
    }
    Ok(record)
}

fn scalar_from_json(field: &str, value: &Value) -> Result<Scalar> {
    match value {
        Value::Bool(b) => Ok(Scalar::Integer(i64::from(*b))),
        Value::Number(n) => Ok(match n.as_i64() {
            Some(i) => Scalar::Integer(i),
            None => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
        }),
        Value::String(s) => Ok(Scalar::String(s.clone())),
        other => Err(RuleEngineError::Input(format!(
            "field `{}` has unsupported value {}",
            field, other
        ))),
    }
}
