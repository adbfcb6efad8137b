//! Abstract Syntax Tree for rule expressions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuleEngineError;
use crate::rule::value::Scalar;

/// AST node for rule expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Leaf comparison like `age > 30`
    Comparison(Comparison),
    /// AND / OR over two subtrees
    Logical(Logical),
}

/// Single comparison of a record field against a literal
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub field: String,
    pub operator: ComparisonOperator,
    pub value: Scalar,
}

/// Binary logical combination; each node owns both children
#[derive(Debug, Clone, PartialEq)]
pub struct Logical {
    pub operator: LogicalOperator,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

impl Node {
    pub fn comparison(
        field: impl Into<String>,
        operator: ComparisonOperator,
        value: impl Into<Scalar>,
    ) -> Self {
        Node::Comparison(Comparison {
            field: field.into(),
            operator,
            value: value.into(),
        })
    }

    pub fn logical(operator: LogicalOperator, left: Node, right: Node) -> Self {
        Node::Logical(Logical {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn and(left: Node, right: Node) -> Self {
        Self::logical(LogicalOperator::And, left, right)
    }

    pub fn or(left: Node, right: Node) -> Self {
        Self::logical(LogicalOperator::Or, left, right)
    }

    /// Interchange tag for this node
    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Comparison(_) => NodeType::Comparison,
            Node::Logical(_) => NodeType::Operator,
        }
    }

    /// Operator carried by this node, in the unified token form
    pub fn operator(&self) -> Operator {
        match self {
            Node::Comparison(cmp) => cmp.operator.into(),
            Node::Logical(logical) => logical.operator.into(),
        }
    }

    /// Number of edges on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        match self {
            Node::Comparison(_) => 0,
            Node::Logical(logical) => 1 + logical.left.depth().max(logical.right.depth()),
        }
    }

    /// Number of comparison leaves
    pub fn comparison_count(&self) -> usize {
        match self {
            Node::Comparison(_) => 1,
            Node::Logical(logical) => {
                logical.left.comparison_count() + logical.right.comparison_count()
            }
        }
    }
}

/// Node tag used by the JSON interchange format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Comparison,
    Operator,
    /// Reserved; never produced by the parser and rejected on decode
    Operand,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Comparison => "comparison",
            NodeType::Operator => "operator",
            NodeType::Operand => "operand",
        }
    }
}

/// Every operator token the grammar knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
}

impl Operator {
    /// Exact, case-sensitive match on the token text
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "AND" => Some(Operator::And),
            "OR" => Some(Operator::Or),
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            "=" => Some(Operator::Eq),
            ">=" => Some(Operator::Gte),
            "<=" => Some(Operator::Lte),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Eq => "=",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
        }
    }

    pub fn as_logical(self) -> Option<LogicalOperator> {
        match self {
            Operator::And => Some(LogicalOperator::And),
            Operator::Or => Some(LogicalOperator::Or),
            _ => None,
        }
    }

    pub fn as_comparison(self) -> Option<ComparisonOperator> {
        match self {
            Operator::Gt => Some(ComparisonOperator::Greater),
            Operator::Lt => Some(ComparisonOperator::Less),
            Operator::Eq => Some(ComparisonOperator::Equal),
            Operator::Gte => Some(ComparisonOperator::GreaterEqual),
            Operator::Lte => Some(ComparisonOperator::LessEqual),
            Operator::And | Operator::Or => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// Greater than (>)
    Greater,
    /// Less than (<)
    Less,
    /// Equal (=)
    Equal,
    /// Greater than or equal (>=)
    GreaterEqual,
    /// Less than or equal (<=)
    LessEqual,
}

impl From<ComparisonOperator> for Operator {
    fn from(op: ComparisonOperator) -> Self {
        match op {
            ComparisonOperator::Greater => Operator::Gt,
            ComparisonOperator::Less => Operator::Lt,
            ComparisonOperator::Equal => Operator::Eq,
            ComparisonOperator::GreaterEqual => Operator::Gte,
            ComparisonOperator::LessEqual => Operator::Lte,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Operator::from(*self), f)
    }
}

/// Logical operators joining two subtrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl From<LogicalOperator> for Operator {
    fn from(op: LogicalOperator) -> Self {
        match op {
            LogicalOperator::And => Operator::And,
            LogicalOperator::Or => Operator::Or,
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Operator::from(*self), f)
    }
}

impl FromStr for LogicalOperator {
    type Err = RuleEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::from_symbol(s)
            .and_then(Operator::as_logical)
            .ok_or_else(|| {
                RuleEngineError::Input(format!("combine operator must be AND or OR, got `{}`", s))
            })
    }
}
