//! Engine configuration

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, RuleEngineError};
use crate::rule::LogicalOperator;

/// Default number of parsed rules kept by the rule cache
pub const DEFAULT_CACHE_CAPACITY: usize = 2048;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Operator used by `RuleEngine::combine` when none is given
    pub default_combine_operator: LogicalOperator,
    /// Maximum number of cached ASTs; 0 disables the cache
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_combine_operator: LogicalOperator::And,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RuleEngineError::Config(e.to_string()))
    }

    pub fn from_json_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| RuleEngineError::Config(e.to_string()))
    }
}
