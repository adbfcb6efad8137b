//! Parsed-rule cache keyed by rule text

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::error::GrammarError;
use crate::rule::ast::Node;
use crate::rule::parser;

/// Rule text to AST cache with fast hashing (ahash)
///
/// Safe to share between threads; lookups take a read lock and only misses
/// take the write lock.
#[derive(Debug)]
pub struct RuleCache {
    entries: RwLock<AHashMap<String, Arc<Node>>>,
    capacity: usize,
}

impl RuleCache {
    /// A capacity of 0 disables caching entirely
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(AHashMap::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    /// Get or parse a rule string, using the cache for repeated rules
    #[inline]
    pub fn get_or_parse(&self, rule: &str) -> Result<Arc<Node>, GrammarError> {
        // Fast path: check read lock first
        {
            let entries = self.entries.read();
            if let Some(ast) = entries.get(rule) {
                trace!(rule, "rule cache hit");
                return Ok(Arc::clone(ast));
            }
        }

        // Slow path: parse and cache; failures are never stored
        let ast = Arc::new(parser::parse_rule(rule)?);

        if self.capacity > 0 {
            let mut entries = self.entries.write();
            if entries.len() >= self.capacity && !entries.contains_key(rule) {
                debug!(evicted = entries.len(), "rule cache full, clearing");
                entries.clear();
            }
            entries.insert(rule.to_string(), Arc::clone(&ast));
        }

        Ok(ast)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
