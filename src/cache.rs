//! `MetricCache`: per-render memoization of resolved module members.

use crate::value::TaggedValue;
use std::collections::HashMap;

/// `module -> member -> value`, written at most once per key.
#[derive(Debug, Clone, Default)]
pub struct MetricCache {
    modules: HashMap<String, HashMap<String, TaggedValue>>,
}

impl MetricCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached member.
    pub fn get(&self, module: &str, member: &str) -> Option<&TaggedValue> {
        self.modules.get(module)?.get(member)
    }

    /// Check if a member is cached.
    pub fn contains(&self, module: &str, member: &str) -> bool {
        self.get(module, member).is_some()
    }

    /// Store a value unless the key is already present, and return the
    /// value that ends up cached.
    pub fn insert(&mut self, module: &str, member: &str, value: TaggedValue) -> &TaggedValue {
        self.modules
            .entry(module.to_owned())
            .or_default()
            .entry(member.to_owned())
            .or_insert(value)
    }

    /// Number of cached members across all modules.
    pub fn len(&self) -> usize {
        self.modules.values().map(HashMap::len).sum()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget everything. Called before every render.
    pub fn reset(&mut self) {
        self.modules.clear();
    }
}
