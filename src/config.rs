//! Engine configuration

use serde::{Deserialize, Serialize};

/// Default bound on inheritance chain length
pub const DEFAULT_MAX_INHERITANCE_DEPTH: usize = 10;

/// How queries with both resource and scope set to wildcard are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildcardQueryPolicy {
    /// Evaluate against the rules that match wildcards
    #[default]
    Evaluate,

    /// Fail with a BadMatch error
    Reject,
}

/// Configuration for policy construction and evaluation
///
/// # Examples
///
/// ```
/// use rolegate::{PolicyConfig, WildcardQueryPolicy};
///
/// let config: PolicyConfig = serde_json::from_str(r#"{"wildcard_queries": "reject"}"#).unwrap();
/// assert_eq!(config.max_inheritance_depth, 10);
/// assert_eq!(config.wildcard_queries, WildcardQueryPolicy::Reject);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Maximum number of ancestor levels a role may have
    pub max_inheritance_depth: usize,

    /// Treatment of fully-wildcard queries
    pub wildcard_queries: WildcardQueryPolicy,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_inheritance_depth: DEFAULT_MAX_INHERITANCE_DEPTH,
            wildcard_queries: WildcardQueryPolicy::Evaluate,
        }
    }
}

impl PolicyConfig {
    pub fn with_max_inheritance_depth(mut self, depth: usize) -> Self {
        self.max_inheritance_depth = depth;
        self
    }

    pub fn with_wildcard_queries(mut self, policy: WildcardQueryPolicy) -> Self {
        self.wildcard_queries = policy;
        self
    }
}
