//! Authorization queries

use serde::{Deserialize, Serialize};

use crate::types::Name;

/// "May this role perform `action` on `resource` within `scope`?"
///
/// Every dimension defaults to the wildcard.
///
/// # Examples
///
/// ```
/// use rolegate::{Name, Query};
///
/// let query = Query::action("list").on("tags").within("api");
/// assert_eq!(query.resource, Name::from("tags"));
/// assert!(!query.is_fully_wildcard());
/// assert!(Query::action("view_charts").is_fully_wildcard());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    pub resource: Name,
    pub scope: Name,
    pub action: Name,
}

impl Query {
    /// Fully wildcard query
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(action: impl Into<Name>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn on(mut self, resource: impl Into<Name>) -> Self {
        self.resource = resource.into();
        self
    }

    pub fn within(mut self, scope: impl Into<Name>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Resource and scope are both the wildcard
    pub fn is_fully_wildcard(&self) -> bool {
        self.resource.is_any() && self.scope.is_any()
    }
}
