//! A single access statement

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::types::{Name, Outcome};

const SCOPE_WEIGHT: u32 = 100;
const RESOURCE_WEIGHT: u32 = 10;
const OUTCOME_WEIGHT: u32 = 1;

/// One (scope, resource, action) → outcome statement owned by a role
///
/// Rules are immutable once built. The canonical key
/// `"<scope>:/<resource>/<action>"` identifies the statement inside a rule
/// book; the owning role and the outcome are not part of it.
///
/// # Examples
///
/// ```
/// use rolegate::{Name, Outcome, Rule};
///
/// let rule = Rule::new("admin", Name::from("users"), Name::from("api"), Name::from("show"), Outcome::Deny);
/// assert_eq!(rule.key(), "api:/users/show");
/// assert_eq!(rule.to_string(), "api:/users/show->deny");
/// assert_eq!(rule.specificity(), 111);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    role: String,
    resource: Name,
    scope: Name,
    action: Name,
    outcome: Outcome,
    #[serde(skip)]
    key: String,
}

impl Rule {
    pub fn new(
        role: impl Into<String>,
        resource: Name,
        scope: Name,
        action: Name,
        outcome: Outcome,
    ) -> Self {
        let key = format!("{}:/{}/{}", scope, resource, action);
        Self {
            role: role.into(),
            resource,
            scope,
            action,
            outcome,
            key,
        }
    }

    /// Allow rule with wildcard resource and scope
    pub fn allow(role: impl Into<String>, action: impl Into<Name>) -> Self {
        Self::new(role, Name::Any, Name::Any, action.into(), Outcome::Allow)
    }

    /// Deny rule with wildcard resource and scope
    pub fn deny(role: impl Into<String>, action: impl Into<Name>) -> Self {
        Self::new(role, Name::Any, Name::Any, action.into(), Outcome::Deny)
    }

    /// Name of the role that authored this rule
    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn resource(&self) -> &Name {
        &self.resource
    }

    pub fn scope(&self) -> &Name {
        &self.scope
    }

    pub fn action(&self) -> &Name {
        &self.action
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Checks whether this rule applies to a query
    ///
    /// Resource and scope match wildcard-aware in both directions. The action
    /// matches when the rule's action is the wildcard or equals the queried
    /// action; a wildcard query action only matches wildcard rule actions.
    pub fn matches(&self, resource: &Name, scope: &Name, action: &Name) -> bool {
        self.resource.matches(resource)
            && self.scope.matches(scope)
            && (self.action.is_any() || self.action == *action)
    }

    /// Same scope, resource and action but a different outcome
    pub fn conflicts_with(&self, other: &Rule) -> bool {
        if std::ptr::eq(self, other) {
            return false;
        }

        self.scope == other.scope
            && self.resource == other.resource
            && self.action == other.action
            && self.outcome != other.outcome
    }

    /// Precedence score: explicit scope 100, explicit resource 10, deny 1
    pub fn specificity(&self) -> u32 {
        let scope = u32::from(!self.scope.is_any());
        let resource = u32::from(!self.resource.is_any());
        let outcome = u32::from(self.outcome.is_denied());

        scope * SCOPE_WEIGHT + resource * RESOURCE_WEIGHT + outcome * OUTCOME_WEIGHT
    }

    /// Total precedence order: higher specificity first, then ascending key
    pub fn precedence(a: &Rule, b: &Rule) -> Ordering {
        b.specificity()
            .cmp(&a.specificity())
            .then_with(|| a.key.cmp(&b.key))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.key, self.outcome)
    }
}
