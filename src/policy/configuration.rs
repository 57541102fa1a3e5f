//! Frozen, query-only policy

use indexmap::IndexMap;
use tracing::warn;

use crate::config::{PolicyConfig, WildcardQueryPolicy};
use crate::definitions::Role;
use crate::error::{AuthzError, Result};
use crate::principal::RoleSource;
use crate::query::Query;
use crate::rules::Rule;

/// Fully resolved roles, keyed by name in declaration order
///
/// Produced by [`PolicyBuilder::build`](crate::PolicyBuilder::build). Nothing
/// can be added or changed afterwards, so a configuration can be shared
/// across threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Configuration {
    roles: IndexMap<String, Role>,
    config: PolicyConfig,
}

impl Configuration {
    pub(crate) fn new(roles: IndexMap<String, Role>, config: PolicyConfig) -> Self {
        Self { roles, config }
    }

    /// May `role` perform the queried action?
    ///
    /// # Errors
    ///
    /// - `RoleNotFound` if no role has that name
    /// - `AmbiguousQuery` for a fully-wildcard query when the configured
    ///   [`WildcardQueryPolicy`] is `Reject`
    pub fn can(&self, role: &str, query: &Query) -> Result<bool> {
        Ok(self
            .decide(role, query)?
            .map(|rule| rule.outcome().is_allowed())
            .unwrap_or(false))
    }

    /// Winning rule for `role`, or `None` when nothing matches
    pub fn decide(&self, role: &str, query: &Query) -> Result<Option<&Rule>> {
        let role = self.require(role)?;

        if query.is_fully_wildcard() && self.config.wildcard_queries == WildcardQueryPolicy::Reject {
            warn!(
                role = role.name(),
                action = %query.action,
                "rejected fully wildcard query"
            );
            return Err(AuthzError::AmbiguousQuery {
                action: query.action.to_string(),
            });
        }

        Ok(role.decide(query))
    }

    /// True if any of the principal's roles allows the query
    ///
    /// A principal without roles is denied. Every role must exist before any
    /// is evaluated, so the answer does not depend on role order.
    ///
    /// # Errors
    ///
    /// `RoleNotFound` for the first unknown role, or the error `can` returns.
    pub fn principal_can<S>(&self, principal: &S, query: &Query) -> Result<bool>
    where
        S: RoleSource + ?Sized,
    {
        let roles = principal.roles();
        for role in &roles {
            self.require(role)?;
        }

        for role in &roles {
            if self.can(role, query)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn role(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }

    /// Roles in declaration order
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.values()
    }

    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    fn require(&self, name: &str) -> Result<&Role> {
        self.roles.get(name).ok_or_else(|| AuthzError::RoleNotFound {
            role: name.to_string(),
        })
    }
}
