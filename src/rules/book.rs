//! Per-role rule collection with duplicate/conflict detection and precedence decisions

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

use crate::error::{AuthzError, Result};
use crate::types::Name;
use super::rule::Rule;

/// Ordered, keyed set of rules belonging to one role
///
/// Rules are stored by canonical key in insertion order. A book never holds
/// two rules with the same key, and never holds two conflicting rules.
/// Identical rules that arrive through inheritance are absorbed.
/// There is no ownerless book; create one with [`RuleBook::new`] so
/// same-role duplicates can be told apart from inherited ones.
///
/// # Examples
///
/// ```
/// use rolegate::{Name, Outcome, Rule, RuleBook};
///
/// let mut book = RuleBook::new("admin");
/// book.add(Rule::allow("admin", "show")).unwrap();
/// book.add(Rule::new("admin", Name::from("users"), Name::from("api"), Name::from("show"), Outcome::Deny)).unwrap();
///
/// let show = Name::from("show");
/// assert!(!book.can(&Name::from("users"), &Name::from("api"), &show));
/// assert!(book.can(&Name::from("posts"), &Name::from("api"), &show));
/// assert!(!book.can(&Name::Any, &Name::Any, &Name::from("index")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleBook {
    role: String,
    rules: IndexMap<String, Rule>,
}

impl RuleBook {
    /// Creates an empty book owned by `role`
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            rules: IndexMap::new(),
        }
    }

    /// Name of the owning role
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Adds a rule
    ///
    /// # Errors
    ///
    /// - `OrphanRule` if the rule has no owning role
    /// - `DuplicateRule` if this role already authored a rule with the same key
    /// - `ConflictingRule` if a rule with the same scope, resource and action
    ///   but a different outcome is present, whatever its origin
    ///
    /// A same-key, same-outcome rule is silently absorbed when either copy was
    /// authored by another role, which is what makes repeated inheritance of a
    /// shared ancestor idempotent.
    pub fn add(&mut self, rule: Rule) -> Result<()> {
        if rule.role().is_empty() {
            return Err(AuthzError::OrphanRule {
                key: rule.key().to_string(),
            });
        }

        if let Some(existing) = self.rules.get(rule.key()) {
            if existing.outcome() != rule.outcome() {
                return Err(self.conflict(existing, &rule));
            }

            if existing.role() == self.role && rule.role() == self.role {
                return Err(AuthzError::DuplicateRule {
                    role: self.role.clone(),
                    key: rule.key().to_string(),
                });
            }

            tracing::trace!(
                role = %self.role,
                key = rule.key(),
                from = rule.role(),
                "absorbed inherited duplicate rule"
            );
            return Ok(());
        }

        if let Some(existing) = self.rules.values().find(|e| e.conflicts_with(&rule)) {
            return Err(self.conflict(existing, &rule));
        }

        self.rules.insert(rule.key().to_string(), rule);
        Ok(())
    }

    /// All rules matching the query, in insertion order
    pub fn match_all(&self, resource: &Name, scope: &Name, action: &Name) -> Vec<&Rule> {
        self.rules
            .values()
            .filter(|rule| rule.matches(resource, scope, action))
            .collect()
    }

    /// Highest-precedence rule matching the query, if any
    pub fn decide(&self, resource: &Name, scope: &Name, action: &Name) -> Option<&Rule> {
        let mut matches = self.match_all(resource, scope, action);
        matches.sort_by(|a, b| Rule::precedence(a, b));

        tracing::trace!(
            role = %self.role,
            resource = %resource,
            scope = %scope,
            action = %action,
            matched = matches.len(),
            "evaluated rule book"
        );

        matches.into_iter().next()
    }

    /// Default-deny decision: true only if the winning rule allows
    pub fn can(&self, resource: &Name, scope: &Name, action: &Name) -> bool {
        self.decide(resource, scope, action)
            .map(|rule| rule.outcome().is_allowed())
            .unwrap_or(false)
    }

    /// Concrete action names that resolve to Allow for `resource` within `scope`
    pub fn allowed_actions(&self, resource: &Name, scope: &Name) -> Vec<String> {
        let mut actions: Vec<String> = self
            .rules
            .values()
            .filter(|rule| !rule.action().is_any())
            .filter(|rule| rule.resource().matches(resource) && rule.scope().matches(scope))
            .filter(|rule| self.can(resource, scope, rule.action()))
            .map(|rule| rule.action().to_string())
            .collect();

        actions.sort();
        actions.dedup();
        actions
    }

    /// Rules in precedence order, leaving the book untouched
    pub fn sort(&self) -> Vec<&Rule> {
        let mut sorted: Vec<&Rule> = self.rules.values().collect();
        sorted.sort_by(|a, b| Rule::precedence(a, b));
        sorted
    }

    /// Reorders the book itself into precedence order
    pub fn sort_in_place(&mut self) {
        self.rules.sort_by(|_, a, _, b| Rule::precedence(a, b));
    }

    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    fn conflict(&self, existing: &Rule, incoming: &Rule) -> AuthzError {
        AuthzError::ConflictingRule {
            role: self.role.clone(),
            key: incoming.key().to_string(),
            existing: existing.to_string(),
            existing_role: existing.role().to_string(),
            incoming: incoming.to_string(),
            incoming_role: incoming.role().to_string(),
        }
    }
}

impl<'a> IntoIterator for &'a RuleBook {
    type Item = &'a Rule;
    type IntoIter = indexmap::map::Values<'a, String, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.values()
    }
}

impl fmt::Display for RuleBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.rules.values().map(Rule::to_string).collect();
        f.write_str(&lines.join("\n"))
    }
}
