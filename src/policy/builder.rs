//! Authoring side of the freeze boundary

use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::PolicyConfig;
use crate::definitions::{Role, RoleDraft};
use crate::error::{AuthzError, Result};
use crate::graph::{RoleGraph, RoleGraphNode};
use super::configuration::Configuration;

/// Collects role drafts and builds a frozen [`Configuration`]
///
/// # Examples
///
/// ```
/// use rolegate::{PolicyBuilder, Query};
/// use rolegate::definitions::ResourceOptions;
///
/// let mut builder = PolicyBuilder::new();
/// builder.role("admin", &[], |admin| {
///     admin.can("administrate")?;
///     admin.resource("charts", ResourceOptions::default())?;
///     Ok(())
/// })?;
/// builder.role("user", &["admin"], |user| {
///     user.cannot("have_fun")?;
///     Ok(())
/// })?;
///
/// let config = builder.build()?;
/// assert!(config.can("user", &Query::action("administrate"))?);
/// assert!(config.can("user", &Query::action("show").on("charts"))?);
/// assert!(!config.can("user", &Query::action("have_fun"))?);
/// # Ok::<(), rolegate::AuthzError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PolicyBuilder {
    config: PolicyConfig,
    roles: IndexMap<String, RoleDraft>,
}

impl PolicyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PolicyConfig) -> Self {
        Self {
            config,
            roles: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Declares a role and authors its rules inside `f`
    ///
    /// Parents are referenced by name and may be declared later; they are
    /// linked in [`build`](Self::build).
    ///
    /// # Errors
    ///
    /// - `DuplicateRole` if `name` was already declared
    /// - `InvalidName` for malformed role or parent names
    /// - any error returned by `f`
    pub fn role<F>(&mut self, name: &str, parents: &[&str], f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut RoleDraft) -> Result<()>,
    {
        if self.roles.contains_key(name) {
            return Err(AuthzError::DuplicateRole {
                role: name.to_string(),
            });
        }

        let mut draft = RoleDraft::new(name, parents)?;
        f(&mut draft)?;

        debug!(
            role = name,
            parents = ?parents,
            rules = draft.rules().len(),
            "declared role"
        );
        self.roles.insert(name.to_string(), draft);
        Ok(self)
    }

    /// Number of roles declared so far
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Links parents, validates the inheritance graph and resolves every role
    ///
    /// Runs in two passes. The first checks that every parent name refers to
    /// a declared role. The second rejects cycles and chains deeper than
    /// `max_inheritance_depth`, then resolves roles parents-first so each
    /// parent's rule book is complete before its children merge it.
    ///
    /// # Errors
    ///
    /// `UnknownParent`, `CircularInheritance`, `InheritanceDepthExceeded`, or a
    /// `ConflictingRule` surfaced while merging inherited rules.
    pub fn build(self) -> Result<Configuration> {
        let PolicyBuilder { config, roles } = self;

        // Pass 1: link parents
        for draft in roles.values() {
            if let Some(parent) = draft.parents().iter().find(|p| !roles.contains_key(*p)) {
                return Err(AuthzError::UnknownParent {
                    role: draft.name().to_string(),
                    parent: parent.clone(),
                });
            }
        }

        // Pass 2: validate the graph and resolve inheritance
        let mut graph = RoleGraph::new();
        for draft in roles.values() {
            graph.add_node(RoleGraphNode::with_parents(draft.name(), draft.parents().iter().cloned()));
        }
        let order = graph.topological_sort()?;
        graph.check_depth(config.max_inheritance_depth)?;

        let declared: Vec<String> = roles.keys().cloned().collect();
        let mut pending: HashMap<String, Role> = roles
            .into_iter()
            .map(|(name, draft)| (name, Role::from(draft)))
            .collect();
        let mut resolved: HashMap<String, Role> = HashMap::with_capacity(pending.len());

        for name in order {
            let Some(mut role) = pending.remove(&name) else {
                continue;
            };
            debug!(role = %name, ancestors = ?graph.ancestors(&name), "resolving role");
            role.inherit(|parent| resolved.get(parent))?;
            resolved.insert(name, role);
        }

        let roles: IndexMap<String, Role> = declared
            .into_iter()
            .filter_map(|name| resolved.remove(&name).map(|role| (name, role)))
            .collect();

        info!(
            roles = roles.len(),
            rules = roles.values().map(|r| r.rules().len()).sum::<usize>(),
            "built policy configuration"
        );

        Ok(Configuration::new(roles, config))
    }
}
