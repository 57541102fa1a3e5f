//! Roles: editable drafts during authoring, frozen roles after build

use serde::Serialize;
use std::collections::HashSet;

use crate::error::{AuthzError, Result};
use crate::query::Query;
use crate::rules::{Rule, RuleBook};
use crate::types::{validate_identifier, Name, Outcome};
use super::resource::{Resource, ResourceOptions};
use super::scope::Scope;

/// Writes rules for a fixed (role, resource, scope) triple
///
/// Handed to the closure of [`RoleDraft::resource_with`] and
/// [`ScopeDraft::resource_with`]. It has no `resource` or `scope` method, so
/// resources and scopes cannot be nested inside a resource.
pub struct RuleWriter<'a> {
    role: &'a str,
    book: &'a mut RuleBook,
    resource: Name,
    scope: Name,
}

impl<'a> RuleWriter<'a> {
    pub fn can(&mut self, action: &str) -> Result<&mut Self> {
        self.write(action, Outcome::Allow)?;
        Ok(self)
    }

    pub fn cannot(&mut self, action: &str) -> Result<&mut Self> {
        self.write(action, Outcome::Deny)?;
        Ok(self)
    }

    fn write(&mut self, action: &str, outcome: Outcome) -> Result<()> {
        let action = Name::parse("action", action)?;
        let rule = Rule::new(
            self.role,
            self.resource.clone(),
            self.scope.clone(),
            action,
            outcome,
        );
        tracing::debug!(role = self.role, rule = %rule, "registered rule");
        self.book.add(rule)
    }
}

/// Authoring surface inside a `scope` block
///
/// Rules written here use the scope and a wildcard resource. Nested
/// resources are bound to the scope. There is no `scope` method.
pub struct ScopeDraft<'a> {
    writer: RuleWriter<'a>,
    resources: &'a mut HashSet<(Name, String)>,
}

impl<'a> ScopeDraft<'a> {
    pub fn can(&mut self, action: &str) -> Result<&mut Self> {
        self.writer.can(action)?;
        Ok(self)
    }

    pub fn cannot(&mut self, action: &str) -> Result<&mut Self> {
        self.writer.cannot(action)?;
        Ok(self)
    }

    pub fn resource(&mut self, name: &str, options: ResourceOptions) -> Result<&mut Self> {
        self.resource_with(name, options, |_| Ok(()))
    }

    pub fn resource_with<F>(&mut self, name: &str, options: ResourceOptions, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut RuleWriter<'_>) -> Result<()>,
    {
        let scope = self.writer.scope.clone();
        let resource = declare_resource(
            self.writer.role,
            self.writer.book,
            self.resources,
            scope.clone(),
            name,
            &options,
        )?;

        let mut writer = RuleWriter {
            role: self.writer.role,
            book: &mut *self.writer.book,
            resource: resource.name().clone(),
            scope,
        };
        f(&mut writer)?;
        Ok(self)
    }
}

fn declare_resource(
    role: &str,
    book: &mut RuleBook,
    declared: &mut HashSet<(Name, String)>,
    scope: Name,
    name: &str,
    options: &ResourceOptions,
) -> Result<Resource> {
    if declared.contains(&(scope.clone(), name.to_string())) {
        return Err(AuthzError::DuplicateResource {
            role: role.to_string(),
            scope: scope.to_string(),
            resource: name.to_string(),
        });
    }

    let resource = Resource::new(name, scope.clone(), options)?;
    for rule in resource.default_rules(role) {
        book.add(rule)?;
    }

    tracing::debug!(
        role,
        resource = name,
        scope = %scope,
        actions = resource.actions().len(),
        "declared resource"
    );
    declared.insert((scope, name.to_string()));
    Ok(resource)
}

/// A role under construction
///
/// Obtained from [`PolicyBuilder::role`](crate::PolicyBuilder::role). Rules
/// written directly on the draft use wildcard resource and scope.
#[derive(Debug, Clone)]
pub struct RoleDraft {
    name: String,
    parents: Vec<String>,
    rules: RuleBook,
    resources: HashSet<(Name, String)>,
    scopes: HashSet<String>,
}

impl RoleDraft {
    pub(crate) fn new(name: &str, parents: &[&str]) -> Result<Self> {
        validate_identifier("role", name)?;
        for parent in parents {
            validate_identifier("role", parent)?;
        }

        Ok(Self {
            name: name.to_string(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            rules: RuleBook::new(name),
            resources: HashSet::new(),
            scopes: HashSet::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Rules authored so far
    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    pub fn can(&mut self, action: &str) -> Result<&mut Self> {
        self.writer(Name::Any, Name::Any).can(action)?;
        Ok(self)
    }

    pub fn cannot(&mut self, action: &str) -> Result<&mut Self> {
        self.writer(Name::Any, Name::Any).cannot(action)?;
        Ok(self)
    }

    /// Declares a resource under the wildcard scope
    pub fn resource(&mut self, name: &str, options: ResourceOptions) -> Result<&mut Self> {
        self.resource_with(name, options, |_| Ok(()))
    }

    /// Declares a resource under the wildcard scope and writes extra rules for it
    pub fn resource_with<F>(&mut self, name: &str, options: ResourceOptions, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut RuleWriter<'_>) -> Result<()>,
    {
        let resource = declare_resource(
            &self.name,
            &mut self.rules,
            &mut self.resources,
            Name::Any,
            name,
            &options,
        )?;

        f(&mut self.writer(resource.name().clone(), Name::Any))?;
        Ok(self)
    }

    /// Declares a scope and authors its rules and resources
    pub fn scope<F>(&mut self, name: &str, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut ScopeDraft<'_>) -> Result<()>,
    {
        let scope = Scope::new(name)?;
        if !self.scopes.insert(name.to_string()) {
            return Err(AuthzError::DuplicateScope {
                role: self.name.clone(),
                scope: name.to_string(),
            });
        }

        let mut draft = ScopeDraft {
            writer: RuleWriter {
                role: &self.name,
                book: &mut self.rules,
                resource: Name::Any,
                scope: scope.name().clone(),
            },
            resources: &mut self.resources,
        };
        f(&mut draft)?;
        Ok(self)
    }

    fn writer(&mut self, resource: Name, scope: Name) -> RuleWriter<'_> {
        RuleWriter {
            role: &self.name,
            book: &mut self.rules,
            resource,
            scope,
        }
    }
}

/// A role after the build boundary
///
/// Its rule book holds the role's own rules merged with those of every
/// ancestor once [`Role::inherit`] has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    name: String,
    parents: Vec<String>,
    rules: RuleBook,
}

impl Role {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Replaces the rule book with own rules plus each parent's resolved rules
    ///
    /// Parents are looked up through `resolved` in declaration order and must
    /// already be resolved themselves. Every gathered rule is re-added through
    /// [`RuleBook::add`], so identical inherited rules collapse and any
    /// conflict aborts. No-op for roles without parents.
    pub fn inherit<'a, F>(&mut self, resolved: F) -> Result<()>
    where
        F: Fn(&str) -> Option<&'a Role>,
    {
        if self.parents.is_empty() {
            return Ok(());
        }

        let mut merged = RuleBook::new(self.name.clone());
        for rule in self.rules.iter() {
            merged.add(rule.clone())?;
        }

        for parent_name in &self.parents {
            let parent = resolved(parent_name).ok_or_else(|| AuthzError::UnknownParent {
                role: self.name.clone(),
                parent: parent_name.clone(),
            })?;
            for rule in parent.rules.iter() {
                merged.add(rule.clone())?;
            }
        }

        tracing::debug!(
            role = %self.name,
            parents = ?self.parents,
            own = self.rules.len(),
            resolved = merged.len(),
            "resolved inheritance"
        );
        self.rules = merged;
        Ok(())
    }

    /// Precedence decision for a query against the resolved rules
    pub fn can(&self, query: &Query) -> bool {
        self.rules.can(&query.resource, &query.scope, &query.action)
    }

    /// Winning rule for a query, if any rule matches
    pub fn decide(&self, query: &Query) -> Option<&Rule> {
        self.rules.decide(&query.resource, &query.scope, &query.action)
    }

    /// Concrete actions that resolve to Allow for `resource` within `scope`
    pub fn allowed_actions(&self, resource: &Name, scope: &Name) -> Vec<String> {
        self.rules.allowed_actions(resource, scope)
    }
}

impl From<RoleDraft> for Role {
    fn from(draft: RoleDraft) -> Self {
        Self {
            name: draft.name,
            parents: draft.parents,
            rules: draft.rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> RoleDraft {
        RoleDraft::new(name, &[]).unwrap()
    }

    #[test]
    fn test_can_and_cannot() {
        let mut role = draft("admin");
        role.can("see_me").unwrap().cannot("fool_me").unwrap();

        assert_eq!(role.rules().len(), 2);
        assert_eq!(role.rules().get("*:/*/see_me").unwrap().outcome(), Outcome::Allow);
        assert_eq!(role.rules().get("*:/*/fool_me").unwrap().outcome(), Outcome::Deny);
    }

    #[test]
    fn test_duplicate_rule_in_own_book() {
        let mut role = draft("admin");
        role.can("see_me").unwrap();

        let result = role.can("see_me");
        assert!(matches!(result, Err(AuthzError::DuplicateRule { .. })));
    }

    #[test]
    fn test_can_then_cannot_same_action_conflicts() {
        let mut role = draft("admin");
        role.can("see_me").unwrap();

        let result = role.cannot("see_me");
        assert!(matches!(result, Err(AuthzError::ConflictingRule { .. })));
    }

    #[test]
    fn test_resource_registers_default_rules() {
        let mut role = draft("admin");
        role.resource("charts", ResourceOptions::default()).unwrap();

        assert_eq!(role.rules().len(), 7);
        assert!(role.rules().iter().all(|r| r.scope().is_any() && r.outcome() == Outcome::Allow));
        assert!(role.rules().keys().all(|k| k.starts_with("*:/charts/")));
    }

    #[test]
    fn test_resource_with_rules() {
        let mut role = draft("admin");
        role.can("see_me").unwrap();
        role.resource_with("charts", ResourceOptions::default(), |charts| {
            charts.can("view")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(role.rules().len(), 9);
        assert!(role.rules().get("*:/charts/view").is_some());
    }

    #[test]
    fn test_duplicate_resource() {
        let mut role = draft("admin");
        role.resource("charts", ResourceOptions::default()).unwrap();

        let result = role.resource("charts", ResourceOptions::only(["view"]));
        assert!(matches!(result, Err(AuthzError::DuplicateResource { .. })));
    }

    #[test]
    fn test_same_resource_in_different_scopes() {
        let mut role = draft("admin");
        role.resource("charts", ResourceOptions::only(["view"])).unwrap();
        role.scope("api", |api| {
            api.resource("charts", ResourceOptions::only(["view"]))?;
            Ok(())
        })
        .unwrap();

        let keys: Vec<&str> = role.rules().keys().collect();
        assert_eq!(keys, vec!["*:/charts/view", "api:/charts/view"]);
    }

    #[test]
    fn test_scope_rules() {
        let mut role = draft("admin");
        role.scope("api", |api| {
            api.can("rest")?;
            api.resource("charts", ResourceOptions::default())?;
            Ok(())
        })
        .unwrap();

        assert_eq!(role.rules().len(), 8);
        assert!(role.rules().keys().all(|k| k.starts_with("api:")));
        assert!(role.rules().get("api:/*/rest").is_some());
    }

    #[test]
    fn test_empty_scope_adds_no_rules() {
        let mut role = draft("admin");
        role.can("see_me").unwrap();
        role.scope("api", |_| Ok(())).unwrap();

        assert_eq!(role.rules().len(), 1);
    }

    #[test]
    fn test_duplicate_scope() {
        let mut role = draft("admin");
        role.scope("api", |_| Ok(())).unwrap();

        let result = role.scope("api", |_| Ok(()));
        assert!(matches!(result, Err(AuthzError::DuplicateScope { .. })));
    }

    #[test]
    fn test_invalid_names() {
        assert!(RoleDraft::new("", &[]).is_err());
        assert!(RoleDraft::new("admin", &["bad parent"]).is_err());

        let mut role = draft("admin");
        assert!(matches!(
            role.can("see me"),
            Err(AuthzError::InvalidName { what: "action", .. })
        ));
    }

    #[test]
    fn test_inherit_without_parents_is_noop() {
        let mut role_draft = draft("admin");
        role_draft.can("administrate").unwrap();
        let mut role = Role::from(role_draft);

        role.inherit(|_| None).unwrap();
        assert_eq!(role.rules().len(), 1);
    }

    #[test]
    fn test_inherit_merges_parent_rules() {
        let mut admin_draft = draft("admin");
        admin_draft.can("administrate").unwrap();
        let admin = Role::from(admin_draft);

        let mut user_draft = RoleDraft::new("user", &["admin"]).unwrap();
        user_draft.can("view_charts").unwrap().cannot("have_fun").unwrap();
        let mut user = Role::from(user_draft);

        user.inherit(|name| (name == "admin").then_some(&admin)).unwrap();

        assert_eq!(user.rules().len(), 3);
        assert_eq!(user.rules().get("*:/*/administrate").unwrap().role(), "admin");
        assert!(user.can(&Query::action("administrate")));
        assert!(user.can(&Query::action("view_charts")));
        assert!(!user.can(&Query::action("have_fun")));
    }

    #[test]
    fn test_inherit_conflict_with_own_rule() {
        let mut admin_draft = draft("admin");
        admin_draft.can("administrate").unwrap();
        let admin = Role::from(admin_draft);

        let mut group_draft = RoleDraft::new("group_admin", &["admin"]).unwrap();
        group_draft.cannot("administrate").unwrap();
        let mut group_admin = Role::from(group_draft);

        let result = group_admin.inherit(|name| (name == "admin").then_some(&admin));
        assert!(matches!(result, Err(AuthzError::ConflictingRule { .. })));
    }

    #[test]
    fn test_inherit_unknown_parent() {
        let mut role = Role::from(RoleDraft::new("user", &["ghost"]).unwrap());
        let result = role.inherit(|_| None);
        assert!(matches!(result, Err(AuthzError::UnknownParent { .. })));
    }
}
