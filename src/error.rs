//! Error types for the policy engine

use thiserror::Error;

/// Result type alias for policy operations
pub type Result<T> = std::result::Result<T, AuthzError>;

/// Broad error categories
///
/// Every [`AuthzError`] belongs to exactly one category. Hosts usually only
/// care whether a failure came from a broken policy definition or from a
/// query issued at the wrong time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Structural problem in the authored policy, raised while authoring or building
    BadConfiguration,

    /// Query issued before any configuration was installed
    NotConfigured,

    /// Query rejected by the wildcard query policy
    BadMatch,

    /// Query named a role the configuration does not contain
    UnknownRole,
}

/// Comprehensive error types for policy authoring and evaluation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    /// Role declared twice
    #[error("role '{role}' already defined")]
    DuplicateRole { role: String },

    /// Resource declared twice in the same scope of a role
    #[error("resource '{resource}' already defined in scope '{scope}' of role '{role}'")]
    DuplicateResource {
        role: String,
        scope: String,
        resource: String,
    },

    /// Scope declared twice in a role
    #[error("scope '{scope}' already defined in role '{role}'")]
    DuplicateScope { role: String, scope: String },

    /// Resource options failed validation
    #[error("invalid options: {reason}")]
    InvalidOptions { reason: String },

    /// Name is empty or contains characters outside the identifier set
    #[error("invalid {what} name '{name}'")]
    InvalidName { what: &'static str, name: String },

    /// Parent role reference that does not resolve
    #[error("role '{role}' inherits from unknown role '{parent}'")]
    UnknownParent { role: String, parent: String },

    /// Rule key already present in the role's own rule book
    #[error("rule '{key}' already defined in role '{role}'")]
    DuplicateRule { role: String, key: String },

    /// Two rules with the same key but different outcomes
    #[error("rule '{key}' in role '{role}' conflicts: '{existing}' from role '{existing_role}' vs '{incoming}' from role '{incoming_role}'")]
    ConflictingRule {
        role: String,
        key: String,
        existing: String,
        existing_role: String,
        incoming: String,
        incoming_role: String,
    },

    /// Rule without an owning role
    #[error("rule '{key}' has no owning role")]
    OrphanRule { key: String },

    /// Inheritance graph contains a cycle
    #[error("circular inheritance detected: {}", cycle.join(" -> "))]
    CircularInheritance { cycle: Vec<String> },

    /// Inheritance chain longer than the configured bound
    #[error("inheritance depth of role '{role}' exceeds maximum {max_depth}")]
    InheritanceDepthExceeded { role: String, max_depth: usize },

    /// No configuration installed
    #[error("policy engine is not configured")]
    NotConfigured,

    /// Fully-wildcard query rejected by policy
    #[error("ambiguous query: resource and scope are both wildcards (action '{action}')")]
    AmbiguousQuery { action: String },

    /// Queried role does not exist
    #[error("role '{role}' not found")]
    RoleNotFound { role: String },
}

impl AuthzError {
    /// Category this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthzError::NotConfigured => ErrorKind::NotConfigured,
            AuthzError::AmbiguousQuery { .. } => ErrorKind::BadMatch,
            AuthzError::RoleNotFound { .. } => ErrorKind::UnknownRole,
            _ => ErrorKind::BadConfiguration,
        }
    }

    /// Shorthand for `kind() == ErrorKind::BadConfiguration`
    pub fn is_bad_configuration(&self) -> bool {
        self.kind() == ErrorKind::BadConfiguration
    }
}
