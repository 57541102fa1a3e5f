//! # Definitions
//!
//! Authoring-time building blocks of a policy.
//!
//! - **Resource**: a named object type with a selected action set, optionally
//!   bound to a scope; declaring one writes an Allow rule per action
//! - **Scope**: a named context partition; rules inside it carry its name
//! - **Role**: a named bundle of rules with optional parents
//!
//! Nesting is restricted by the types handed to authoring closures: a
//! [`RuleWriter`] has no `resource` or `scope` method and a [`ScopeDraft`]
//! has no `scope` method.

mod resource;
mod role;
mod scope;

pub use resource::{ActionSelector, Resource, ResourceOptions, DEFAULT_ACTIONS};
pub use role::{Role, RoleDraft, RuleWriter, ScopeDraft};
pub use scope::Scope;
