//! # Role-based Policy Engine (rolegate)
//!
//! Embeddable authorization engine with support for:
//! - Roles with `can` / `cannot` rules
//! - Resources with default or selected action sets
//! - Scopes partitioning rules by context
//! - Multiple inheritance with diamond-safe merging
//! - Cycle, duplicate and conflict detection at build time
//! - Precedence-based, default-deny decisions
//! - Thread-safe shared configuration
//!
//! ## Example
//!
//! ```rust
//! use rolegate::{PolicyBuilder, Query};
//! use rolegate::definitions::ResourceOptions;
//!
//! # fn example() -> rolegate::Result<()> {
//! let mut builder = PolicyBuilder::new();
//!
//! builder.role("admin", &[], |admin| {
//!     admin.can("administrate")?;
//!     admin.resource("charts", ResourceOptions::default())?;
//!     admin.scope("api", |api| {
//!         api.resource_with("tags", ResourceOptions::only(["list"]), |tags| {
//!             tags.cannot("purge")?;
//!             Ok(())
//!         })?;
//!         Ok(())
//!     })?;
//!     Ok(())
//! })?;
//!
//! builder.role("user", &["admin"], |user| {
//!     user.cannot("have_fun")?;
//!     Ok(())
//! })?;
//!
//! let config = builder.build()?;
//! assert!(config.can("user", &Query::action("edit").on("charts"))?);
//! assert!(config.can("user", &Query::action("list").on("tags").within("api"))?);
//! assert!(!config.can("user", &Query::action("purge").on("tags").within("api"))?);
//! assert!(!config.can("user", &Query::action("have_fun"))?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod config;
pub mod definitions;
pub mod error;
pub mod graph;
pub mod policy;
pub mod principal;
pub mod query;
pub mod rules;
pub mod types;

pub use config::{PolicyConfig, WildcardQueryPolicy};
pub use definitions::{Role, RoleDraft};
pub use error::{AuthzError, ErrorKind, Result};
pub use policy::{Configuration, PolicyBuilder, PolicyEngine};
pub use principal::RoleSource;
pub use query::Query;
pub use rules::{Rule, RuleBook};
pub use types::{Label, Name, Outcome, Principal};
