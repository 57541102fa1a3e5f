//! # Policy
//!
//! The freeze boundary between authoring and querying.
//!
//! ## Components
//!
//! - **PolicyBuilder**: owned, mutable collection of role drafts. `build`
//!   links parents, rejects cycles and over-deep chains, and resolves
//!   inheritance parents-first.
//! - **Configuration**: immutable, `Send + Sync` set of resolved roles
//!   answering `can` / `decide` queries.
//! - **PolicyEngine**: replaceable holder of the active configuration;
//!   queries fail with `NotConfigured` while nothing is installed.
//!
//! ## Example
//!
//! ```
//! use rolegate::{PolicyBuilder, Query};
//! use rolegate::definitions::ResourceOptions;
//!
//! let mut builder = PolicyBuilder::new();
//! builder.role("editor", &[], |editor| {
//!     editor.scope("api", |api| {
//!         api.resource("tags", ResourceOptions::only(["list"]))?;
//!         Ok(())
//!     })?;
//!     Ok(())
//! })?;
//!
//! let config = builder.build()?;
//! assert!(config.can("editor", &Query::action("list").on("tags").within("api"))?);
//! assert!(!config.can("editor", &Query::action("list").on("tags").within("web"))?);
//! # Ok::<(), rolegate::AuthzError>(())
//! ```

mod builder;
mod configuration;
mod engine;

pub use builder::PolicyBuilder;
pub use configuration::Configuration;
pub use engine::PolicyEngine;

#[cfg(test)]
mod tests;
