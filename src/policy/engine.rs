//! Replaceable holder for the active configuration

use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};
use tracing::info;

use crate::error::{AuthzError, Result};
use crate::principal::RoleSource;
use crate::query::Query;
use super::builder::PolicyBuilder;
use super::configuration::Configuration;

/// Holds the configuration hosts query against
///
/// Installing or clearing swaps an `Arc`; readers that already obtained a
/// snapshot through [`configuration`](Self::configuration) keep using it.
///
/// # Examples
///
/// ```
/// use rolegate::{AuthzError, PolicyBuilder, PolicyEngine, Query};
///
/// let engine = PolicyEngine::new();
/// assert_eq!(engine.can("admin", &Query::action("see")), Err(AuthzError::NotConfigured));
///
/// let mut builder = PolicyBuilder::new();
/// builder.role("admin", &[], |admin| {
///     admin.can("see")?;
///     Ok(())
/// })?;
/// engine.configure(builder)?;
/// assert!(engine.can("admin", &Query::action("see"))?);
///
/// engine.clear();
/// assert!(!engine.is_configured());
/// # Ok::<(), AuthzError>(())
/// ```
#[derive(Debug, Default)]
pub struct PolicyEngine {
    active: RwLock<Option<Arc<Configuration>>>,
}

impl PolicyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide engine for hosts that want a single shared policy
    pub fn global() -> &'static PolicyEngine {
        static GLOBAL: OnceLock<PolicyEngine> = OnceLock::new();
        GLOBAL.get_or_init(PolicyEngine::new)
    }

    /// Replaces the active configuration
    pub fn install(&self, configuration: Configuration) -> Arc<Configuration> {
        let configuration = Arc::new(configuration);
        info!(roles = configuration.len(), "installed policy configuration");
        *self.active.write() = Some(Arc::clone(&configuration));
        configuration
    }

    /// Builds `builder` and installs the result
    ///
    /// On error the previously active configuration stays in place.
    pub fn configure(&self, builder: PolicyBuilder) -> Result<Arc<Configuration>> {
        let configuration = builder.build()?;
        Ok(self.install(configuration))
    }

    /// Snapshot of the active configuration
    ///
    /// # Errors
    ///
    /// `NotConfigured` if nothing is installed.
    pub fn configuration(&self) -> Result<Arc<Configuration>> {
        self.active.read().clone().ok_or(AuthzError::NotConfigured)
    }

    /// Drops the active configuration
    pub fn clear(&self) {
        if self.active.write().take().is_some() {
            info!("cleared policy configuration");
        }
    }

    pub fn is_configured(&self) -> bool {
        self.active.read().is_some()
    }

    pub fn can(&self, role: &str, query: &Query) -> Result<bool> {
        self.configuration()?.can(role, query)
    }

    pub fn principal_can<S>(&self, principal: &S, query: &Query) -> Result<bool>
    where
        S: RoleSource + ?Sized,
    {
        self.configuration()?.principal_can(principal, query)
    }
}
