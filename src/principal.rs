//! Host principal adapter
//!
//! A host's user type implements [`RoleSource`] to be queried through
//! [`Configuration::principal_can`](crate::Configuration::principal_can).

use crate::types::Principal;

/// Yields the names of the roles a principal holds
///
/// # Examples
///
/// ```
/// use rolegate::{PolicyBuilder, Query, RoleSource};
///
/// struct Account {
///     admin: bool,
/// }
///
/// impl RoleSource for Account {
///     fn roles(&self) -> Vec<String> {
///         if self.admin { vec!["admin".to_string()] } else { Vec::new() }
///     }
/// }
///
/// let mut builder = PolicyBuilder::new();
/// builder.role("admin", &[], |admin| {
///     admin.can("administrate")?;
///     Ok(())
/// })?;
/// let config = builder.build()?;
///
/// let query = Query::action("administrate");
/// assert!(config.principal_can(&Account { admin: true }, &query)?);
/// assert!(!config.principal_can(&Account { admin: false }, &query)?);
/// # Ok::<(), rolegate::AuthzError>(())
/// ```
pub trait RoleSource {
    fn roles(&self) -> Vec<String>;
}

impl RoleSource for Principal {
    fn roles(&self) -> Vec<String> {
        self.roles.clone()
    }
}

impl<T: RoleSource + ?Sized> RoleSource for &T {
    fn roles(&self) -> Vec<String> {
        (**self).roles()
    }
}

impl RoleSource for [String] {
    fn roles(&self) -> Vec<String> {
        self.to_vec()
    }
}

impl RoleSource for Vec<String> {
    fn roles(&self) -> Vec<String> {
        self.clone()
    }
}
