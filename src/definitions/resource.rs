//! Resources and action-set selection

use serde::{Deserialize, Serialize};

use crate::error::{AuthzError, Result};
use crate::rules::Rule;
use crate::types::{validate_identifier, Name, Outcome};

/// Actions a resource gets when no options narrow them
pub const DEFAULT_ACTIONS: [&str; 7] = ["create", "show", "update", "delete", "index", "new", "edit"];

/// Raw authoring options for a resource
///
/// `only` and `except` are mutually exclusive. Unknown keys and non-list
/// values are rejected when decoding from JSON.
///
/// # Examples
///
/// ```
/// use rolegate::definitions::ResourceOptions;
///
/// let options = ResourceOptions::from_json(&serde_json::json!({ "except": ["index"] })).unwrap();
/// assert_eq!(options.selector().unwrap().actions().len(), 6);
///
/// assert!(ResourceOptions::from_json(&serde_json::json!({ "only": "show" })).is_err());
/// assert!(ResourceOptions::from_json(&serde_json::json!({ "invalid": ["index"] })).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub except: Option<Vec<String>>,
}

impl ResourceOptions {
    pub fn only(actions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            only: Some(actions.into_iter().map(Into::into).collect()),
            except: None,
        }
    }

    pub fn except(actions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            only: None,
            except: Some(actions.into_iter().map(Into::into).collect()),
        }
    }

    /// Decodes options from a JSON object
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| AuthzError::InvalidOptions {
            reason: e.to_string(),
        })
    }

    /// Validates the options into an [`ActionSelector`]
    pub fn selector(&self) -> Result<ActionSelector> {
        match (&self.only, &self.except) {
            (Some(_), Some(_)) => Err(AuthzError::InvalidOptions {
                reason: "'only' and 'except' cannot be combined".to_string(),
            }),
            (Some(only), None) => {
                for action in only {
                    validate_identifier("action", action)?;
                }
                Ok(ActionSelector::Only(only.clone()))
            }
            (None, Some(except)) => Ok(ActionSelector::Except(except.clone())),
            (None, None) => Ok(ActionSelector::All),
        }
    }
}

/// Validated choice of actions for a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionSelector {
    All,
    Only(Vec<String>),
    Except(Vec<String>),
}

impl ActionSelector {
    /// Selected action names, in `only` order or default-list order
    pub fn actions(&self) -> Vec<String> {
        match self {
            ActionSelector::All => DEFAULT_ACTIONS.iter().map(|a| a.to_string()).collect(),
            ActionSelector::Only(only) => only.clone(),
            ActionSelector::Except(except) => DEFAULT_ACTIONS
                .iter()
                .filter(|a| !except.iter().any(|e| e == *a))
                .map(|a| a.to_string())
                .collect(),
        }
    }
}

impl TryFrom<&ResourceOptions> for ActionSelector {
    type Error = AuthzError;

    fn try_from(options: &ResourceOptions) -> Result<Self> {
        options.selector()
    }
}

/// A named object type subject to authorization, optionally bound to a scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    name: Name,
    scope: Name,
    actions: Vec<String>,
}

impl Resource {
    /// Validates the name and options and fixes the selected action set
    pub fn new(name: &str, scope: Name, options: &ResourceOptions) -> Result<Self> {
        validate_identifier("resource", name)?;
        let selector = options.selector()?;

        Ok(Self {
            name: Name::from(name),
            scope,
            actions: selector.actions(),
        })
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn scope(&self) -> &Name {
        &self.scope
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// True if the names are equal or either side is the wildcard
    pub fn matches(&self, other: &Name) -> bool {
        self.name.matches(other)
    }

    /// One Allow rule per selected action, owned by `role`
    pub fn default_rules<'a>(&'a self, role: &'a str) -> impl Iterator<Item = Rule> + 'a {
        self.actions.iter().map(move |action| {
            Rule::new(
                role,
                self.name.clone(),
                self.scope.clone(),
                Name::from(action.as_str()),
                Outcome::Allow,
            )
        })
    }
}
