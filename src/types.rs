use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::error::{AuthzError, Result};

/// Literal used for the wildcard in names and rule keys
pub const WILDCARD: &str = "*";

const IDENT_PATTERN: &str = r"^[a-zA-Z0-9_-]+$";

fn ident_regex() -> &'static Regex {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT.get_or_init(|| Regex::new(IDENT_PATTERN).expect("identifier pattern compiles"))
}

/// Decision attached to a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Allow,
    Deny,
}

impl Outcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Outcome::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Outcome::Deny)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Allow => "allow",
            Outcome::Deny => "deny",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role, resource, scope or action name, or the wildcard standing in for any of them
///
/// `Name::Any` matches everything and compares equal to anything spelled `*`.
/// Named values are only built through [`Name::parse`] or `From`, which turn
/// `*` into `Name::Any`, so the wildcard has a single representation.
///
/// # Examples
///
/// ```
/// use rolegate::Name;
///
/// let users = Name::from("users");
/// assert!(users.matches(&Name::Any));
/// assert!(Name::Any.matches(&users));
/// assert!(!users.matches(&Name::from("posts")));
/// assert_eq!(Name::from("*"), Name::Any);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Name {
    Any,
    Named(Label),
}

/// Concrete (non-wildcard) name held by [`Name::Named`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Name {
    /// Parses and validates an authored name
    ///
    /// `what` labels the dimension in the error (e.g. "resource").
    pub fn parse(what: &'static str, raw: &str) -> Result<Self> {
        if raw == WILDCARD {
            return Ok(Name::Any);
        }
        validate_identifier(what, raw)?;
        Ok(Name::Named(Label(raw.to_string())))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Name::Any)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Name::Any => WILDCARD,
            Name::Named(label) => label.as_str(),
        }
    }

    /// True if the names are equal or either side is the wildcard
    pub fn matches(&self, other: &Name) -> bool {
        self.is_any() || other.is_any() || self == other
    }
}

impl Default for Name {
    fn default() -> Self {
        Name::Any
    }
}

impl From<&str> for Name {
    fn from(raw: &str) -> Self {
        if raw == WILDCARD {
            Name::Any
        } else {
            Name::Named(Label(raw.to_string()))
        }
    }
}

impl From<String> for Name {
    fn from(raw: String) -> Self {
        if raw == WILDCARD {
            Name::Any
        } else {
            Name::Named(Label(raw))
        }
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        match name {
            Name::Any => WILDCARD.to_string(),
            Name::Named(label) => label.0,
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks that `name` is a plain identifier: ASCII letters, digits, `_` or `-`
pub fn validate_identifier(what: &'static str, name: &str) -> Result<()> {
    if !ident_regex().is_match(name) {
        return Err(AuthzError::InvalidName {
            what,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Host principal record carrying the role names it holds
///
/// `attributes` is host metadata carried alongside the roles; the engine
/// never reads it when deciding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Principal {
    pub id: String,
    pub roles: Vec<String>,
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
}

impl Principal {
    pub fn new(id: impl Into<String>, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id: id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}
