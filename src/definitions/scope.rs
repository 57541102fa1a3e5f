//! Named context partitions

use crate::error::Result;
use crate::types::{validate_identifier, Name};

/// A named context (e.g. "api" vs "web") within which rules apply
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    name: Name,
}

impl Scope {
    pub fn new(name: &str) -> Result<Self> {
        validate_identifier("scope", name)?;
        Ok(Self {
            name: Name::from(name),
        })
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// True if the names are equal or either side is the wildcard
    pub fn matches(&self, other: &Name) -> bool {
        self.name.matches(other)
    }
}
