//! Installed component identities and descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A component name paired with its currently installed version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentVersion {
    /// Simple (unqualified) component name.
    pub name: String,
    pub version: String,
}

impl ComponentVersion {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ComponentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Full descriptor of one installed component version.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComponentDescriptor {
    /// Qualified name, `namespace/simple-name`.
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub display_name: String,
    /// Human-readable summary, used as the menu entry title.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ComponentDescriptor {
    /// Name without its namespace qualifier.
    pub fn simple_name(&self) -> &str {
        match self.name.rsplit_once('/') {
            Some((_, simple)) => simple,
            None => &self.name,
        }
    }

    /// True when the descriptor declares the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }
}
