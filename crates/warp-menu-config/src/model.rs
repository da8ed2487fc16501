//! Configuration schema for the aggregated menu.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Root config describing where menu entries come from.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AggregationConfig {
    /// Ordered list of entry sources.
    #[serde(default)]
    pub sources: Vec<SourceDescriptor>,
    /// Statically configured support links.
    #[serde(default)]
    pub support: Vec<SupportSourceDescriptor>,
    /// Display order per category title.
    #[serde(default)]
    pub order: BTreeMap<String, i32>,
}

impl AggregationConfig {
    /// Start building a config programmatically.
    pub fn builder() -> AggregationConfigBuilder {
        AggregationConfigBuilder::new()
    }

    /// Display order for a category, 0 when not configured.
    pub fn category_order(&self, category: &str) -> i32 {
        self.order.get(category).copied().unwrap_or_default()
    }

    /// True when any source of the given kind is configured.
    pub fn has_source(&self, kind: &SourceKind) -> bool {
        self.sources.iter().any(|source| &source.kind == kind)
    }
}

/// Builder for assembling an `AggregationConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct AggregationConfigBuilder {
    config: AggregationConfig,
}

impl AggregationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source.
    pub fn source(mut self, source: SourceDescriptor) -> Self {
        self.config.sources.push(source);
        self
    }

    /// Append a support link.
    pub fn support(mut self, support: SupportSourceDescriptor) -> Self {
        self.config.support.push(support);
        self
    }

    /// Set the display order of a category.
    pub fn order(mut self, category: impl Into<String>, order: i32) -> Self {
        self.config.order.insert(category.into(), order);
        self
    }

    pub fn build(self) -> AggregationConfig {
        self.config
    }
}

/// Kind of a configured source.
///
/// Unrecognized kinds are kept so that only the offending source fails at
/// read time instead of the whole config.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceKind {
    /// Installed components tagged for the menu.
    Components,
    /// Link records stored in the global config below a key prefix.
    Externals,
    /// Support links; handled outside the per-source loop.
    Support,
    /// Anything else.
    Unknown(String),
}

impl SourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Components => "dogus",
            Self::Externals => "externals",
            Self::Support => "support_entry_config",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for SourceKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "dogus" | "components" => Self::Components,
            "externals" => Self::Externals,
            "support_entry_config" | "support" => Self::Support,
            _ => Self::Unknown(value),
        }
    }
}

impl From<SourceKind> for String {
    fn from(value: SourceKind) -> Self {
        match value {
            SourceKind::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured origin of menu entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceDescriptor {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// Key prefix for external links; informational for components.
    #[serde(default)]
    pub path: String,
    /// Tag a component must declare to be listed. No filter when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl SourceDescriptor {
    pub fn components(path: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Components,
            path: path.into(),
            tag: Some(tag.into()),
        }
    }

    pub fn externals(path: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Externals,
            path: path.into(),
            tag: None,
        }
    }
}

/// One statically configured support link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupportSourceDescriptor {
    /// Key matched against the allow and deny lists.
    pub identifier: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub external: bool,
}

impl SupportSourceDescriptor {
    pub fn new(identifier: impl Into<String>, href: impl Into<String>, external: bool) -> Self {
        Self {
            identifier: identifier.into(),
            href: href.into(),
            external,
        }
    }
}
