//! Menu value types shared by readers, the aggregator, and the writer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a menu link opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Open in the current browsing context.
    #[default]
    #[serde(rename = "self")]
    SelfTarget,
    /// Open outside the current browsing context.
    External,
}

impl Target {
    /// Pick the target for a source flagged as external or not.
    pub fn from_external(external: bool) -> Self {
        if external {
            Self::External
        } else {
            Self::SelfTarget
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfTarget => f.write_str("self"),
            Self::External => f.write_str("external"),
        }
    }
}

/// One renderable link.
///
/// Field order is significant: the derived ordering compares title, then
/// display name, then href, then target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "Title")]
    pub title: String,
    /// Short name; empty when the source has none.
    #[serde(rename = "DisplayName", default)]
    pub display_name: String,
    #[serde(rename = "Href")]
    pub href: String,
    #[serde(rename = "Target", default)]
    pub target: Target,
}

impl Entry {
    /// Build an entry opening in the current browsing context.
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            display_name: String::new(),
            href: href.into(),
            target: Target::SelfTarget,
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the link target.
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }
}

/// Reader output pairing an entry with the category it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryWithCategory {
    pub entry: Entry,
    pub category: String,
}

impl EntryWithCategory {
    pub fn new(entry: Entry, category: impl Into<String>) -> Self {
        Self {
            entry,
            category: category.into(),
        }
    }
}

/// Named, ordered group of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Order")]
    pub order: i32,
    #[serde(rename = "Entries")]
    pub entries: Vec<Entry>,
}

/// The synthesized menu: categories sorted by order, then title.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuArtifact {
    pub categories: Vec<Category>,
}

impl MenuArtifact {
    /// True when no category was produced.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Find a category by title.
    pub fn category(&self, title: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.title == title)
    }

    /// Total number of entries across all categories.
    pub fn entry_count(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.entries.len())
            .sum()
    }
}
