//! Reader for external link records stored in the global config.

use crate::error::ReadError;
use log::{debug, error, info};
use serde::Deserialize;
use warp_menu_config::SourceDescriptor;
use warp_menu_protocol::{Entry, EntryWithCategory, GlobalConfigRepository, Target};

/// Historical key prefixes still found in shipped configs.
const LEGACY_PREFIXES: [&str; 2] = ["/config/_global/", "config/_global/"];

/// One external link record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalRecord {
    #[serde(rename = "DisplayName", default)]
    pub display_name: String,
    #[serde(rename = "URL", default)]
    pub url: String,
    /// Used as the entry title.
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "Target", default)]
    pub target: Target,
}

impl ExternalRecord {
    /// Parse a YAML record, requiring a URL and a category.
    pub fn parse(key: &str, raw: &str) -> Result<Self, ReadError> {
        let record: Self = serde_yaml::from_str(raw).map_err(|err| ReadError::Record {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        for (field, value) in [("URL", &record.url), ("Category", &record.category)] {
            if value.trim().is_empty() {
                return Err(ReadError::Record {
                    key: key.to_string(),
                    message: format!("missing field {field}"),
                });
            }
        }
        Ok(record)
    }

    /// Entry for this record, or `None` when it has no title.
    pub fn into_entry(self) -> Option<EntryWithCategory> {
        if self.description.trim().is_empty() {
            return None;
        }
        let entry = Entry::new(self.description, self.url)
            .with_display_name(self.display_name)
            .with_target(self.target);
        Some(EntryWithCategory::new(entry, self.category))
    }
}

/// Strip a historical global-config prefix from a key.
pub fn remove_legacy_prefix(key: &str) -> &str {
    LEGACY_PREFIXES
        .iter()
        .find_map(|prefix| key.strip_prefix(prefix))
        .unwrap_or(key)
}

/// Read every record nested below the source's key prefix.
pub(super) async fn read(
    global_config: &dyn GlobalConfigRepository,
    source: &SourceDescriptor,
) -> Result<Vec<EntryWithCategory>, ReadError> {
    info!("read externals from {} for warp menu in global config", source.path);
    let prefix = remove_legacy_prefix(&source.path);
    let config = global_config.get().await.map_err(|err| {
        ReadError::store(format!("failed to read root entry {} from config", source.path), err)
    })?;

    let children = config.children(prefix);
    let mut entries = Vec::with_capacity(children.len());
    for (key, raw) in &children {
        match ExternalRecord::parse(key, raw) {
            Ok(record) => entries.extend(record.into_entry()),
            Err(err) => error!("failed to read and unmarshal external link key {key:?}: {err}"),
        }
    }
    debug!(
        "external source read (records={}, listed={})",
        children.len(),
        entries.len()
    );
    Ok(entries)
}
