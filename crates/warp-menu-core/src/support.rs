//! Support links and their allow/deny overrides.
//!
//! Three global config keys steer which support links are shown. Each is read
//! on its own; a missing, blank, or malformed value falls back to its default
//! and is logged, so overrides can never fail a pass.

use crate::error::ReadError;
use log::{debug, warn};
use warp_menu_config::SupportSourceDescriptor;
use warp_menu_protocol::{Entry, EntryWithCategory, GlobalConfig, GlobalConfigRepository, Target};

/// Category every support link is placed in.
pub const SUPPORT_CATEGORY: &str = "Support";
/// Hides the whole support category unless entries are explicitly allowed.
pub const BLOCK_SUPPORT_CATEGORY_KEY: &str = "block_warpmenu_support_category";
/// Identifiers hidden while the category is not blocked.
pub const DISABLED_SUPPORT_ENTRIES_KEY: &str = "disabled_warpmenu_support_entries";
/// Identifiers shown while the category is blocked.
pub const ALLOWED_SUPPORT_ENTRIES_KEY: &str = "allowed_warpmenu_support_entries";

/// Effective override values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportOverrides {
    pub blocked: bool,
    pub disabled: Vec<String>,
    pub allowed: Vec<String>,
}

impl SupportOverrides {
    /// Read the overrides from the global config repository.
    pub async fn load(global_config: &dyn GlobalConfigRepository) -> Self {
        match global_config.get().await {
            Ok(config) => Self::from_config(&config),
            Err(err) => {
                warn!("could not read global config for support overrides, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Read each override independently, substituting defaults on failure.
    pub fn from_config(config: &GlobalConfig) -> Self {
        let blocked = read_bool(config, BLOCK_SUPPORT_CATEGORY_KEY).unwrap_or_else(|err| {
            warn!("could not read key {BLOCK_SUPPORT_CATEGORY_KEY}, using default: {err}");
            false
        });
        let disabled = read_strings(config, DISABLED_SUPPORT_ENTRIES_KEY).unwrap_or_else(|err| {
            warn!("could not read key {DISABLED_SUPPORT_ENTRIES_KEY}, using default: {err}");
            Vec::new()
        });
        let allowed = read_strings(config, ALLOWED_SUPPORT_ENTRIES_KEY).unwrap_or_else(|err| {
            warn!("could not read key {ALLOWED_SUPPORT_ENTRIES_KEY}, using default: {err}");
            Vec::new()
        });
        Self {
            blocked,
            disabled,
            allowed,
        }
    }

    /// Whether a support link with this identifier is shown.
    pub fn includes(&self, identifier: &str) -> bool {
        let listed = |list: &[String]| list.iter().any(|candidate| candidate == identifier);
        if self.blocked {
            listed(&self.allowed)
        } else {
            !listed(&self.disabled)
        }
    }
}

/// Entries for the support links that pass the overrides.
pub fn support_entries(
    sources: &[SupportSourceDescriptor],
    overrides: &SupportOverrides,
) -> Vec<EntryWithCategory> {
    let entries: Vec<EntryWithCategory> = sources
        .iter()
        .filter(|source| overrides.includes(&source.identifier))
        .map(|source| {
            let entry = Entry::new(source.identifier.clone(), source.href.clone())
                .with_target(Target::from_external(source.external));
            EntryWithCategory::new(entry, SUPPORT_CATEGORY)
        })
        .collect();
    debug!(
        "support entries filtered (configured={}, shown={}, blocked={})",
        sources.len(),
        entries.len(),
        overrides.blocked
    );
    entries
}

/// Parse a boolean flag; absent or blank values are `false`.
fn read_bool(config: &GlobalConfig, key: &str) -> Result<bool, ReadError> {
    let Some(raw) = non_blank(config, key) else {
        return Ok(false);
    };
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(ReadError::Override {
            key: key.to_string(),
            message: format!("failed to unmarshal value {other:?} to bool"),
        }),
    }
}

/// Parse a JSON string list; absent or blank values are empty.
fn read_strings(config: &GlobalConfig, key: &str) -> Result<Vec<String>, ReadError> {
    let Some(raw) = non_blank(config, key) else {
        return Ok(Vec::new());
    };
    serde_json::from_str(raw).map_err(|err| ReadError::Override {
        key: key.to_string(),
        message: format!("failed to unmarshal global config key to string slice: {err}"),
    })
}

fn non_blank<'a>(config: &'a GlobalConfig, key: &str) -> Option<&'a str> {
    config
        .get(key)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use warp_menu_test_utils::FixedGlobalConfig;

    fn sources() -> Vec<SupportSourceDescriptor> {
        vec![
            SupportSourceDescriptor::new("id1", "https://help.example.com", true),
            SupportSourceDescriptor::new("id2", "/example", false),
        ]
    }

    fn shown(overrides: &SupportOverrides) -> Vec<(String, Target)> {
        support_entries(&sources(), overrides)
            .into_iter()
            .map(|item| (item.entry.title, item.entry.target))
            .collect()
    }

    #[test]
    fn blocked_category_shows_only_allowed_entries() {
        let overrides = SupportOverrides {
            blocked: true,
            allowed: vec!["id1".to_string()],
            disabled: Vec::new(),
        };
        assert_eq!(shown(&overrides), vec![("id1".to_string(), Target::External)]);
    }

    #[test]
    fn open_category_hides_disabled_entries() {
        let overrides = SupportOverrides {
            blocked: false,
            allowed: Vec::new(),
            disabled: vec!["id1".to_string()],
        };
        assert_eq!(shown(&overrides), vec![("id2".to_string(), Target::SelfTarget)]);
    }

    #[test]
    fn lists_only_apply_in_their_mode() {
        // The denylist is ignored while blocked, the allowlist while open.
        let blocked = SupportOverrides {
            blocked: true,
            allowed: Vec::new(),
            disabled: vec!["id1".to_string()],
        };
        assert!(shown(&blocked).is_empty());

        let open = SupportOverrides {
            blocked: false,
            allowed: vec!["id1".to_string()],
            disabled: Vec::new(),
        };
        assert_eq!(shown(&open).len(), 2);
    }

    #[test]
    fn support_entries_use_the_support_category() {
        let entries = support_entries(&sources(), &SupportOverrides::default());
        assert!(entries.iter().all(|item| item.category == SUPPORT_CATEGORY));
        assert!(entries.iter().all(|item| item.entry.display_name.is_empty()));
    }

    #[test]
    fn malformed_overrides_fall_back_independently() {
        let config: GlobalConfig = [
            (BLOCK_SUPPORT_CATEGORY_KEY, "maybe"),
            (DISABLED_SUPPORT_ENTRIES_KEY, r#"["id2"]"#),
            (ALLOWED_SUPPORT_ENTRIES_KEY, "id1,id2"),
        ]
        .into_iter()
        .collect();

        let overrides = SupportOverrides::from_config(&config);
        assert_eq!(
            overrides,
            SupportOverrides {
                blocked: false,
                disabled: vec!["id2".to_string()],
                allowed: Vec::new(),
            }
        );
    }

    #[test]
    fn blank_values_are_defaults() {
        let config: GlobalConfig = [
            (BLOCK_SUPPORT_CATEGORY_KEY, "  "),
            (DISABLED_SUPPORT_ENTRIES_KEY, ""),
        ]
        .into_iter()
        .collect();
        assert_eq!(SupportOverrides::from_config(&config), SupportOverrides::default());
    }

    #[test]
    fn accepts_all_boolean_spellings() {
        for raw in ["1", "t", "TRUE", "True"] {
            let config: GlobalConfig = [(BLOCK_SUPPORT_CATEGORY_KEY, raw)].into_iter().collect();
            assert!(SupportOverrides::from_config(&config).blocked, "{raw}");
        }
    }

    #[tokio::test]
    async fn unreachable_global_config_yields_defaults() {
        let repo = FixedGlobalConfig::failing("timeout");
        assert_eq!(SupportOverrides::load(&repo).await, SupportOverrides::default());
    }
}
