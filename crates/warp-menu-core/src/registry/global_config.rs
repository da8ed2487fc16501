//! Global config repository over a single resource.

use super::forward_events;
use async_trait::async_trait;
use log::{debug, warn};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use warp_menu_protocol::{
    ChangeEvent, GlobalConfig, GlobalConfigChange, GlobalConfigRepository, Resource,
    ResourceStore, StoreError, WatchStream,
};

/// Data key holding the nested global config document.
pub const GLOBAL_CONFIG_DATA_KEY: &str = "config.yaml";

/// Reads the global config from one resource holding a nested YAML document.
#[derive(Clone)]
pub struct ResourceGlobalConfigRepository {
    store: Arc<dyn ResourceStore>,
    name: String,
}

impl ResourceGlobalConfigRepository {
    pub fn new(store: Arc<dyn ResourceStore>, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }

    fn decode(resource: &Resource) -> Result<GlobalConfig, StoreError> {
        let Some(contents) = resource.get(GLOBAL_CONFIG_DATA_KEY) else {
            return Ok(GlobalConfig::default());
        };
        let document: Value = serde_yaml::from_str(contents)
            .map_err(|err| StoreError::decode(&resource.name, err))?;
        Ok(GlobalConfig::new(flatten_yaml(&document)))
    }

    /// Entries below `prefix`, empty when the resource is absent or broken.
    fn children_of(resource: Option<&Resource>, prefix: &str) -> BTreeMap<String, String> {
        let Some(resource) = resource else {
            return BTreeMap::new();
        };
        match Self::decode(resource) {
            Ok(config) => config.children(prefix),
            Err(err) => {
                warn!("treating undecodable global config as empty: {err}");
                BTreeMap::new()
            }
        }
    }
}

#[async_trait]
impl GlobalConfigRepository for ResourceGlobalConfigRepository {
    async fn get(&self) -> Result<GlobalConfig, StoreError> {
        let resource = self.store.get(&self.name).await?;
        Self::decode(&resource)
    }

    async fn watch(&self, prefix: &str) -> Result<WatchStream<GlobalConfigChange>, StoreError> {
        let upstream = self.store.watch().await?;
        let name = self.name.clone();
        let prefix = prefix.to_string();
        debug!("watching global config (name={name}, prefix={prefix})");

        Ok(forward_events(upstream, move |event: &ChangeEvent| {
            if event.name() != Some(name.as_str()) {
                return None;
            }
            let before = Self::children_of(event.old.as_ref(), &prefix);
            let after = Self::children_of(event.new.as_ref(), &prefix);
            (before != after).then(|| GlobalConfigChange {
                prefix: prefix.clone(),
            })
        }))
    }
}

/// Flatten a nested YAML mapping into `/`-joined keys.
///
/// Scalars are rendered as text, sequences as JSON arrays, and null as an
/// empty string.
pub fn flatten_yaml(document: &Value) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    if let Value::Mapping(_) = document {
        flatten_into(document, "", &mut entries);
    }
    entries
}

fn flatten_into(value: &Value, key: &str, entries: &mut BTreeMap<String, String>) {
    match value {
        Value::Mapping(map) => {
            for (child_key, child) in map {
                let Some(child_key) = scalar_text(child_key) else {
                    continue;
                };
                let joined = if key.is_empty() {
                    child_key
                } else {
                    format!("{key}/{child_key}")
                };
                flatten_into(child, &joined, entries);
            }
        }
        Value::Tagged(tagged) => flatten_into(&tagged.value, key, entries),
        Value::Sequence(_) => {
            let rendered = serde_json::to_string(value).unwrap_or_default();
            entries.insert(key.to_string(), rendered);
        }
        scalar => {
            entries.insert(key.to_string(), scalar_text(scalar).unwrap_or_default());
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        _ => None,
    }
}
