//! Aggregation config loading with schema validation.
//!
//! The config is a YAML document stored under one key of the menu
//! configuration resource. It is parsed into a generic value, validated
//! against the schema for path-qualified errors, then decoded.

mod schema;


use crate::{AggregationConfig, ConfigError};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::Path;
use warp_menu_protocol::Resource;

impl AggregationConfig {
    /// Load a config from a YAML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading aggregation config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        config_from_yaml(&contents, "config")
    }

    /// Load a config from YAML contents.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading aggregation config from raw contents (len={})", contents.len());
        config_from_yaml(contents, "config")
    }

    /// Load a config stored under `key` of a resource.
    pub fn from_resource(resource: &Resource, key: &str) -> Result<Self, ConfigError> {
        let Some(contents) = resource.get(key) else {
            return Err(ConfigError::MissingKey {
                resource: resource.name.clone(),
                key: key.to_string(),
            });
        };
        debug!(
            "loading aggregation config from resource (name={}, key={})",
            resource.name, key
        );
        config_from_yaml(contents, &resource.name)
    }

    /// Validate invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (idx, support) in self.support.iter().enumerate() {
            if support.identifier.trim().is_empty() {
                return Err(ConfigError::InvalidField {
                    path: format!("support[{idx}].identifier"),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn config_from_yaml(contents: &str, label: &str) -> Result<AggregationConfig, ConfigError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(contents)?;
    let value = match serde_json::to_value(yaml)? {
        Value::Null => Value::Object(serde_json::Map::new()),
        value => value,
    };
    schema::validate_config_schema(&value, label)?;
    let config: AggregationConfig = serde_json::from_value(value)?;
    config.validate()?;
    debug!(
        "aggregation config loaded (sources={}, support={}, order={})",
        config.sources.len(),
        config.support.len(),
        config.order.len()
    );
    Ok(config)
}
