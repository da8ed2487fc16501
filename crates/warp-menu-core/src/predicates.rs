//! Filters deciding which resource changes trigger a synthesis pass.

use log::debug;
use serde_yaml::Value;
use std::collections::BTreeSet;
use warp_menu_config::{Settings, WatchMode};
use warp_menu_protocol::{ChangeEvent, ChangeKind, Resource};

/// Data key holding the YAML document a content predicate inspects.
pub const DEFAULT_CONTENT_DATA_KEY: &str = "config.yaml";
/// Field of that document whose value is compared.
pub const DEFAULT_CONTENT_FIELD: &str = "maintenance";

/// Accepts events for a fixed set of names plus any name with a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdentityPredicate {
    names: BTreeSet<String>,
    prefix: String,
}

impl ResourceIdentityPredicate {
    pub fn new<I, S>(names: I, prefix: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            prefix: prefix.into(),
        }
    }

    /// Watch the global config, the menu config and every component resource.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            [
                settings.global_config_name.as_str(),
                settings.config_name.as_str(),
            ],
            settings.component_prefix.as_str(),
        )
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.names.contains(name) || (!self.prefix.is_empty() && name.starts_with(&self.prefix))
    }

    /// Update events are judged by the old object's name.
    pub fn accepts(&self, event: &ChangeEvent) -> bool {
        event.name().is_some_and(|name| self.matches_name(name))
    }
}

/// Accepts changes to one resource, updates only when a decoded field changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChangePredicate {
    resource: String,
    data_key: String,
    field: String,
}

impl ContentChangePredicate {
    pub fn new(
        resource: impl Into<String>,
        data_key: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            resource: resource.into(),
            data_key: data_key.into(),
            field: field.into(),
        }
    }

    /// Watch the default data key and field of `resource`.
    pub fn for_resource(resource: impl Into<String>) -> Self {
        Self::new(resource, DEFAULT_CONTENT_DATA_KEY, DEFAULT_CONTENT_FIELD)
    }

    /// Events for any other resource are rejected before the kind rules apply.
    pub fn accepts(&self, event: &ChangeEvent) -> bool {
        if event.name() != Some(self.resource.as_str()) {
            return false;
        }
        match event.kind {
            ChangeKind::Create | ChangeKind::Delete => true,
            ChangeKind::Generic => false,
            ChangeKind::Update => match (&event.old, &event.new) {
                (Some(old), Some(new)) => self.field_value(old) != self.field_value(new),
                _ => false,
            },
        }
    }

    /// Decode the watched field. Anything undecodable reads as null.
    fn field_value(&self, resource: &Resource) -> Value {
        let Some(raw) = resource.get(&self.data_key) else {
            return Value::Null;
        };
        match serde_yaml::from_str::<Value>(raw) {
            Ok(document) => document.get(&self.field).cloned().unwrap_or(Value::Null),
            Err(err) => {
                debug!(
                    "treating undecodable content as empty (resource={}, key={}, error={})",
                    resource.name, self.data_key, err
                );
                Value::Null
            }
        }
    }
}

/// The predicate applied to the resource event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangePredicate {
    Identity(ResourceIdentityPredicate),
    ContentChange(ContentChangePredicate),
}

impl ChangePredicate {
    /// Pick the predicate for the configured watch mode.
    pub fn from_settings(settings: &Settings) -> Self {
        match settings.watch_mode {
            WatchMode::Identity => Self::Identity(ResourceIdentityPredicate::from_settings(settings)),
            WatchMode::Content => Self::ContentChange(ContentChangePredicate::for_resource(
                settings.global_config_name.as_str(),
            )),
        }
    }

    pub fn accepts(&self, event: &ChangeEvent) -> bool {
        match self {
            Self::Identity(predicate) => predicate.accepts(event),
            Self::ContentChange(predicate) => predicate.accepts(event),
        }
    }
}
