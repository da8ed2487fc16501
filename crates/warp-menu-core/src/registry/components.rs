//! Component version registry and descriptor repository over resources.
//!
//! Every installed component owns one resource named `<prefix><name>`. Its
//! `current` key names the installed version and each `<version>` key holds
//! that version's descriptor as JSON.

use super::forward_events;
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;
use warp_menu_protocol::{
    ChangeEvent, ComponentDescriptor, ComponentVersion, CurrentVersionsChange,
    DescriptorRepository, Resource, ResourceStore, StoreError, VersionRegistry, WatchStream,
};

/// Data key naming the installed version of a component.
pub const CURRENT_VERSION_KEY: &str = "current";

/// Version registry and descriptor repository backed by component resources.
#[derive(Clone)]
pub struct ResourceComponentRegistry {
    store: Arc<dyn ResourceStore>,
    prefix: String,
}

impl ResourceComponentRegistry {
    pub fn new(store: Arc<dyn ResourceStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    fn component_name<'a>(&self, resource_name: &'a str) -> Option<&'a str> {
        resource_name
            .strip_prefix(self.prefix.as_str())
            .filter(|name| !name.is_empty())
    }

    fn current_version(resource: Option<&Resource>) -> Option<String> {
        resource
            .and_then(|resource| resource.get(CURRENT_VERSION_KEY))
            .map(str::trim)
            .filter(|version| !version.is_empty())
            .map(str::to_string)
    }

    fn decode_descriptor(
        resource: &Resource,
        version: &ComponentVersion,
    ) -> Result<ComponentDescriptor, StoreError> {
        let Some(raw) = resource.get(&version.version) else {
            return Err(StoreError::NotFound(format!(
                "{} has no descriptor for version {}",
                resource.name, version.version
            )));
        };
        serde_json::from_str(raw).map_err(|err| StoreError::decode(version.to_string(), err))
    }
}

#[async_trait]
impl VersionRegistry for ResourceComponentRegistry {
    async fn current_of_all(&self) -> Result<Vec<ComponentVersion>, StoreError> {
        let resources = self.store.list().await?;
        let mut versions: Vec<ComponentVersion> = resources
            .iter()
            .filter_map(|resource| {
                let name = self.component_name(&resource.name)?;
                let version = Self::current_version(Some(resource))?;
                Some(ComponentVersion::new(name, version))
            })
            .collect();
        versions.sort();
        debug!("found current component versions (count={})", versions.len());
        Ok(versions)
    }

    async fn watch_all_current(&self) -> Result<WatchStream<CurrentVersionsChange>, StoreError> {
        let upstream = self.store.watch().await?;
        let registry = self.clone();
        Ok(forward_events(upstream, move |event: &ChangeEvent| {
            let component = registry.component_name(event.name()?)?.to_string();
            let previous = Self::current_version(event.old.as_ref());
            let current = Self::current_version(event.new.as_ref());
            (previous != current).then_some(CurrentVersionsChange {
                component,
                previous,
                current,
            })
        }))
    }
}

#[async_trait]
impl DescriptorRepository for ResourceComponentRegistry {
    async fn get_all(
        &self,
        versions: &[ComponentVersion],
    ) -> Result<Vec<ComponentDescriptor>, StoreError> {
        let mut descriptors = Vec::with_capacity(versions.len());
        for version in versions {
            let resource_name = format!("{}{}", self.prefix, version.name);
            let resource = match self.store.get(&resource_name).await {
                Ok(resource) => resource,
                Err(StoreError::NotFound(_)) => {
                    warn!("component resource vanished before descriptor read (component={version})");
                    continue;
                }
                Err(err) => return Err(err),
            };
            match Self::decode_descriptor(&resource, version) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(err) => warn!("skipping component descriptor: {err}"),
            }
        }
        Ok(descriptors)
    }
}
