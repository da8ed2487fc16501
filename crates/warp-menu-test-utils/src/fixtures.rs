//! Resources shaped the way the resource-backed repositories expect them.

use warp_menu_config::{
    DEFAULT_COMPONENT_PREFIX, DEFAULT_CONFIG_KEY, DEFAULT_CONFIG_NAME, DEFAULT_GLOBAL_CONFIG_NAME,
    DEFAULT_TARGET_NAME,
};
use warp_menu_protocol::{ComponentDescriptor, Resource};

/// The resource outcome events are recorded against.
pub fn target_resource(namespace: &str) -> Resource {
    Resource::new(DEFAULT_TARGET_NAME).in_namespace(namespace)
}

/// Menu config resource holding `yaml` under the default key.
pub fn menu_config_resource(namespace: &str, yaml: &str) -> Resource {
    Resource::new(DEFAULT_CONFIG_NAME)
        .in_namespace(namespace)
        .with_data(DEFAULT_CONFIG_KEY, yaml)
}

/// Global config resource holding a nested YAML document.
pub fn global_config_resource(namespace: &str, yaml: &str) -> Resource {
    Resource::new(DEFAULT_GLOBAL_CONFIG_NAME)
        .in_namespace(namespace)
        .with_data("config.yaml", yaml)
}

/// Component resource with `descriptor` installed as the current version.
pub fn component_resource(namespace: &str, descriptor: &ComponentDescriptor) -> Resource {
    let encoded = serde_json::to_string(descriptor).unwrap_or_default();
    Resource::new(format!(
        "{DEFAULT_COMPONENT_PREFIX}{}",
        descriptor.simple_name()
    ))
    .in_namespace(namespace)
    .with_data("current", descriptor.version.clone())
    .with_data(descriptor.version.clone(), encoded)
}
