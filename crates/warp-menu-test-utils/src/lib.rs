//! Test helpers shared across warp menu crates.

pub mod components;
pub mod fixtures;
pub mod global_config;
pub mod recorder;
pub mod store;

pub use components::{FixedComponents, descriptor};
pub use fixtures::{
    component_resource, global_config_resource, menu_config_resource, target_resource,
};
pub use global_config::FixedGlobalConfig;
pub use recorder::RecordingEventRecorder;
pub use store::FailingResourceStore;
