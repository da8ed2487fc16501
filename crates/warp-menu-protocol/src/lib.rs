//! Shared types and boundary traits for warp menu synthesis.
//!
//! Everything here is consumed by more than one crate: the menu value types
//! written to disk, watched resources and their change events, and the store
//! and recorder traits the core logic is written against.

mod component;
mod event;
mod global_config;
mod menu;
mod resource;
mod store;

pub use component::{ComponentDescriptor, ComponentVersion};
pub use event::{
    EventRecorder, EventSeverity, REASON_MENU_UPDATE_FAILED, REASON_MENU_UPDATED, RecordedEvent,
};
pub use global_config::GlobalConfig;
pub use menu::{Category, Entry, EntryWithCategory, MenuArtifact, Target};
pub use resource::{ChangeEvent, ChangeKind, Resource, ResourceRef};
pub use store::{
    CurrentVersionsChange, DescriptorRepository, GlobalConfigChange, GlobalConfigRepository,
    ResourceStore, StoreError, VersionRegistry, WatchStream,
};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn menu_serializes_with_stable_field_names() {
        let menu = MenuArtifact {
            categories: vec![Category {
                title: "News".to_string(),
                order: 3,
                entries: vec![
                    Entry::new("Daily", "https://news.example.com")
                        .with_display_name("Test")
                        .with_target(Target::External),
                ],
            }],
        };

        let encoded = serde_json::to_value(&menu).expect("serialize");
        assert_eq!(
            encoded,
            json!([{
                "Title": "News",
                "Order": 3,
                "Entries": [{
                    "Title": "Daily",
                    "DisplayName": "Test",
                    "Href": "https://news.example.com",
                    "Target": "external"
                }]
            }])
        );
    }

    #[test]
    fn empty_menu_serializes_as_empty_array() {
        let encoded = serde_json::to_string(&MenuArtifact::default()).expect("serialize");
        assert_eq!(encoded, "[]");
    }

    #[test]
    fn update_events_are_identified_by_the_old_object() {
        let event = ChangeEvent::update(Resource::new("before"), Resource::new("after"));
        assert_eq!(event.name(), Some("before"));
        assert_eq!(ChangeEvent::create(Resource::new("new")).name(), Some("new"));
        assert_eq!(ChangeEvent::delete(Resource::new("gone")).name(), Some("gone"));
    }

    #[test]
    fn descriptor_simple_name_drops_namespace() {
        let descriptor: ComponentDescriptor = serde_json::from_value(json!({
            "Name": "official/redmine",
            "Version": "5.1.0-1",
            "Tags": ["warp"]
        }))
        .expect("descriptor");
        assert_eq!(descriptor.simple_name(), "redmine");
        assert!(descriptor.has_tag("warp"));
        assert!(descriptor.display_name.is_empty());
    }
}
