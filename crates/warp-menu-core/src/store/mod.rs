//! Resource store implementations.
//!
//! `InMemoryResourceStore` pushes changes to subscribers as they are applied;
//! `DirectoryResourceStore` keeps one YAML file per resource and discovers
//! changes by polling.

mod directory;
mod memory;

pub use directory::DirectoryResourceStore;
pub use memory::InMemoryResourceStore;

use std::collections::BTreeMap;
use warp_menu_protocol::{ChangeEvent, Resource};

/// Diff two snapshots into create, update, and delete events.
///
/// Events are ordered by resource name within each snapshot pair.
pub(crate) fn diff_snapshots(
    previous: &BTreeMap<String, Resource>,
    current: &BTreeMap<String, Resource>,
) -> Vec<ChangeEvent> {
    let mut events = Vec::new();
    for (name, resource) in current {
        match previous.get(name) {
            None => events.push(ChangeEvent::create(resource.clone())),
            Some(old) if old != resource => {
                events.push(ChangeEvent::update(old.clone(), resource.clone()))
            }
            Some(_) => {}
        }
    }
    for (name, resource) in previous {
        if !current.contains_key(name) {
            events.push(ChangeEvent::delete(resource.clone()));
        }
    }
    events
}
