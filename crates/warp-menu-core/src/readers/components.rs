//! Reader for installed components tagged for the menu.

use crate::error::ReadError;
use log::{debug, info};
use warp_menu_config::SourceDescriptor;
use warp_menu_protocol::{
    ComponentDescriptor, DescriptorRepository, Entry, EntryWithCategory, VersionRegistry,
};

/// Read every installed component carrying the source's tag.
pub(super) async fn read(
    versions: &dyn VersionRegistry,
    descriptors: &dyn DescriptorRepository,
    source: &SourceDescriptor,
) -> Result<Vec<EntryWithCategory>, ReadError> {
    info!("read components from {} for warp menu", source.path);
    let current = versions
        .current_of_all()
        .await
        .map_err(|err| ReadError::store("failed to get all current component versions", err))?;
    if current.is_empty() {
        return Ok(Vec::new());
    }

    let all = descriptors
        .get_all(&current)
        .await
        .map_err(|err| ReadError::store("failed to get all component descriptors", err))?;

    let entries = all
        .iter()
        .filter_map(|descriptor| entry_for(descriptor, source.tag.as_deref()))
        .collect::<Vec<_>>();
    debug!(
        "component source read (installed={}, listed={})",
        current.len(),
        entries.len()
    );
    Ok(entries)
}

/// Entry for a descriptor, or `None` when it is untagged or untitled.
fn entry_for(descriptor: &ComponentDescriptor, tag: Option<&str>) -> Option<EntryWithCategory> {
    if let Some(tag) = tag {
        if !descriptor.has_tag(tag) {
            return None;
        }
    }
    if descriptor.description.trim().is_empty() {
        return None;
    }
    debug!(
        "add component {} with category {}",
        descriptor.simple_name(),
        descriptor.category
    );
    let entry = Entry::new(
        descriptor.description.clone(),
        format!("/{}", descriptor.simple_name()),
    )
    .with_display_name(descriptor.display_name.clone());
    Some(EntryWithCategory::new(entry, descriptor.category.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use warp_menu_protocol::Target;
    use warp_menu_test_utils::{FixedComponents, descriptor};

    #[tokio::test]
    async fn lists_tagged_components_with_titles() {
        let components = FixedComponents::new(vec![
            descriptor("official/redmine", "Redmine", "Project management", "DevApps", &["warp"]),
            descriptor("official/postgres", "PostgreSQL", "Database", "Base", &[]),
            descriptor("official/untitled", "Untitled", "", "DevApps", &["warp"]),
        ]);
        let source = SourceDescriptor::components("/dogu", "warp");

        let entries = read(&components, &components, &source).await.expect("read");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, "DevApps");
        assert_eq!(
            entries[0].entry,
            Entry {
                title: "Project management".to_string(),
                display_name: "Redmine".to_string(),
                href: "/redmine".to_string(),
                target: Target::SelfTarget,
            }
        );
    }

    #[tokio::test]
    async fn no_installed_components_is_an_empty_success() {
        let components = FixedComponents::new(Vec::new());
        let source = SourceDescriptor::components("/dogu", "warp");
        let entries = read(&components, &components, &source).await.expect("read");
        assert!(entries.is_empty());
        assert_eq!(components.descriptor_calls(), 0);
    }

    #[tokio::test]
    async fn absent_tag_lists_every_titled_component() {
        let components = FixedComponents::new(vec![
            descriptor("a/one", "One", "First", "Apps", &[]),
            descriptor("a/two", "Two", "Second", "Apps", &["other"]),
        ]);
        let mut source = SourceDescriptor::components("/dogu", "unused");
        source.tag = None;
        let entries = read(&components, &components, &source).await.expect("read");
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn registry_failure_is_a_source_error() {
        let components = FixedComponents::failing("registry offline");
        let source = SourceDescriptor::components("/dogu", "warp");
        let err = read(&components, &components, &source).await.unwrap_err();
        assert!(format!("{err}").contains("registry offline"));
    }
}
