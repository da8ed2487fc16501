use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use warp_menu_protocol::{
    ComponentDescriptor, ComponentVersion, CurrentVersionsChange, DescriptorRepository,
    StoreError, VersionRegistry, WatchStream,
};

/// Build a descriptor with version `1.0.0`.
pub fn descriptor(
    name: &str,
    display_name: &str,
    description: &str,
    category: &str,
    tags: &[&str],
) -> ComponentDescriptor {
    ComponentDescriptor {
        name: name.to_string(),
        version: "1.0.0".to_string(),
        display_name: display_name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

/// Version registry and descriptor repository over a fixed list.
///
/// Watch streams stay open until the value is dropped and yield only what
/// [`FixedComponents::notify`] sends.
#[derive(Clone, Default)]
pub struct FixedComponents {
    descriptors: Vec<ComponentDescriptor>,
    error: Option<String>,
    descriptor_calls: Arc<Mutex<usize>>,
    watchers: Arc<Mutex<Vec<mpsc::UnboundedSender<Result<CurrentVersionsChange, StoreError>>>>>,
}

impl FixedComponents {
    pub fn new(descriptors: Vec<ComponentDescriptor>) -> Self {
        Self {
            descriptors,
            ..Self::default()
        }
    }

    /// Every call fails with `StoreError::Unavailable(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Number of `get_all` calls made so far.
    pub fn descriptor_calls(&self) -> usize {
        *self.descriptor_calls.lock()
    }

    /// Send a current-version change to every open watch.
    pub fn notify(&self, component: &str, previous: Option<&str>, current: Option<&str>) {
        let change = CurrentVersionsChange {
            component: component.to_string(),
            previous: previous.map(str::to_string),
            current: current.map(str::to_string),
        };
        self.watchers
            .lock()
            .retain(|sender| sender.send(Ok(change.clone())).is_ok());
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.error {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl VersionRegistry for FixedComponents {
    async fn current_of_all(&self) -> Result<Vec<ComponentVersion>, StoreError> {
        self.check()?;
        Ok(self
            .descriptors
            .iter()
            .map(|descriptor| ComponentVersion::new(descriptor.simple_name(), &descriptor.version))
            .collect())
    }

    async fn watch_all_current(&self) -> Result<WatchStream<CurrentVersionsChange>, StoreError> {
        self.check()?;
        let (sender, receiver) = mpsc::unbounded_channel();
        self.watchers.lock().push(sender);
        Ok(receiver)
    }
}

#[async_trait]
impl DescriptorRepository for FixedComponents {
    async fn get_all(
        &self,
        versions: &[ComponentVersion],
    ) -> Result<Vec<ComponentDescriptor>, StoreError> {
        *self.descriptor_calls.lock() += 1;
        self.check()?;
        Ok(self
            .descriptors
            .iter()
            .filter(|descriptor| {
                versions
                    .iter()
                    .any(|version| version.name == descriptor.simple_name())
            })
            .cloned()
            .collect())
    }
}
