//! In-memory resource store with push notifications.

use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use warp_menu_protocol::{ChangeEvent, Resource, ResourceStore, StoreError, WatchStream};

type Subscriber = mpsc::UnboundedSender<Result<ChangeEvent, StoreError>>;

#[derive(Default)]
struct Inner {
    resources: BTreeMap<String, Resource>,
    subscribers: Vec<Subscriber>,
}

impl Inner {
    /// Send to every live subscriber, dropping closed ones.
    fn broadcast(&mut self, event: &ChangeEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(Ok(event.clone())).is_ok());
    }
}

/// Resource store held in memory.
///
/// Mutations are broadcast while the store lock is held, so every subscriber
/// observes changes in the order they were applied.
#[derive(Clone, Default)]
pub struct InMemoryResourceStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with resources. No events are emitted.
    pub fn with_resources(resources: impl IntoIterator<Item = Resource>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock();
            for resource in resources {
                inner.resources.insert(resource.name.clone(), resource);
            }
        }
        store
    }

    /// Create or replace a resource.
    ///
    /// Returns the emitted event, or `None` when the content is unchanged.
    pub fn apply(&self, resource: Resource) -> Option<ChangeEvent> {
        let mut inner = self.inner.lock();
        let event = match inner.resources.insert(resource.name.clone(), resource.clone()) {
            None => ChangeEvent::create(resource),
            Some(old) if old == resource => return None,
            Some(old) => ChangeEvent::update(old, resource),
        };
        debug!(
            "resource applied (name={}, kind={:?})",
            event.name().unwrap_or_default(),
            event.kind
        );
        inner.broadcast(&event);
        Some(event)
    }

    /// Remove a resource, emitting a delete event if it existed.
    pub fn delete(&self, name: &str) -> Option<ChangeEvent> {
        let mut inner = self.inner.lock();
        let old = inner.resources.remove(name)?;
        let event = ChangeEvent::delete(old);
        debug!("resource deleted (name={name})");
        inner.broadcast(&event);
        Some(event)
    }

    /// Emit a generic event for an existing resource.
    pub fn touch(&self, name: &str) -> Option<ChangeEvent> {
        let mut inner = self.inner.lock();
        let resource = inner.resources.get(name)?.clone();
        let event = ChangeEvent::generic(resource);
        inner.broadcast(&event);
        Some(event)
    }

    /// Deliver a watch error to every subscriber.
    pub fn fail_watchers(&self, message: &str) {
        let mut inner = self.inner.lock();
        inner.subscribers.retain(|subscriber| {
            subscriber
                .send(Err(StoreError::Unavailable(message.to_string())))
                .is_ok()
        });
    }

    /// Close every open watch stream.
    pub fn close_watchers(&self) {
        self.inner.lock().subscribers.clear();
    }

    /// Number of live subscribers.
    pub fn watcher_count(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.subscribers.retain(|subscriber| !subscriber.is_closed());
        inner.subscribers.len()
    }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn get(&self, name: &str) -> Result<Resource, StoreError> {
        self.inner
            .lock()
            .resources
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn list(&self) -> Result<Vec<Resource>, StoreError> {
        Ok(self.inner.lock().resources.values().cloned().collect())
    }

    async fn watch(&self) -> Result<WatchStream<ChangeEvent>, StoreError> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.inner.lock().subscribers.push(sender);
        Ok(receiver)
    }
}
