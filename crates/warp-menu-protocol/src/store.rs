//! Boundary traits for the backing stores the menu is synthesized from.

use crate::{ChangeEvent, ComponentDescriptor, ComponentVersion, GlobalConfig, Resource};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors returned by stores, registries, and their watch streams.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),
    /// Stored content could not be decoded.
    #[error("failed to decode {subject}: {message}")]
    Decode { subject: String, message: String },
    /// The store could not be reached or read.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn decode(subject: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            subject: subject.into(),
            message: message.to_string(),
        }
    }
}

/// Ordered stream of watch results. Closing the stream ends the watch.
pub type WatchStream<T> = mpsc::UnboundedReceiver<Result<T, StoreError>>;

/// Notification that the global config changed below a watched prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfigChange {
    pub prefix: String,
}

/// Notification that the set of current component versions changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentVersionsChange {
    /// Component whose current version changed.
    pub component: String,
    pub previous: Option<String>,
    pub current: Option<String>,
}

/// Store of named resources with change notifications.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Fetch one resource by name.
    async fn get(&self, name: &str) -> Result<Resource, StoreError>;

    /// List all resources.
    async fn list(&self) -> Result<Vec<Resource>, StoreError>;

    /// Subscribe to change events for every resource in the store.
    async fn watch(&self) -> Result<WatchStream<ChangeEvent>, StoreError>;
}

/// Access to the global key/value configuration.
#[async_trait]
pub trait GlobalConfigRepository: Send + Sync {
    /// Read the whole global configuration.
    async fn get(&self) -> Result<GlobalConfig, StoreError>;

    /// Watch for changes to entries below `prefix`.
    async fn watch(&self, prefix: &str) -> Result<WatchStream<GlobalConfigChange>, StoreError>;
}

/// Registry of which component versions are currently installed.
#[async_trait]
pub trait VersionRegistry: Send + Sync {
    /// Current version of every installed component.
    async fn current_of_all(&self) -> Result<Vec<ComponentVersion>, StoreError>;

    /// Watch for changes to the set of current versions.
    async fn watch_all_current(&self) -> Result<WatchStream<CurrentVersionsChange>, StoreError>;
}

/// Lookup of full component descriptors.
#[async_trait]
pub trait DescriptorRepository: Send + Sync {
    /// Fetch the descriptor for each given component version.
    async fn get_all(
        &self,
        versions: &[ComponentVersion],
    ) -> Result<Vec<ComponentDescriptor>, StoreError>;
}
