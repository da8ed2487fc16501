use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use warp_menu_protocol::{
    GlobalConfig, GlobalConfigChange, GlobalConfigRepository, StoreError, WatchStream,
};

/// Global config repository returning a fixed set of entries.
#[derive(Clone, Default)]
pub struct FixedGlobalConfig {
    config: GlobalConfig,
    error: Option<String>,
    watchers: Arc<Mutex<Vec<mpsc::UnboundedSender<Result<GlobalConfigChange, StoreError>>>>>,
}

impl FixedGlobalConfig {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            config: entries.into_iter().collect(),
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

    /// Send a change notification to every open watch.
    pub fn notify(&self, prefix: &str) {
        self.watchers.lock().retain(|sender| {
            sender
                .send(Ok(GlobalConfigChange {
                    prefix: prefix.to_string(),
                }))
                .is_ok()
        });
    }
}

#[async_trait]
impl GlobalConfigRepository for FixedGlobalConfig {
    async fn get(&self) -> Result<GlobalConfig, StoreError> {
        match &self.error {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(self.config.clone()),
        }
    }

    async fn watch(&self, _prefix: &str) -> Result<WatchStream<GlobalConfigChange>, StoreError> {
        if let Some(message) = &self.error {
            return Err(StoreError::Unavailable(message.clone()));
        }
        let (sender, receiver) = mpsc::unbounded_channel();
        self.watchers.lock().push(sender);
        Ok(receiver)
    }
}
