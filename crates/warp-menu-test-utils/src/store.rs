use async_trait::async_trait;
use warp_menu_protocol::{ChangeEvent, Resource, ResourceStore, StoreError, WatchStream};

/// Resource store whose every call fails.
#[derive(Clone, Debug)]
pub struct FailingResourceStore {
    message: String,
}

impl FailingResourceStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn error(&self) -> StoreError {
        StoreError::Unavailable(self.message.clone())
    }
}

#[async_trait]
impl ResourceStore for FailingResourceStore {
    async fn get(&self, _name: &str) -> Result<Resource, StoreError> {
        Err(self.error())
    }

    async fn list(&self) -> Result<Vec<Resource>, StoreError> {
        Err(self.error())
    }

    async fn watch(&self) -> Result<WatchStream<ChangeEvent>, StoreError> {
        Err(self.error())
    }
}
