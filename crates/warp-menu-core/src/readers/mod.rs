//! Per-kind source readers.
//!
//! A reader turns one configured source into entries paired with their
//! category. Dispatch is by [`SourceKind`] only; a kind without a reader is an
//! error for that source alone.

mod components;
mod externals;

pub use externals::{ExternalRecord, remove_legacy_prefix};

use crate::error::ReadError;
use log::debug;
use std::sync::Arc;
use warp_menu_config::{SourceDescriptor, SourceKind};
use warp_menu_protocol::{
    DescriptorRepository, EntryWithCategory, GlobalConfigRepository, VersionRegistry,
};

/// Backing stores the readers fetch from.
#[derive(Clone)]
pub struct SourceReaders {
    pub(crate) global_config: Arc<dyn GlobalConfigRepository>,
    pub(crate) versions: Arc<dyn VersionRegistry>,
    pub(crate) descriptors: Arc<dyn DescriptorRepository>,
}

impl SourceReaders {
    pub fn new(
        global_config: Arc<dyn GlobalConfigRepository>,
        versions: Arc<dyn VersionRegistry>,
        descriptors: Arc<dyn DescriptorRepository>,
    ) -> Self {
        Self {
            global_config,
            versions,
            descriptors,
        }
    }

    /// Global config repository, shared with the support filter.
    pub fn global_config(&self) -> &Arc<dyn GlobalConfigRepository> {
        &self.global_config
    }

    /// Read one source with the reader registered for its kind.
    pub async fn read(&self, source: &SourceDescriptor) -> Result<Vec<EntryWithCategory>, ReadError> {
        debug!(
            "reading source (type={}, path={})",
            source.kind, source.path
        );
        match &source.kind {
            SourceKind::Components => {
                components::read(self.versions.as_ref(), self.descriptors.as_ref(), source).await
            }
            SourceKind::Externals => externals::read(self.global_config.as_ref(), source).await,
            SourceKind::Support | SourceKind::Unknown(_) => {
                Err(ReadError::UnknownSourceType(source.kind.to_string()))
            }
        }
    }
}
