//! Error types for the synthesis core.

use thiserror::Error;
use warp_menu_config::ConfigError;
use warp_menu_protocol::StoreError;

/// Errors raised while reading a single source.
///
/// These never fail a pass; the source contributes no entries instead.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The source kind has no reader.
    #[error("wrong source type: {0}")]
    UnknownSourceType(String),
    /// A backing store failed.
    #[error("{context}: {source}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },
    /// A single stored record could not be parsed.
    #[error("failed to parse record {key}: {message}")]
    Record { key: String, message: String },
    /// A support override value could not be parsed.
    #[error("failed to parse override {key}: {message}")]
    Override { key: String, message: String },
}

impl ReadError {
    pub(crate) fn store(context: impl Into<String>, source: StoreError) -> Self {
        Self::Store {
            context: context.into(),
            source,
        }
    }
}

/// Errors that fail a whole synthesis pass.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The resource events are recorded against could not be fetched.
    #[error("failed to get target resource {name}: {source}")]
    TargetLookup {
        name: String,
        #[source]
        source: StoreError,
    },
    /// The menu configuration resource could not be fetched.
    #[error("failed to get menu config resource {name}: {source}")]
    ConfigFetch {
        name: String,
        #[source]
        source: StoreError,
    },
    /// The aggregation config could not be parsed.
    #[error("failed to load menu config: {0}")]
    ConfigLoad(#[from] ConfigError),
    /// The menu could not be serialized.
    #[error("failed to marshal menu: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The menu file could not be written.
    #[error("failed to write menu file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while setting up watches.
#[derive(Debug, Error)]
pub enum WatchError {
    /// A store refused to open a watch stream.
    #[error("failed to create {domain} watch: {source}")]
    Subscribe {
        domain: String,
        #[source]
        source: StoreError,
    },
    /// Loading the config needed to decide what to watch failed.
    #[error("failed to prepare watches: {0}")]
    Synthesis(#[from] SynthesisError),
}
