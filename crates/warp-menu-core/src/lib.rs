//! Menu synthesis for the warp navigation menu.
//!
//! This crate reads configured sources through the repository traits in
//! `warp-menu-protocol`, filters support links, aggregates the result into
//! sorted categories, and writes the menu file. [`MenuWatcher`] keeps the file
//! current by re-running [`Synthesizer::run_once`] on accepted changes.

pub mod aggregate;
pub mod error;
pub mod predicates;
pub mod readers;
pub mod recorder;
pub mod registry;
pub mod store;
pub mod support;
pub mod synthesis;
pub mod watch;

pub use aggregate::aggregate;
pub use error::{ReadError, SynthesisError, WatchError};
pub use predicates::{ChangePredicate, ContentChangePredicate, ResourceIdentityPredicate};
pub use readers::{ExternalRecord, SourceReaders, remove_legacy_prefix};
pub use recorder::{BroadcastEventRecorder, LogEventRecorder};
pub use registry::{ResourceComponentRegistry, ResourceGlobalConfigRepository};
pub use store::{DirectoryResourceStore, InMemoryResourceStore};
pub use support::{SUPPORT_CATEGORY, SupportOverrides, support_entries};
pub use synthesis::{MENU_UPDATED_MESSAGE, Synthesizer};
pub use watch::MenuWatcher;
