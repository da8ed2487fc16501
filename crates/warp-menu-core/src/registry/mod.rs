//! Repositories layered over a [`ResourceStore`](warp_menu_protocol::ResourceStore).
//!
//! These translate raw resources into the global config, the version registry,
//! and component descriptors, and derive narrower watch streams from the
//! store's change events.

mod components;
mod global_config;

pub use components::{CURRENT_VERSION_KEY, ResourceComponentRegistry};
pub use global_config::{GLOBAL_CONFIG_DATA_KEY, ResourceGlobalConfigRepository, flatten_yaml};

use log::debug;
use tokio::sync::mpsc;
use warp_menu_protocol::{ChangeEvent, StoreError, WatchStream};

/// Forward store events through `map`, emitting only the `Some` results.
///
/// The forwarding task ends when either side closes.
pub(crate) fn forward_events<T, F>(mut upstream: WatchStream<ChangeEvent>, mut map: F) -> WatchStream<T>
where
    T: Send + 'static,
    F: FnMut(&ChangeEvent) -> Option<T> + Send + 'static,
{
    let (sender, receiver) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sender.closed() => {
                    debug!("derived watch receiver dropped");
                    return;
                }
                item = upstream.recv() => {
                    let forwarded: Result<T, StoreError> = match item {
                        None => return,
                        Some(Err(err)) => Err(err),
                        Some(Ok(event)) => match map(&event) {
                            Some(value) => Ok(value),
                            None => continue,
                        },
                    };
                    if sender.send(forwarded).is_err() {
                        return;
                    }
                }
            }
        }
    });
    receiver
}
