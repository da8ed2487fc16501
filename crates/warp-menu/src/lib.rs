//! Public surface for the warp menu synthesizer.
//!
//! This crate re-exports the library crates and wires a synthesizer and
//! watcher over a directory-backed resource store for the binary.

/// Re-export for convenience.
pub use warp_menu_config as config;
pub use warp_menu_core as core;
/// Re-export for convenience.
pub use warp_menu_protocol as protocol;

use log::info;
use std::path::Path;
use std::sync::Arc;
use warp_menu_config::Settings;
use warp_menu_core::{DirectoryResourceStore, LogEventRecorder, MenuWatcher, Synthesizer};
use warp_menu_protocol::StoreError;

/// Initialize logging with env_logger, honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}

/// Build a synthesizer reading resources from the directory at `root`.
pub fn directory_synthesizer(
    root: &Path,
    settings: Settings,
) -> Result<Synthesizer, StoreError> {
    let store = DirectoryResourceStore::new(root, &settings.namespace, settings.poll_interval)?;
    info!(
        "synthesizer configured (store={}, menu_path={}, mode={:?})",
        root.display(),
        settings.menu_path.display(),
        settings.watch_mode
    );
    Ok(Synthesizer::from_store(
        Arc::new(store),
        Arc::new(LogEventRecorder),
        settings,
    ))
}

/// Build a watcher over the directory at `root`.
pub fn directory_watcher(root: &Path, settings: Settings) -> Result<MenuWatcher, StoreError> {
    directory_synthesizer(root, settings).map(MenuWatcher::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn directory_synthesizer_writes_menu_from_files() {
        let store_dir = tempdir().expect("store dir");
        let out_dir = tempdir().expect("out dir");
        fs::write(store_dir.path().join("k8s-ces-assets-nginx.yaml"), "{}\n").expect("target");
        fs::write(
            store_dir.path().join("k8s-ces-warp-config.yaml"),
            "warp: |\n  sources:\n    - path: externals\n      type: externals\n",
        )
        .expect("menu config");
        fs::write(
            store_dir.path().join("global-config.yaml"),
            "config.yaml: |\n  externals:\n    wiki: |\n      URL: https://wiki.example.com\n      Description: Wiki\n      Category: Docs\n",
        )
        .expect("global config");

        let mut settings = Settings::new("ecosystem");
        settings.menu_path = out_dir.path().join("menu.json");
        let menu = directory_synthesizer(store_dir.path(), settings)
            .expect("synthesizer")
            .run_once()
            .await
            .expect("run once");

        assert_eq!(menu.entry_count(), 1);
        assert_eq!(
            menu.category("Docs").expect("docs").entries[0].href,
            "https://wiki.example.com"
        );
    }
}
