//! One synthesis pass: read every source, aggregate, write, record.

use crate::aggregate::aggregate;
use crate::error::SynthesisError;
use crate::readers::SourceReaders;
use crate::registry::{ResourceComponentRegistry, ResourceGlobalConfigRepository};
use crate::support::{SupportOverrides, support_entries};
use futures_util::future::join_all;
use log::{debug, error, info, warn};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use warp_menu_config::{AggregationConfig, Settings, SourceKind};
use warp_menu_protocol::{
    EventRecorder, EventSeverity, MenuArtifact, REASON_MENU_UPDATE_FAILED, REASON_MENU_UPDATED,
    RecordedEvent, ResourceRef, ResourceStore,
};

/// Message recorded after a successful pass.
pub const MENU_UPDATED_MESSAGE: &str = "Warp menu updated.";

/// Drives synthesis passes against one resource store.
#[derive(Clone)]
pub struct Synthesizer {
    readers: SourceReaders,
    store: Arc<dyn ResourceStore>,
    recorder: Arc<dyn EventRecorder>,
    settings: Arc<Settings>,
}

impl Synthesizer {
    pub fn new(
        readers: SourceReaders,
        store: Arc<dyn ResourceStore>,
        recorder: Arc<dyn EventRecorder>,
        settings: Settings,
    ) -> Self {
        Self {
            readers,
            store,
            recorder,
            settings: Arc::new(settings),
        }
    }

    /// Build a synthesizer whose readers are backed by `store` itself.
    pub fn from_store(
        store: Arc<dyn ResourceStore>,
        recorder: Arc<dyn EventRecorder>,
        settings: Settings,
    ) -> Self {
        let global_config = Arc::new(ResourceGlobalConfigRepository::new(
            store.clone(),
            settings.global_config_name.clone(),
        ));
        let components = Arc::new(ResourceComponentRegistry::new(
            store.clone(),
            settings.component_prefix.clone(),
        ));
        let readers = SourceReaders::new(global_config, components.clone(), components);
        Self::new(readers, store, recorder, settings)
    }

    pub fn readers(&self) -> &SourceReaders {
        &self.readers
    }

    pub fn store(&self) -> &Arc<dyn ResourceStore> {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resource the outcome events are recorded against.
    pub fn event_target(&self) -> ResourceRef {
        ResourceRef::new(&self.settings.namespace, &self.settings.target_name)
    }

    /// Read and aggregate every source of `config`.
    ///
    /// A failing source is logged and contributes nothing, so per-source
    /// errors never fail this call. Support links are always processed.
    pub async fn synthesize(
        &self,
        config: &AggregationConfig,
    ) -> Result<MenuArtifact, SynthesisError> {
        let reads = config
            .sources
            .iter()
            .filter(|source| source.kind != SourceKind::Support)
            .map(|source| async move { (source, self.readers.read(source).await) });

        let mut entries = Vec::new();
        for (source, result) in join_all(reads).await {
            match result {
                Ok(read) => entries.extend(read),
                Err(err) => error!(
                    "error reading source, skipping (type={}, path={}): {err}",
                    source.kind, source.path
                ),
            }
        }

        let overrides = SupportOverrides::load(self.readers.global_config().as_ref()).await;
        entries.extend(support_entries(&config.support, &overrides));

        let menu = aggregate(entries, config);
        debug!(
            "menu synthesized (categories={}, entries={})",
            menu.categories.len(),
            menu.entry_count()
        );
        Ok(menu)
    }

    /// Run a full pass and record its outcome.
    pub async fn run_once(&self) -> Result<MenuArtifact, SynthesisError> {
        let result = self.run_pass().await;
        let event = match &result {
            Ok(menu) => {
                info!(
                    "warp menu updated (path={}, categories={})",
                    self.settings.menu_path.display(),
                    menu.categories.len()
                );
                RecordedEvent::new(
                    self.event_target(),
                    EventSeverity::Normal,
                    REASON_MENU_UPDATED,
                    MENU_UPDATED_MESSAGE,
                )
            }
            Err(err) => {
                warn!("warp menu update failed: {err}");
                RecordedEvent::new(
                    self.event_target(),
                    EventSeverity::Warning,
                    REASON_MENU_UPDATE_FAILED,
                    format!("Updating warp menu failed: {err}"),
                )
            }
        };
        self.recorder.record(event);
        result
    }

    /// Reconciliation entry point for a changed resource.
    pub async fn reconcile(&self, trigger: &ResourceRef) -> Result<(), SynthesisError> {
        info!("reconciling warp menu (trigger={trigger})");
        self.run_once().await.map(|_| ())
    }

    async fn run_pass(&self) -> Result<MenuArtifact, SynthesisError> {
        let target_name = &self.settings.target_name;
        self.store
            .get(target_name)
            .await
            .map_err(|source| SynthesisError::TargetLookup {
                name: target_name.clone(),
                source,
            })?;

        let config_name = &self.settings.config_name;
        let config_resource =
            self.store
                .get(config_name)
                .await
                .map_err(|source| SynthesisError::ConfigFetch {
                    name: config_name.clone(),
                    source,
                })?;
        let config = AggregationConfig::from_resource(&config_resource, &self.settings.config_key)?;

        let menu = self.synthesize(&config).await?;
        let contents = serde_json::to_vec(&menu)?;
        write_atomically(&self.settings.menu_path, &contents)?;
        Ok(menu)
    }
}

/// Replace the file at `path` with `contents` via a sibling temp file.
///
/// Every call writes its own uniquely named temp file, so concurrent writers
/// never share one; the last rename wins.
fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), SynthesisError> {
    let write_error = |source| SynthesisError::Write {
        path: path.display().to_string(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_error)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(write_error)?;
    temp.write_all(contents).map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;
    temp.persist(path).map_err(|err| write_error(err.error))?;
    debug!("menu file replaced (path={}, bytes={})", path.display(), contents.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::thread;
    use tempfile::tempdir;

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("read dir")
            .map(|entry| {
                entry
                    .expect("entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }

    #[test]
    fn atomic_write_creates_parent_and_replaces_content() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("warp").join("menu.json");

        write_atomically(&path, b"[1]").expect("first write");
        write_atomically(&path, b"[]").expect("second write");

        assert_eq!(fs::read(&path).expect("read"), b"[]".to_vec());
        assert_eq!(file_names(&dir.path().join("warp")), vec!["menu.json"]);
    }

    #[test]
    fn atomic_write_into_a_file_path_fails_cleanly() {
        let dir = tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a dir").expect("write blocker");

        let err = write_atomically(&blocker.join("menu.json"), b"[]").expect_err("must fail");
        assert!(matches!(err, SynthesisError::Write { .. }));
        assert_eq!(fs::read_to_string(&blocker).expect("read"), "not a dir");
    }

    #[test]
    fn concurrent_writers_never_mix_contents() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("menu.json");
        let large = format!("[{}]", vec!["1"; 50_000].join(","));
        write_atomically(&path, b"[]").expect("seed");

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let path = path.clone();
                let large = large.clone();
                thread::spawn(move || {
                    let mut failures = 0;
                    let mut mixed = 0;
                    for round in 0..100 {
                        let body = if (worker + round) % 2 == 0 {
                            large.as_bytes()
                        } else {
                            b"[]".as_slice()
                        };
                        if write_atomically(&path, body).is_err() {
                            failures += 1;
                        }
                        let read = fs::read(&path).expect("read back");
                        if read != large.as_bytes() && read != b"[]" {
                            mixed += 1;
                        }
                    }
                    (failures, mixed)
                })
            })
            .collect();

        for worker in workers {
            assert_eq!(worker.join().expect("join"), (0, 0));
        }
        assert_eq!(file_names(dir.path()), vec!["menu.json"]);
    }
}
