//! Long-running watch loops that re-synthesize the menu on change.
//!
//! Every watch domain runs as its own task reading its own channel, so
//! notifications are handled in arrival order per domain only. All tasks stop
//! once the shutdown flag flips to `true` or its sender is dropped.

use crate::error::WatchError;
use crate::predicates::ChangePredicate;
use crate::readers::remove_legacy_prefix;
use crate::synthesis::Synthesizer;
use futures_util::future::join_all;
use log::{debug, error, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use warp_menu_config::{AggregationConfig, SourceKind};
use warp_menu_protocol::{
    ChangeEvent, CurrentVersionsChange, GlobalConfigChange, ResourceRef, StoreError, WatchStream,
};

/// Runs the initial pass and the watch tasks for one synthesizer.
#[derive(Clone)]
pub struct MenuWatcher {
    synthesizer: Synthesizer,
    predicate: ChangePredicate,
}

impl MenuWatcher {
    /// Create a watcher using the predicate selected by the settings.
    pub fn new(synthesizer: Synthesizer) -> Self {
        let predicate = ChangePredicate::from_settings(synthesizer.settings());
        Self {
            synthesizer,
            predicate,
        }
    }

    pub fn with_predicate(mut self, predicate: ChangePredicate) -> Self {
        self.predicate = predicate;
        self
    }

    /// Synthesize once, then watch every domain until shutdown.
    ///
    /// Fails only when a watch cannot be opened; pass failures are logged.
    pub async fn run(&self, shutdown: watch::Receiver<bool>) -> Result<(), WatchError> {
        if let Err(err) = self.synthesizer.run_once().await {
            error!("initial warp menu synthesis failed: {err}");
        }

        let mut tasks = WatchTasks::default();
        let config = self.load_config().await;

        if config.as_ref().is_some_and(|config| config.has_source(&SourceKind::Components)) {
            let stream = self
                .synthesizer
                .readers()
                .versions
                .watch_all_current()
                .await
                .map_err(|err| subscribe_error("component versions", err))?;
            tasks.0.push(self.spawn(
                "component versions".to_string(),
                stream,
                shutdown.clone(),
                |change: &CurrentVersionsChange| {
                    debug!(
                        "current version changed (component={}, previous={:?}, current={:?})",
                        change.component, change.previous, change.current
                    );
                    Some(None)
                },
            ));
        }

        let externals = config
            .iter()
            .flat_map(|config| config.sources.iter())
            .filter(|source| source.kind == SourceKind::Externals);
        for source in externals {
            let prefix = remove_legacy_prefix(&source.path).to_string();
            let domain = format!("global config {prefix}");
            let stream = self
                .synthesizer
                .readers()
                .global_config
                .watch(&prefix)
                .await
                .map_err(|err| subscribe_error(&domain, err))?;
            tasks.0.push(self.spawn(
                domain,
                stream,
                shutdown.clone(),
                |_: &GlobalConfigChange| Some(None),
            ));
        }

        let stream = self
            .synthesizer
            .store()
            .watch()
            .await
            .map_err(|err| subscribe_error("resource events", err))?;
        let predicate = self.predicate.clone();
        tasks.0.push(self.spawn(
            "resource events".to_string(),
            stream,
            shutdown,
            move |event: &ChangeEvent| {
                if !predicate.accepts(event) {
                    return None;
                }
                Some(event.subject().map(|resource| resource.reference()))
            },
        ));

        info!("warp menu watches started (tasks={})", tasks.0.len());
        let handles = std::mem::take(&mut tasks.0);
        for result in join_all(handles).await {
            if let Err(err) = result {
                error!("watch task ended abnormally: {err}");
            }
        }
        info!("warp menu watches stopped");
        Ok(())
    }

    /// Load the config that decides which domains to watch.
    ///
    /// When it cannot be loaded only resource events are watched; a later
    /// config change still triggers passes through them.
    async fn load_config(&self) -> Option<AggregationConfig> {
        let settings = self.synthesizer.settings();
        let loaded = match self.synthesizer.store().get(&settings.config_name).await {
            Ok(resource) => AggregationConfig::from_resource(&resource, &settings.config_key)
                .map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };
        match loaded {
            Ok(config) => Some(config),
            Err(err) => {
                warn!(
                    "menu config unavailable, watching resource events only (name={}): {err}",
                    settings.config_name
                );
                None
            }
        }
    }

    /// Spawn a task running a pass for every item `trigger` maps to `Some`.
    ///
    /// `Some(Some(resource))` reconciles for that resource, `Some(None)` runs
    /// a plain pass.
    fn spawn<T, F>(
        &self,
        domain: String,
        mut stream: WatchStream<T>,
        mut shutdown: watch::Receiver<bool>,
        mut trigger: F,
    ) -> JoinHandle<()>
    where
        T: Send + 'static,
        F: FnMut(&T) -> Option<Option<ResourceRef>> + Send + 'static,
    {
        let synthesizer = self.synthesizer.clone();
        tokio::spawn(async move {
            debug!("watch task started (domain={domain})");
            loop {
                if *shutdown.borrow() {
                    info!("shutdown requested, stopping watch (domain={domain})");
                    return;
                }
                tokio::select! {
                    biased;
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            info!("shutdown sender dropped, stopping watch (domain={domain})");
                            return;
                        }
                    }
                    item = stream.recv() => match item {
                        None => {
                            info!("watch channel closed, stopping watch (domain={domain})");
                            return;
                        }
                        Some(Err(err)) => {
                            error!("watch channel reported an error (domain={domain}): {err}");
                        }
                        Some(Ok(value)) => {
                            let Some(resource) = trigger(&value) else {
                                continue;
                            };
                            let result = match resource {
                                Some(resource) => synthesizer.reconcile(&resource).await,
                                None => synthesizer.run_once().await.map(|_| ()),
                            };
                            if let Err(err) = result {
                                error!("failed to update warp menu (domain={domain}): {err}");
                            }
                        }
                    }
                }
            }
        })
    }
}

/// Spawned watch tasks, aborted if dropped before being joined.
#[derive(Default)]
struct WatchTasks(Vec<JoinHandle<()>>);

impl Drop for WatchTasks {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

fn subscribe_error(domain: &str, source: StoreError) -> WatchError {
    WatchError::Subscribe {
        domain: domain.to_string(),
        source,
    }
}
