//! Directory-backed resource store.
//!
//! Each resource is a `<name>.yaml` file holding a flat string map. Watches
//! poll the directory and diff consecutive snapshots.

use super::diff_snapshots;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use warp_menu_protocol::{ChangeEvent, Resource, ResourceStore, StoreError, WatchStream};

const RESOURCE_EXTENSION: &str = "yaml";

/// Resource store over a directory of YAML files.
#[derive(Debug, Clone)]
pub struct DirectoryResourceStore {
    root: PathBuf,
    namespace: String,
    poll_interval: Duration,
}

impl DirectoryResourceStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn new(
        root: impl AsRef<Path>,
        namespace: impl Into<String>,
        poll_interval: Duration,
    ) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        info!("initialized directory resource store (root={})", root.display());
        Ok(Self {
            root,
            namespace: namespace.into(),
            poll_interval,
        })
    }

    fn resource_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{RESOURCE_EXTENSION}"))
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        self.root.join(format!(".{name}.{RESOURCE_EXTENSION}.tmp"))
    }

    /// Write a resource file, replacing any previous content.
    pub fn put(&self, resource: &Resource) -> Result<(), StoreError> {
        let contents = serde_yaml::to_string(&resource.data)
            .map_err(|err| StoreError::decode(&resource.name, err))?;
        let temp = self.temp_path(&resource.name);
        fs::write(&temp, contents)?;
        fs::rename(&temp, self.resource_path(&resource.name))?;
        debug!("resource file written (name={})", resource.name);
        Ok(())
    }

    /// Remove a resource file. Returns false when it did not exist.
    pub fn remove(&self, name: &str) -> Result<bool, StoreError> {
        match fs::remove_file(self.resource_path(name)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn read_resource(&self, name: &str, path: &Path) -> Result<Resource, StoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        let data: Option<BTreeMap<String, String>> =
            serde_yaml::from_str(&contents).map_err(|err| StoreError::decode(name, err))?;
        Ok(Resource {
            name: name.to_string(),
            namespace: self.namespace.clone(),
            data: data.unwrap_or_default(),
        })
    }

    /// Read every decodable resource. Undecodable files are skipped.
    fn snapshot(&self) -> Result<BTreeMap<String, Resource>, StoreError> {
        let mut resources = BTreeMap::new();
        for dir_entry in fs::read_dir(&self.root)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RESOURCE_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            match self.read_resource(name, &path) {
                Ok(resource) => {
                    resources.insert(name.to_string(), resource);
                }
                Err(StoreError::NotFound(_)) => {}
                Err(err) => warn!("skipping unreadable resource file {}: {err}", path.display()),
            }
        }
        Ok(resources)
    }
}

#[async_trait]
impl ResourceStore for DirectoryResourceStore {
    async fn get(&self, name: &str) -> Result<Resource, StoreError> {
        self.read_resource(name, &self.resource_path(name))
    }

    async fn list(&self) -> Result<Vec<Resource>, StoreError> {
        Ok(self.snapshot()?.into_values().collect())
    }

    async fn watch(&self) -> Result<WatchStream<ChangeEvent>, StoreError> {
        let mut previous = self.snapshot()?;
        let (sender, receiver) = mpsc::unbounded_channel();
        let store = self.clone();
        debug!(
            "starting directory poll watch (root={}, interval={:?})",
            store.root.display(),
            store.poll_interval
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(store.poll_interval);
            interval.tick().await;
            loop {
                interval.tick().await;
                if sender.is_closed() {
                    debug!("directory watch receiver dropped (root={})", store.root.display());
                    return;
                }
                let current = match store.snapshot() {
                    Ok(current) => current,
                    Err(err) => {
                        if sender.send(Err(err)).is_err() {
                            return;
                        }
                        continue;
                    }
                };
                for event in diff_snapshots(&previous, &current) {
                    if sender.send(Ok(event)).is_err() {
                        return;
                    }
                }
                previous = current;
            }
        });

        Ok(receiver)
    }
}
