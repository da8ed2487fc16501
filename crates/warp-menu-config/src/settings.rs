//! Process settings read once at startup.

use crate::ConfigError;
use log::info;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const NAMESPACE_ENV: &str = "WATCH_NAMESPACE";
const MENU_PATH_ENV: &str = "WARP_MENU_PATH";
const TARGET_NAME_ENV: &str = "WARP_TARGET_NAME";
const CONFIG_NAME_ENV: &str = "WARP_CONFIG_NAME";
const CONFIG_KEY_ENV: &str = "WARP_CONFIG_KEY";
const GLOBAL_CONFIG_NAME_ENV: &str = "GLOBAL_CONFIG_NAME";
const COMPONENT_PREFIX_ENV: &str = "COMPONENT_SPEC_PREFIX";
const WATCH_MODE_ENV: &str = "WARP_WATCH_MODE";
const POLL_INTERVAL_ENV: &str = "WARP_POLL_INTERVAL_MS";

/// Default location of the written menu.
pub const DEFAULT_MENU_PATH: &str = "/var/www/html/warp/menu.json";
/// Default resource events are recorded against.
pub const DEFAULT_TARGET_NAME: &str = "k8s-ces-assets-nginx";
/// Default name of the menu configuration resource.
pub const DEFAULT_CONFIG_NAME: &str = "k8s-ces-warp-config";
/// Default data key holding the aggregation config.
pub const DEFAULT_CONFIG_KEY: &str = "warp";
/// Default name of the global configuration resource.
pub const DEFAULT_GLOBAL_CONFIG_NAME: &str = "global-config";
/// Default name prefix of component descriptor resources.
pub const DEFAULT_COMPONENT_PREFIX: &str = "component-spec-";
const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// How resource change events are filtered before triggering a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchMode {
    /// Accept events for the watched resource names.
    #[default]
    Identity,
    /// Accept updates only when the decoded content field changed.
    Content,
}

impl FromStr for WatchMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "identity" => Ok(Self::Identity),
            "content" => Ok(Self::Content),
            other => Err(ConfigError::Invalid(format!(
                "{WATCH_MODE_ENV} must be identity or content, got {other:?}"
            ))),
        }
    }
}

/// Settings for one synthesizer process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Namespace whose resources are watched.
    pub namespace: String,
    /// File the menu is written to.
    pub menu_path: PathBuf,
    /// Resource that audit events are recorded against.
    pub target_name: String,
    /// Resource holding the aggregation config.
    pub config_name: String,
    /// Data key of the aggregation config inside its resource.
    pub config_key: String,
    pub global_config_name: String,
    pub component_prefix: String,
    pub watch_mode: WatchMode,
    /// Polling interval for stores that do not push changes.
    pub poll_interval: Duration,
}

impl Settings {
    /// Settings with defaults for the given namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            menu_path: PathBuf::from(DEFAULT_MENU_PATH),
            target_name: DEFAULT_TARGET_NAME.to_string(),
            config_name: DEFAULT_CONFIG_NAME.to_string(),
            config_key: DEFAULT_CONFIG_KEY.to_string(),
            global_config_name: DEFAULT_GLOBAL_CONFIG_NAME.to_string(),
            component_prefix: DEFAULT_COMPONENT_PREFIX.to_string(),
            watch_mode: WatchMode::default(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let namespace =
            non_empty(NAMESPACE_ENV).ok_or_else(|| ConfigError::MissingEnv(NAMESPACE_ENV.into()))?;
        info!("found target namespace: [{namespace}]");

        let mut settings = Self::new(namespace);
        if let Some(path) = non_empty(MENU_PATH_ENV) {
            settings.menu_path = PathBuf::from(path);
        }
        if let Some(name) = non_empty(TARGET_NAME_ENV) {
            settings.target_name = name;
        }
        if let Some(name) = non_empty(CONFIG_NAME_ENV) {
            settings.config_name = name;
        }
        if let Some(key) = non_empty(CONFIG_KEY_ENV) {
            settings.config_key = key;
        }
        if let Some(name) = non_empty(GLOBAL_CONFIG_NAME_ENV) {
            settings.global_config_name = name;
        }
        if let Some(prefix) = non_empty(COMPONENT_PREFIX_ENV) {
            settings.component_prefix = prefix;
        }
        if let Some(mode) = non_empty(WATCH_MODE_ENV) {
            settings.watch_mode = mode.parse()?;
        }
        if let Some(interval) = non_empty(POLL_INTERVAL_ENV) {
            let millis = interval.trim().parse::<u64>().map_err(|err| {
                ConfigError::Invalid(format!("{POLL_INTERVAL_ENV} must be milliseconds: {err}"))
            })?;
            if millis == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{POLL_INTERVAL_ENV} must be greater than zero"
                )));
            }
            settings.poll_interval = Duration::from_millis(millis);
        }
        Ok(settings)
    }
}
