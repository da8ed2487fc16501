//! Flattened view of the global key/value configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Global configuration as `/`-joined keys mapped to string values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalConfig {
    entries: BTreeMap<String, String>,
}

impl GlobalConfig {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Fetch a single value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// All entries in key order.
    pub fn get_all(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Entries strictly nested below `prefix`.
    ///
    /// A trailing `/` on the prefix is ignored and the prefix key itself is
    /// never returned.
    pub fn children(&self, prefix: &str) -> BTreeMap<String, String> {
        let prefix = prefix.trim_end_matches('/');
        self.entries
            .iter()
            .filter(|(key, _)| is_child_key(key, prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for GlobalConfig {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

fn is_child_key(key: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return !key.is_empty();
    }
    key.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|rest| !rest.is_empty())
}

#[cfg(test)]
mod tests {
    use super::GlobalConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn children_excludes_the_prefix_key_itself() {
        let config: GlobalConfig = [
            ("externals", "root"),
            ("externals/a", "1"),
            ("externals/b/c", "2"),
            ("externalsX/d", "3"),
            ("other", "4"),
        ]
        .into_iter()
        .collect();

        let children = config.children("externals/");
        assert_eq!(
            children.keys().cloned().collect::<Vec<_>>(),
            vec!["externals/a".to_string(), "externals/b/c".to_string()]
        );
    }
}
