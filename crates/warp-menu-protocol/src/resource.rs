//! Watched resources and the change notifications emitted for them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A named bag of string data, the unit a [`crate::ResourceStore`] holds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl Resource {
    /// Create an empty resource with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the namespace.
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Insert a data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Look up a data entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Identity of this resource.
    pub fn reference(&self) -> ResourceRef {
        ResourceRef {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
        }
    }
}

/// Identity of a resource, used as reconcile input and event target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResourceRef {
    pub namespace: String,
    pub name: String,
}

impl ResourceRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

/// Kind of change observed on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
    /// Out-of-band notification not tied to a state transition.
    Generic,
}

/// One change notification.
///
/// `old` is set for update and delete, `new` for create and update. Generic
/// events carry the object in `new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub old: Option<Resource>,
    pub new: Option<Resource>,
}

impl ChangeEvent {
    pub fn create(resource: Resource) -> Self {
        Self {
            kind: ChangeKind::Create,
            old: None,
            new: Some(resource),
        }
    }

    pub fn update(old: Resource, new: Resource) -> Self {
        Self {
            kind: ChangeKind::Update,
            old: Some(old),
            new: Some(new),
        }
    }

    pub fn delete(resource: Resource) -> Self {
        Self {
            kind: ChangeKind::Delete,
            old: Some(resource),
            new: None,
        }
    }

    pub fn generic(resource: Resource) -> Self {
        Self {
            kind: ChangeKind::Generic,
            old: None,
            new: Some(resource),
        }
    }

    /// The object whose identity describes this event.
    ///
    /// Updates are identified by their old object.
    pub fn subject(&self) -> Option<&Resource> {
        match self.kind {
            ChangeKind::Update | ChangeKind::Delete => self.old.as_ref().or(self.new.as_ref()),
            ChangeKind::Create | ChangeKind::Generic => self.new.as_ref().or(self.old.as_ref()),
        }
    }

    /// Name of the subject, if any.
    pub fn name(&self) -> Option<&str> {
        self.subject().map(|resource| resource.name.as_str())
    }
}
