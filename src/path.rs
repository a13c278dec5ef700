//! Addressable paths from a forest root to a result node

use crate::result::ResultNode;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered mapping of path key to node identity.
///
/// Keys are node features. When a feature repeats along one path (nested
/// conditions, for example) later occurrences get `#2`, `#3`, ... suffixes so
/// every key stays unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResultPath {
    entries: Vec<(String, Option<String>)>,
}

impl ResultPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, identity)` pairs, root first
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(key, identity)| (key.as_str(), identity.as_deref()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Identity stored under exactly `key`
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, identity)| identity.as_deref())
    }

    /// Identity stored under `key`, comparing keys case-insensitively
    pub fn get_ignore_case(&self, key: &str) -> Option<Option<&str>> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| k.to_lowercase() == key)
            .map(|(_, identity)| identity.as_deref())
    }

    /// Append a node, suffixing the key with the first unused `#N` if the
    /// feature already appears on this path. Returns the key that was used.
    pub fn push(&mut self, feature: &str, identity: Option<&str>) -> &str {
        let key = if self.contains_key(feature) {
            (2..)
                .map(|n| format!("{}#{}", feature, n))
                .find(|candidate| !self.contains_key(candidate))
                .unwrap_or_else(|| feature.to_string())
        } else {
            feature.to_string()
        };

        self.entries.push((key, identity.map(str::to_string)));
        &self.entries[self.entries.len() - 1].0
    }

    /// Copy of this path with one more node appended
    pub fn extended(&self, feature: &str, identity: Option<&str>) -> Self {
        let mut path = self.clone();
        path.push(feature, identity);
        path
    }

    /// Set a key verbatim, replacing any existing entry with the same key.
    ///
    /// Used to build lookup paths for [`crate::ResultsExplorer::get_by_path`].
    pub fn with(mut self, key: &str, identity: Option<&str>) -> Self {
        let identity = identity.map(str::to_string);
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = identity,
            None => self.entries.push((key.to_string(), identity)),
        }
        self
    }
}

impl fmt::Display for ResultPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, identity)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " > ")?;
            }
            match identity {
                Some(identity) => write!(f, "{}: {}", key, identity)?,
                None => write!(f, "{}", key)?,
            }
        }
        Ok(())
    }
}

/// Parses `Key=identity,Key#2=identity,Key` (a bare key has no identity)
impl std::str::FromStr for ResultPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut path = ResultPath::new();
        for segment in s.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, identity) = match segment.split_once('=') {
                Some((key, identity)) => (key.trim(), Some(identity.trim())),
                None => (segment, None),
            };
            if key.is_empty() {
                return Err(format!("Empty key in path segment: {}", segment));
            }
            if path.contains_key(key) {
                return Err(format!("Duplicate path key: {}", key));
            }
            path = path.with(key, identity);
        }
        Ok(path)
    }
}

impl Serialize for ResultPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, identity) in &self.entries {
            map.serialize_entry(key, identity)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResultPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PathVisitor;

        impl<'de> Visitor<'de> for PathVisitor {
            type Value = ResultPath;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of path keys to identities")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut path = ResultPath::new();
                while let Some((key, identity)) = access.next_entry::<String, Option<String>>()? {
                    path = path.with(&key, identity.as_deref());
                }
                Ok(path)
            }
        }

        deserializer.deserialize_map(PathVisitor)
    }
}

/// A matched node together with the path that reaches it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathedResult<'a> {
    pub path: ResultPath,
    pub result: &'a ResultNode,
}

impl<'a> PathedResult<'a> {
    pub fn new(path: ResultPath, result: &'a ResultNode) -> Self {
        Self { path, result }
    }
}
