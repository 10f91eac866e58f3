use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a genotype (clone) in the ancestry tree.
///
/// Genotype ids are keys of every per-timepoint table the layout engine
/// builds, so they are cloned constantly. Backed by `Arc<str>`, a clone is a
/// refcount bump. Hashes and compares like the underlying `str`, which lets
/// maps keyed by `GenotypeId` be queried with a plain `&str`.
#[derive(Debug, Clone, Eq)]
pub struct GenotypeId(Arc<str>);

impl GenotypeId {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for GenotypeId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl PartialEq<str> for GenotypeId {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for GenotypeId {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Ord for GenotypeId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for GenotypeId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::hash::Hash for GenotypeId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (*self.0).hash(state);
    }
}

impl std::ops::Deref for GenotypeId {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GenotypeId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for GenotypeId {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GenotypeId {
    #[inline]
    fn from(s: &str) -> Self {
        GenotypeId(Arc::from(s))
    }
}

impl From<String> for GenotypeId {
    #[inline]
    fn from(s: String) -> Self {
        GenotypeId(Arc::from(s))
    }
}

impl std::fmt::Display for GenotypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// Serialized as a bare string so ids read naturally in input documents.

impl Serialize for GenotypeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for GenotypeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(GenotypeId::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn clones_compare_equal() {
        let a = GenotypeId::from("clone_1");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a, "clone_1");
    }

    #[test]
    fn map_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(GenotypeId::from("A"), 0.4);
        assert_eq!(map.get("A"), Some(&0.4));

        let mut ordered = BTreeMap::new();
        ordered.insert(GenotypeId::from("B"), 1);
        ordered.insert(GenotypeId::from("A"), 2);
        let keys: Vec<_> = ordered.keys().map(GenotypeId::as_str).collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = GenotypeId::from("Sub\"clone");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""Sub\"clone""#);
        let back: GenotypeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
