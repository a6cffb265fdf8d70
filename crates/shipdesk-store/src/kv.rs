//! The storage port.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::database::Database;
use crate::error::Result;
use crate::memory::MemoryStore;

/// Opaque string key/value storage, semantically a browser `localStorage`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Backend chosen at runtime (e.g. from configuration).
#[derive(Clone)]
pub enum StoreBackend {
    Memory(MemoryStore),
    Sqlite(Arc<Database>),
}

impl KeyValueStore for StoreBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            Self::Memory(s) => s.get(key),
            Self::Sqlite(s) => s.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Self::Memory(s) => s.set(key, value),
            Self::Sqlite(s) => s.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self {
            Self::Memory(s) => s.remove(key),
            Self::Sqlite(s) => s.remove(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_helpers() {
        let store = MemoryStore::new();
        store.set_json("ids", &vec!["b2b", "b2c"]).unwrap();
        let ids: Option<Vec<String>> = store.get_json("ids").unwrap();
        assert_eq!(ids, Some(vec!["b2b".to_string(), "b2c".to_string()]));

        let missing: Option<Vec<String>> = store.get_json("nope").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_corrupt_json_is_an_error() {
        let store = MemoryStore::new();
        store.set("ids", "[not json").unwrap();
        assert!(store.get_json::<Vec<String>>("ids").is_err());
    }

    #[test]
    fn test_arc_forwards() {
        let store = Arc::new(MemoryStore::new());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }
}
