//! Persistent settings store.
//!
//! Values are JSON so the "remember me" flag and the account strings share
//! one store. [`MemoryStore`] backs native builds and tests; [`LocalStore`]
//! persists to the browser's localStorage.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::core::error::StoreError;

/// JSON-valued key/value store.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&mut self, key: &str, value: &Value) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// All keys, sorted.
    fn keys(&self) -> Vec<String>;

    /// String setting; absent for non-string values.
    fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean setting; `false` when absent or not a boolean.
    fn get_flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Bool(true)))
    }
}

/// In-memory store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

#[cfg(target_arch = "wasm32")]
mod local {
    use serde_json::Value;

    use super::SettingsStore;
    use crate::core::error::StoreError;
    use crate::utils::dom;

    /// localStorage-backed store with JSON-encoded values.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct LocalStore;

    impl SettingsStore for LocalStore {
        fn get(&self, key: &str) -> Option<Value> {
            let storage = dom::local_storage()?;
            let json = storage.get_item(key).ok()??;
            serde_json::from_str(&json).ok()
        }

        fn set(&mut self, key: &str, value: &Value) -> Result<(), StoreError> {
            let storage = dom::local_storage().ok_or(StoreError::StorageUnavailable)?;
            let json = serde_json::to_string(value).map_err(|_| StoreError::SerializationFailed)?;
            storage
                .set_item(key, &json)
                .map_err(|_| StoreError::WriteFailed)
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            let storage = dom::local_storage().ok_or(StoreError::StorageUnavailable)?;
            storage
                .remove_item(key)
                .map_err(|_| StoreError::RemoveFailed)
        }

        fn keys(&self) -> Vec<String> {
            let Some(storage) = dom::local_storage() else {
                return Vec::new();
            };
            let len = storage.length().unwrap_or(0);
            let mut keys: Vec<String> = (0..len)
                .filter_map(|i| storage.key(i).ok().flatten())
                .collect();
            keys.sort();
            keys
        }
    }
}
