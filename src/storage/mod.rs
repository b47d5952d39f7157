//! Durable key-value persistence: one JSON blob per key.

pub mod json_backend;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::StorageError;

pub use json_backend::{BackupInfo, JsonFileStore};
pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Key holding the serialized activity list.
pub const ACTIVITIES_KEY: &str = "ecoActivities";
/// Key holding the serialized goal list.
pub const GOALS_KEY: &str = "ecoGoals";

/// Abstraction over string-valued durable stores.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// Reads `key`, falling back to `default` when it is absent or cannot be parsed.
///
/// A failing read is returned as an error rather than masked by the default.
pub fn load<T>(store: &dyn KeyValueStore, key: &str, default: T) -> Result<T>
where
    T: DeserializeOwned,
{
    let Some(raw) = store.get_item(key)? else {
        tracing::debug!(key, "no stored value, using default");
        return Ok(default);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "stored value is unparseable, using default");
            Ok(default)
        }
    }
}

/// Serializes `value` and writes it under `key`.
pub fn save<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set_item(key, &json)?;
    tracing::debug!(key, bytes = json.len(), "stored value written");
    Ok(())
}
