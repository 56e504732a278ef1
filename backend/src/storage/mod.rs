//! # Storage Module
//!
//! Client-side style persistence for the few values that survive a restart:
//! the serialized chat history, the user's default city and the signed-in
//! session. Everything else (appointments, carnets, notifications) lives in
//! service memory only.
//!
//! Values are plain strings under well-known keys. Reads of malformed content
//! never fail a caller: [`load_json`] logs and falls back to `None`.

pub mod traits;
pub mod memory;
pub mod json_file;

pub use traits::PreferenceStorage;
pub use memory::MemoryPreferenceStore;
pub use json_file::JsonFilePreferenceStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// Serialized chat history (JSON array of messages)
pub const CHAT_HISTORY_KEY: &str = "medipass_chat_history";
/// Default city chosen during a carnet purchase
pub const DEFAULT_CITY_KEY: &str = "defaultCity";
/// Signed-in user
pub const AUTH_SESSION_KEY: &str = "auth-storage";

/// Read and deserialize a JSON value, swallowing storage and parse failures.
pub fn load_json<T: DeserializeOwned>(storage: &dyn PreferenceStorage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("Failed to read stored value {}: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed stored value {}: {}", key, e);
            None
        }
    }
}

/// Serialize a value as JSON and store it under `key`.
pub fn save_json<T: Serialize>(
    storage: &dyn PreferenceStorage,
    key: &str,
    value: &T,
) -> anyhow::Result<()> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json_round_trip() {
        let store = MemoryPreferenceStore::new();
        save_json(&store, "numbers", &vec![1, 2, 3]).unwrap();
        let loaded: Option<Vec<u32>> = load_json(&store, "numbers");
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_load_json_ignores_malformed_content() {
        let store = MemoryPreferenceStore::new();
        store.set(CHAT_HISTORY_KEY, "{not json").unwrap();
        let loaded: Option<Vec<String>> = load_json(&store, CHAT_HISTORY_KEY);
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_json_missing_key() {
        let store = MemoryPreferenceStore::new();
        let loaded: Option<String> = load_json(&store, "absent");
        assert!(loaded.is_none());
    }
}
