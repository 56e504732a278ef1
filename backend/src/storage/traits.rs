//! # Storage Traits
//!
//! Abstraction over the key/value store backing user preferences so the
//! domain services can run against memory in tests and a file in production.

use anyhow::Result;

/// Trait defining the interface for string key/value preference storage
pub trait PreferenceStorage: Send + Sync {
    /// Get the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}
