//! # Storage Traits
//!
//! The persistence adapter the domain layer is written against. Values are
//! opaque byte blobs addressed by a string key; the repositories decide how
//! to encode them.

use anyhow::Result;
use async_trait::async_trait;

/// Key-value blob storage
///
/// Implementations must make a completed `set` visible to every later `get`
/// on the same key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
