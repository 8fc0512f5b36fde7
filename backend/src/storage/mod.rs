//! # Storage Layer
//!
//! Persistence for the baby tracker. The domain layer only sees the
//! repositories; the repositories only see [`KeyValueStore`].
//!
//! ## Backends
//!
//! - [`JsonFileStore`]: one `<key>.json` file per key in the data directory
//! - [`MemoryStore`]: in-process map for tests and throwaway sessions

pub mod json;
pub mod memory;
pub mod repositories;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use repositories::*;
pub use traits::KeyValueStore;
