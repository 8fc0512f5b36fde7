//! # JSON Storage Module
//!
//! File-backed implementation of [`KeyValueStore`](crate::storage::KeyValueStore).
//! Each key maps to a `<key>.json` file in the data directory.

pub mod connection;

pub use connection::JsonFileStore;
