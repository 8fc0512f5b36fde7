//! # IO Layer
//!
//! Interfaces through which a frontend reaches the domain layer. Currently
//! the REST API and its change event stream.

pub mod rest;
