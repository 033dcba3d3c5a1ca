//! Core data types for modorder.
//!
//! This crate defines the fundamental types the load-order resolver works
//! over: packages and natives, their ordering constraints, the identifier
//! normalization used at every API boundary, the on-disk profile document,
//! the external mod registry, scan results, and launcher configuration.
//!
//! This crate is intentionally free of ordering logic; see `modorder-resolver`.

pub mod config;
pub mod entity;
pub mod key;
pub mod profile;
pub mod registry;
pub mod scan;
