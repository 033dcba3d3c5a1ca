//! Shared utilities for modorder.
//!
//! This crate provides cross-cutting concerns used by all other modorder crates:
//! the unified error type, filesystem helpers, and terminal status lines.

pub mod errors;
pub mod fs;
pub mod progress;
