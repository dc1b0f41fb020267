//! Common utilities for the Quokka style engine.
//!
//! This crate provides shared infrastructure used by the style crates and the CLI:
//! - **Warning System** - deduplicated warnings for unsupported stylesheet features
//! - **Logging** - `tracing` subscriber installation for binaries and tests

pub mod logging;
pub mod warning;
