//! Deduplicated style warnings.
//!
//! Stylesheets are re-applied on every cascade pass and on every pointer
//! event, so the same unsupported pseudo-class or unknown function would
//! otherwise be reported over and over. Each unique message is emitted once
//! through `tracing::warn!`.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported feature (emitted once per unique message).
///
/// Returns `true` when the message had not been seen before and was emitted.
///
/// # Example
/// ```
/// use quokka_common::warning::warn_once;
///
/// let _ = warn_once("pseudo", "':visited' is not implemented");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let first = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first {
        tracing::warn!(target: "quokka", component, "{message}");
    }
    first
}
