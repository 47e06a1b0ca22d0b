//! Backend test support utilities
//!
//! Shared helpers for the backend's integration tests: unified logging
//! initialization and generators for unique test identifiers.

pub mod logging;
pub mod unique_helpers;
