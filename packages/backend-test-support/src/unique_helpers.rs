//! Test helpers for generating unique test data
//!
//! Registered user names must be unique per store, so tests that share a
//! store (or a database) derive their identifiers from ULIDs.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("user");
/// let id2 = unique_str("user");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("user-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique user name with the given prefix.
///
/// Lower-cased so it is stable across stores that compare case-sensitively.
pub fn unique_user_name(prefix: &str) -> String {
    unique_str(prefix).to_lowercase()
}
