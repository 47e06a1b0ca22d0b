//! Repository functions for the SQL-backed user store.
//!
//! Everything here is generic over `ConnectionTrait` so callers can pass a
//! pooled connection or an open transaction, and returns `DomainError`.

pub mod user_lists;
pub mod users;
