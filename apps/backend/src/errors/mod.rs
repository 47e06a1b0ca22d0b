//! Error handling for the user API.

pub mod domain;

pub use domain::DomainError;
