//! Domain-level error type returned by the user service.
//!
//! This error type is HTTP- and DB-agnostic. Handlers decide how a
//! `DomainError` is reported (`AppError::credential_rejected` for the login
//! flow, `AppError::downstream` for list operations).

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    PasswordHashing,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    UniqueUserName,
    Other(String),
}

/// Message shown to clients for any infrastructure failure.
pub const INFRA_CLIENT_MESSAGE: &str = "Unable to process request";

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input validation or business rule violation (includes rejected logins)
    Validation(String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing user or resource
    NotFound(String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(d) => write!(f, "validation error: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(d) => write!(f, "not found: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound(detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    /// The message a client is allowed to see.
    ///
    /// Business rejections carry their own message; infrastructure failures
    /// are replaced by [`INFRA_CLIENT_MESSAGE`].
    pub fn client_message(&self) -> String {
        match self {
            DomainError::Validation(d) | DomainError::Conflict(_, d) | DomainError::NotFound(d) => {
                d.clone()
            }
            DomainError::Infra(..) => INFRA_CLIENT_MESSAGE.to_string(),
        }
    }
}
