//! Argon2id password hashing for the user stores.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use once_cell::sync::OnceCell;
use tracing::warn;

use crate::errors::domain::{DomainError, InfraErrorKind};

/// Hashes and verifies passwords as PHC strings.
///
/// Verification reads the parameters out of the stored hash, so hashes
/// produced under different settings keep verifying after a change.
///
/// Clones share the dummy hash and the verification counter.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: Arc<OnceCell<String>>,
    verifications: Arc<AtomicU64>,
}

const DUMMY_PASSWORD: &str = "no-such-user-placeholder-password";

impl PasswordHasher {
    /// Argon2id with explicit cost parameters (memory in KiB).
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, DomainError> {
        let params = Params::new(m_cost, t_cost, p_cost, None).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::PasswordHashing,
                format!("invalid argon2 params: {e}"),
            )
        })?;
        Ok(Self::from_argon2(Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            params,
        )))
    }

    fn from_argon2(argon2: Argon2<'static>) -> Self {
        Self {
            argon2,
            dummy_hash: Arc::new(OnceCell::new()),
            verifications: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| {
                DomainError::infra(
                    InfraErrorKind::PasswordHashing,
                    format!("password hashing failed: {e}"),
                )
            })
    }

    /// False for a wrong password and for an unparseable stored hash.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        self.verifications.fetch_add(1, Ordering::Relaxed);
        PasswordHash::new(stored_hash)
            .map(|parsed| {
                self.argon2
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Hash on the blocking pool; argon2 is deliberately slow.
    pub async fn hash_blocking(&self, password: String) -> Result<String, DomainError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                DomainError::infra(
                    InfraErrorKind::PasswordHashing,
                    format!("hashing task failed: {e}"),
                )
            })?
    }

    /// Verify on the blocking pool.
    pub async fn verify_blocking(&self, password: String, stored_hash: String) -> bool {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .unwrap_or(false)
    }

    /// Spend the same work as [`verify_blocking`](Self::verify_blocking) for a
    /// login whose user name does not exist. Always false.
    pub async fn verify_missing_user_blocking(&self, password: String) -> bool {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || {
            let dummy = hasher.dummy_hash();
            hasher.verify(&password, dummy);
            false
        })
        .await
        .unwrap_or(false)
    }

    /// A hash of a fixed password under this hasher's parameters, built once.
    fn dummy_hash(&self) -> &str {
        self.dummy_hash.get_or_init(|| {
            self.hash(DUMMY_PASSWORD).unwrap_or_else(|e| {
                warn!(error = %e, "could not build dummy password hash");
                String::new()
            })
        })
    }

    /// Number of password verifications run by this hasher and its clones.
    pub fn verification_count(&self) -> u64 {
        self.verifications.load(Ordering::Relaxed)
    }
}

impl Default for PasswordHasher {
    /// Argon2id with the crate's recommended default parameters.
    fn default() -> Self {
        Self::from_argon2(Argon2::default())
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}
