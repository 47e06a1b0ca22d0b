use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use tracing::warn;

use crate::config::app::RuntimeEnv;
use crate::error::AppError;

/// Signing secret used when `JWT_SECRET` is unset outside production.
pub const FALLBACK_JWT_SECRET: &str = "super-secret-key";

/// Secrets shorter than this log a weak-secret warning (HS256 key size).
pub const MIN_RECOMMENDED_SECRET_LEN: usize = 32;

/// Configuration for JWT security settings
#[derive(Clone)]
pub struct SecurityConfig {
    /// JWT secret key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm to use (defaults to HS256)
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
        }
    }

    /// Resolve the signing secret for `env`.
    ///
    /// A missing secret is fatal in production. Elsewhere it is logged as a
    /// misconfiguration and the fallback secret is used.
    pub fn resolve(secret: Option<&str>, env: RuntimeEnv) -> Result<Self, AppError> {
        let secret = match secret.map(str::trim).filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None if env == RuntimeEnv::Prod => {
                return Err(AppError::config(
                    "JWT_SECRET must be set when APP_ENV=prod",
                ));
            }
            None => {
                warn!(
                    event = "SECURITY_MISCONFIGURATION",
                    app_env = env.as_str(),
                    "JWT_SECRET is not set; signing tokens with the built-in fallback secret"
                );
                FALLBACK_JWT_SECRET
            }
        };

        if secret.len() < MIN_RECOMMENDED_SECRET_LEN && secret != FALLBACK_JWT_SECRET {
            warn!(
                event = "SECURITY_WEAK_SECRET",
                length = secret.len(),
                recommended = MIN_RECOMMENDED_SECRET_LEN,
                "JWT_SECRET is shorter than recommended"
            );
        }

        Ok(Self::new(secret.as_bytes()))
    }

    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.jwt_secret)
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.jwt_secret)
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
