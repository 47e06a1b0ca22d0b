use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::claims::IdentityClaims;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Access tokens live for one hour from issuance.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Claims included in our access tokens.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: IdentityClaims,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Why a token failed verification.
///
/// The HTTP layer collapses all of these into a single 403; the distinction
/// only shows up in security logs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is not a decodable JWT")]
    Malformed,
}

impl TokenError {
    /// Stable reason string for log events.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Expired => "expired",
            TokenError::Malformed => "malformed",
        }
    }
}

fn unix_secs(now: SystemTime) -> Option<i64> {
    now.duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs() as i64)
}

/// Mint a signed access token for `identity`, valid for [`ACCESS_TOKEN_TTL_SECS`] from `now`.
pub fn mint_access_token(
    identity: &IdentityClaims,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = unix_secs(now)
        .ok_or_else(|| AppError::internal("Failed to get current time".to_string()))?;

    let claims = Claims {
        identity: identity.clone(),
        iat,
        exp: iat + ACCESS_TOKEN_TTL_SECS,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &security.encoding_key(),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify a token as of `now` and return its claims.
///
/// Expiry is decided before the signature is checked, so a token past its
/// `exp` reports [`TokenError::Expired`] whichever key signed it. A token is
/// expired once `now >= exp`; no leeway is applied.
pub fn verify_access_token(
    token: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<Claims, TokenError> {
    let key = security.decoding_key();

    // Structural decode only, to read `exp`.
    let mut unverified = Validation::new(security.algorithm);
    unverified.insecure_disable_signature_validation();
    unverified.validate_exp = false;

    let claims = decode::<Claims>(token, &key, &unverified)
        .map_err(|_| TokenError::Malformed)?
        .claims;

    let now_secs = unix_secs(now).unwrap_or(0);
    if now_secs >= claims.exp {
        return Err(TokenError::Expired);
    }

    // Expiry handled above against the caller's clock.
    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = false;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            _ => TokenError::Malformed,
        })
}
