//! Identity claims embedded in every access token.

use serde::{Deserialize, Serialize};

/// Who the bearer of a token is.
///
/// Built from the user service's identity at login, embedded in the token,
/// and inserted into request extensions by `JwtExtract` once the token has
/// been verified. Never constructed from client-supplied request data.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    /// Subject id (the user's stable id in the user service)
    pub sub: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
