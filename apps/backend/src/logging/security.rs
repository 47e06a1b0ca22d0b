//! Security audit events.
//!
//! Each helper emits one `warn!` with a stable `event` name so alerts can key
//! on it. Credentials and tokens are never passed in; user names go through
//! [`Redacted`].

use tracing::warn;

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// A login attempt was rejected.
pub fn login_failed(user_name: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        user_name = %Redacted(user_name),
        "Authentication failure"
    );
}

/// A protected route received a token that failed verification.
pub fn token_rejected(reason: &str, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        reason,
        path,
        "Bearer token rejected"
    );
}

/// A registration was refused (validation or duplicate user name).
pub fn registration_rejected(user_name: &str, reason: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_REGISTRATION_REJECTED",
        %trace_id,
        user_name = %Redacted(user_name),
        reason,
        "Registration rejected"
    );
}
