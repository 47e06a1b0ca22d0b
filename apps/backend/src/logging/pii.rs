//! Redaction for values that end up in log lines.
//!
//! Emails keep their first character and domain; anything that looks like a
//! bearer token, password hash or other opaque credential is replaced
//! wholesale.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

const TOKEN_PLACEHOLDER: &str = "[REDACTED_TOKEN]";

#[allow(clippy::unwrap_used)]
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]+\b").unwrap());

// JWTs (three base64url segments) go first so their dots don't split them
// into separately-matched pieces.
#[allow(clippy::unwrap_used)]
static JWT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\b").unwrap()
});

#[allow(clippy::unwrap_used)]
static PHC_HASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$argon2[a-z]*\$\S+").unwrap());

#[allow(clippy::unwrap_used)]
static OPAQUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z0-9+/]{32,}={0,2}").unwrap());

/// Mask emails and credential-looking runs in `input`.
pub fn redact(input: &str) -> String {
    let masked = EMAIL.replace_all(input, |caps: &regex::Captures| {
        let email = &caps[0];
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() => {
                format!("{}***@{domain}", &local[..1])
            }
            _ => email.to_string(),
        }
    });
    let masked = PHC_HASH.replace_all(&masked, TOKEN_PLACEHOLDER);
    let masked = JWT.replace_all(&masked, TOKEN_PLACEHOLDER);
    OPAQUE.replace_all(&masked, TOKEN_PLACEHOLDER).into_owned()
}

/// Display wrapper that redacts on format, for use as a tracing field value.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
