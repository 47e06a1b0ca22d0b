use std::ops::{Deref, DerefMut};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Error as JsonError;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Body size cap used when no [`JsonBodyLimit`] is registered.
pub const DEFAULT_JSON_BODY_LIMIT: usize = 16 * 1024;

/// Maximum accepted JSON body size, registered as app data.
#[derive(Debug, Clone, Copy)]
pub struct JsonBodyLimit(pub usize);

impl Default for JsonBodyLimit {
    fn default() -> Self {
        Self(DEFAULT_JSON_BODY_LIMIT)
    }
}

/// JSON body extractor whose failures are reported as 400 `{message}` with a
/// sanitized description rather than actix's default plain-text error.
///
/// An empty body, or one sent with a non-JSON content type, reads as `{}`, so
/// payloads with defaulted fields reach the handler and get the user
/// service's own rejection.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for ValidatedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let mut payload = payload.take();
        let json_content = is_json_content_type(req.content_type());
        let limit = req
            .app_data::<web::Data<JsonBodyLimit>>()
            .map(|l| l.0)
            .unwrap_or(DEFAULT_JSON_BODY_LIMIT);

        Box::pin(async move {
            let trace_id = trace_ctx::trace_id();

            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    warn!(trace_id = %trace_id, error = %e, "Failed to read request body chunk");
                    AppError::bad_request("Failed to read request body")
                })?;
                if body.len() + chunk.len() > limit {
                    return Err(AppError::bad_request(format!(
                        "Request body exceeds {limit} bytes"
                    )));
                }
                body.extend_from_slice(&chunk);
            }

            let source: &[u8] = if json_content && !body.iter().all(u8::is_ascii_whitespace) {
                &body
            } else {
                b"{}"
            };

            let parsed = serde_json::from_slice::<T>(source).map_err(|e| {
                debug!(
                    trace_id = %trace_id,
                    error = %Redacted(&e.to_string()),
                    body_size = body.len(),
                    "JSON parsing failed"
                );
                AppError::bad_request(classify_json_error(&e))
            })?;

            Ok(ValidatedJson(parsed))
        })
    }
}

/// Missing content types count as JSON; anything else must name JSON.
fn is_json_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.is_empty() || content_type == "application/json" || content_type.ends_with("+json")
}

/// Sanitized description of a serde_json failure; never echoes body content.
fn classify_json_error(error: &JsonError) -> String {
    match error.classify() {
        serde_json::error::Category::Syntax => {
            format!("Invalid JSON at line {}", error.line())
        }
        serde_json::error::Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        serde_json::error::Category::Data => {
            "Invalid JSON: wrong types for one or more fields".to_string()
        }
        serde_json::error::Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}
