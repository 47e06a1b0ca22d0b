use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::errors::domain::DomainError;
use crate::trace_ctx;

/// Body for errors reported under a `message` key.
#[derive(Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

/// Body for collaborator failures on authorized requests, reported under `error`.
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// No bearer token on a protected request.
    #[error("Missing token")]
    MissingToken,
    /// Bearer token present but its signature, structure or expiry is bad.
    #[error("Invalid token")]
    InvalidToken,
    /// Registration or login refused by the user service.
    #[error("Credential rejected: {message}")]
    CredentialRejected { message: String },
    /// User service failure on an otherwise authorized request.
    #[error("Downstream failure: {message}")]
    DownstreamFailure { message: String },
    #[error("Bad request: {detail}")]
    BadRequest { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

/// Shown to clients in place of internal error details.
const INTERNAL_MESSAGE: &str = "Internal server error";

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::CredentialRejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DownstreamFailure { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn missing_token() -> Self {
        Self::MissingToken
    }

    pub fn invalid_token() -> Self {
        Self::InvalidToken
    }

    /// Registration/login failure. The user service's message is passed through.
    pub fn credential_rejected(err: DomainError) -> Self {
        Self::CredentialRejected {
            message: err.client_message(),
        }
    }

    /// Favourites/history failure. The user service's message is passed through.
    pub fn downstream(err: DomainError) -> Self {
        Self::DownstreamFailure {
            message: err.client_message(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::internal(format!("db error: {e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let trace_id = trace_ctx::trace_id();

        let mut builder = HttpResponse::build(status);
        builder.insert_header(("x-trace-id", trace_id.clone()));

        match self {
            AppError::MissingToken | AppError::InvalidToken => builder.json(MessageBody {
                message: &self.to_string(),
            }),
            AppError::CredentialRejected { message } => builder.json(MessageBody { message }),
            AppError::DownstreamFailure { message } => builder.json(ErrorBody { error: message }),
            AppError::BadRequest { detail } => builder.json(MessageBody { message: detail }),
            AppError::Internal { detail } | AppError::Config { detail } => {
                error!(trace_id = %trace_id, detail = %detail, "internal error");
                builder.json(MessageBody {
                    message: INTERNAL_MESSAGE,
                })
            }
        }
    }
}
