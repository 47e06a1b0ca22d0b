use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::auth::claims::IdentityClaims;
use crate::error::AppError;

/// The authenticated caller.
///
/// Only available on routes wrapped in `JwtExtract`, which stores the verified
/// claims in request extensions. Everything a handler does on the caller's
/// behalf is scoped by [`CurrentUser::sub`]; path and body never name the
/// user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub IdentityClaims);

impl CurrentUser {
    /// Subject id of the verified token.
    pub fn sub(&self) -> &str {
        &self.0.sub
    }

    pub fn user_name(&self) -> &str {
        &self.0.user_name
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<IdentityClaims>()
                .cloned()
                .map(CurrentUser)
                .ok_or_else(AppError::missing_token),
        )
    }
}
