//! Bearer-token authentication for the per-user list scopes.
//!
//! Verifies the `Authorization: Bearer <token>` header and stores the token's
//! [`IdentityClaims`] in request extensions for [`CurrentUser`] to pick up.
//! Rejections are rendered here: 401 when no token is presented, 403 when a
//! token is presented but fails verification (bad signature, expired, or not
//! a JWT at all).
//!
//! [`CurrentUser`]: crate::extractors::current_user::CurrentUser

use std::time::SystemTime;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderValue};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::claims::IdentityClaims;
use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::logging::security;
use crate::state::app_state::AppState;

pub struct JwtExtract;

impl<S, B> Transform<S, ServiceRequest> for JwtExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtExtractMiddleware { service }))
    }
}

pub struct JwtExtractMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for JwtExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req) {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                let res = req.error_response(err).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}

fn authenticate(req: &ServiceRequest) -> Result<IdentityClaims, AppError> {
    let path = req.path();

    let Some(token) = bearer_token(req.headers().get(header::AUTHORIZATION)) else {
        security::token_rejected("missing", path);
        return Err(AppError::missing_token());
    };

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not configured"))?;

    verify_access_token(token, SystemTime::now(), &state.security)
        .map(|claims| claims.identity)
        .map_err(|e| {
            security::token_rejected(e.reason(), path);
            AppError::invalid_token()
        })
}

/// The token from a `Bearer <token>` header, or `None` when the header is
/// absent, unreadable, uses another scheme, or carries no token.
fn bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    let raw = value?.to_str().ok()?;
    let (scheme, token) = raw.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
