//! Access log for the user API.
//!
//! One `request_completed` event per request with `http.method`, `url.path`,
//! `http.status_code`, `duration_us` and `trace_id`. Requests that passed
//! `JwtExtract` also carry `user_id`, the token subject; user names and
//! tokens are never logged here. 5xx log at error, 4xx (token rejections and
//! user service refusals) at warn, the rest at info.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use crate::auth::claims::IdentityClaims;
use crate::trace_ctx::TraceId;

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

/// What the access log records about one finished request.
struct Completed {
    method: String,
    path: String,
    trace_id: String,
    user_id: Option<String>,
    status: StatusCode,
    duration_us: u64,
}

impl Completed {
    fn emit(&self) {
        let status_code = self.status.as_u16();
        let user_id = self.user_id.as_deref().unwrap_or("-");

        macro_rules! completed {
            ($level:ident) => {
                $level!(
                    http.method = %self.method,
                    url.path = %self.path,
                    http.status_code = status_code,
                    duration_us = self.duration_us,
                    trace_id = %self.trace_id,
                    user_id,
                    "request_completed"
                )
            };
        }

        if self.status.is_server_error() {
            completed!(error);
        } else if self.status.is_client_error() {
            completed!(warn);
        } else {
            completed!(info);
        }
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(|t| t.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let (status, user_id) = match &result {
                Ok(res) => (
                    res.status(),
                    res.request()
                        .extensions()
                        .get::<IdentityClaims>()
                        .map(|claims| claims.sub.clone()),
                ),
                Err(err) => (err.as_response_error().status_code(), None),
            };

            Completed {
                method,
                path,
                trace_id,
                user_id,
                status,
                duration_us: start.elapsed().as_micros() as u64,
            }
            .emit();

            result
        })
    }
}
