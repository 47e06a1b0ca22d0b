#![allow(dead_code)]

// tests/common/mod.rs
use std::sync::Arc;
use std::time::SystemTime;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::HeaderName;
use actix_web::test;
use backend_test_support::unique_helpers::unique_str;
use serde_json::{json, Value};
use user_api::auth::password::PasswordHasher;
use user_api::services::users_memory::InMemoryUserService;
use user_api::{mint_access_token, AppState, IdentityClaims, SecurityConfig};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Argon2 with minimal cost so tests don't spend seconds hashing.
pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher::with_params(1024, 1, 1).expect("valid argon2 params")
}

/// A signing config with a secret no other test uses.
pub fn unique_security() -> SecurityConfig {
    SecurityConfig::new(unique_str("test-secret-for-jwt-signing").into_bytes())
}

/// State over a fresh in-memory store.
pub fn memory_state(security: SecurityConfig) -> AppState {
    AppState::new(
        Arc::new(InMemoryUserService::new(fast_hasher())),
        security,
    )
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Mint a token for an arbitrary identity issued at `now`.
pub fn token_for(sub: &str, user_name: &str, now: SystemTime, security: &SecurityConfig) -> String {
    let identity = IdentityClaims {
        sub: sub.to_string(),
        user_name: user_name.to_string(),
        email: None,
    };
    mint_access_token(&identity, now, security).expect("mint token")
}

pub fn registration(user_name: &str, password: &str) -> Value {
    json!({
        "userName": user_name,
        "password": password,
        "password2": password,
        "email": format!("{user_name}@example.test"),
    })
}

/// Register `user_name` and log in, returning the issued token.
pub async fn register_and_login<S, B>(app: &S, user_name: &str, password: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/user/register")
        .set_json(registration(user_name, password))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 200, "registration should succeed");

    let req = test::TestRequest::post()
        .uri("/user/login")
        .set_json(json!({ "userName": user_name, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 200, "login should succeed");

    let body: Value = test::read_body_json(resp).await;
    body["token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}

/// The `x-trace-id` header, which every response must carry.
pub fn trace_id_header<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(HeaderName::from_static("x-trace-id"))
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present")
        .to_string()
}
