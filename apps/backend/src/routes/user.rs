//! Unauthenticated credential endpoints: registration and login.

use std::time::SystemTime;

use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::info;

use crate::auth::claims::IdentityClaims;
use crate::auth::jwt::mint_access_token;
use crate::error::AppError;
use crate::extractors::validated_json::ValidatedJson;
use crate::logging::security;
use crate::services::users::{LoginUser, RegisterUser};
use crate::state::app_state::AppState;

pub const LOGIN_SUCCESSFUL: &str = "login successful";

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    message: &'static str,
    token: String,
}

/// POST /user/register. Never issues a token.
async fn register(
    payload: ValidatedJson<RegisterUser>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let user_name = payload.user_name.clone();

    let message = app_state.users.register_user(payload).await.map_err(|e| {
        security::registration_rejected(&user_name, &e.client_message());
        AppError::credential_rejected(e)
    })?;

    Ok(HttpResponse::Ok().json(MessageResponse { message }))
}

/// POST /user/login. Mints a token bound to the identity the user service
/// returns; the request body only selects which credentials to check.
async fn login(
    payload: ValidatedJson<LoginUser>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let user_name = payload.user_name.clone();

    let identity = app_state.users.check_user(payload).await.map_err(|e| {
        security::login_failed(&user_name);
        AppError::credential_rejected(e)
    })?;

    let claims = IdentityClaims::from(identity);
    let token = mint_access_token(&claims, SystemTime::now(), &app_state.security)?;
    info!(user_id = %claims.sub, "login succeeded");

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: LOGIN_SUCCESSFUL,
        token,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login));
}
