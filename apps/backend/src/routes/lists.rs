//! Identity-scoped favourites and history endpoints.
//!
//! Mounted behind `JwtExtract`. The subject id always comes from the verified
//! token via [`CurrentUser`]; the path only ever names the item.

use actix_web::{web, HttpResponse};
use tracing::debug;

use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::extractors::current_user::CurrentUser;
use crate::state::app_state::AppState;

/// The updated list as a JSON array, or the user service's message under `error`.
fn list_response(result: Result<Vec<String>, DomainError>) -> Result<HttpResponse, AppError> {
    result
        .map(|items| HttpResponse::Ok().json(items))
        .map_err(AppError::downstream)
}

async fn get_favourites(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    debug!(user_id = user.sub(), "reading favourites");
    list_response(app_state.users.get_favourites(user.sub()).await)
}

async fn add_favourite(
    user: CurrentUser,
    item_id: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    debug!(user_id = user.sub(), item_id = %item_id, "adding favourite");
    list_response(app_state.users.add_favourite(user.sub(), &item_id).await)
}

async fn remove_favourite(
    user: CurrentUser,
    item_id: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    debug!(user_id = user.sub(), item_id = %item_id, "removing favourite");
    list_response(app_state.users.remove_favourite(user.sub(), &item_id).await)
}

async fn get_history(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    debug!(user_id = user.sub(), "reading history");
    list_response(app_state.users.get_history(user.sub()).await)
}

async fn add_history(
    user: CurrentUser,
    item_id: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    debug!(user_id = user.sub(), item_id = %item_id, "adding history entry");
    list_response(app_state.users.add_history(user.sub(), &item_id).await)
}

async fn remove_history(
    user: CurrentUser,
    item_id: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    debug!(user_id = user.sub(), item_id = %item_id, "removing history entry");
    list_response(app_state.users.remove_history(user.sub(), &item_id).await)
}

pub fn configure_favourites(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(get_favourites))
        .route("/{id}", web::put().to(add_favourite))
        .route("/{id}", web::delete().to(remove_favourite));
}

pub fn configure_history(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(get_history))
        .route("/{id}", web::put().to(add_history))
        .route("/{id}", web::delete().to(remove_history));
}
