use actix_web::web;

use crate::middleware::jwt_extract::JwtExtract;

pub mod health;
pub mod lists;
pub mod user;

/// Register every route. Shared by `main.rs` and the integration tests so
/// both exercise the same scopes and the same `JwtExtract` placement.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes);

    cfg.service(
        web::scope("/user")
            .service(
                web::scope("/favourites")
                    .wrap(JwtExtract)
                    .configure(lists::configure_favourites),
            )
            .service(
                web::scope("/history")
                    .wrap(JwtExtract)
                    .configure(lists::configure_history),
            )
            .configure(user::configure_routes),
    );
}
