use std::process::ExitCode;

use actix_web::{web, App, HttpServer};
use tracing::{error, info};
use user_api::config::AppConfig;
use user_api::extractors::validated_json::JsonBodyLimit;
use user_api::infra::state::build_state;
use user_api::middleware::{
    cors_middleware, RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan,
};
use user_api::{routes, telemetry};

#[actix_web::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let security = match config.security() {
        Ok(security) => security,
        Err(e) => {
            error!(error = %e, "invalid security configuration");
            return ExitCode::FAILURE;
        }
    };

    // A database that cannot be reached or migrated is fatal
    let app_state = match build_state()
        .with_security(security)
        .with_database_url(config.database_url.clone())
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            return ExitCode::FAILURE;
        }
    };

    let data = web::Data::new(app_state);
    let body_limit = web::Data::new(JsonBodyLimit(config.max_json_payload_size));
    let origins = config.cors_allowed_origins.clone();

    info!(
        host = %config.host,
        port = config.port,
        app_env = config.runtime_env.as_str(),
        "starting user-api"
    );

    let server = HttpServer::new(move || {
        // Registration order is innermost first; RequestTrace ends up outermost.
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .app_data(body_limit.clone())
            .configure(routes::configure)
    })
    .workers(num_cpus::get())
    .bind((config.host.as_str(), config.port));

    let server = match server {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, host = %config.host, port = config.port, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    match server.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server terminated with an error");
            ExitCode::FAILURE
        }
    }
}
