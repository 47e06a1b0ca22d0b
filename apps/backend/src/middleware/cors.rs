use actix_cors::Cors;
use actix_web::http::header;

/// CORS for the configured browser origins.
///
/// Only the methods and headers the API actually uses are allowed; the trace
/// id header is exposed so clients can quote it in bug reports.
pub fn cors_middleware(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::HeaderName::from_static("x-trace-id")])
        .max_age(3600);

    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
