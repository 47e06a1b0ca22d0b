mod common;
mod support;

use actix_web::test;
use common::{memory_state, trace_id_header, unique_security};
use support::create_test_app;

#[actix_web::test]
async fn health_endpoint_is_open_and_uncached() {
    let app = create_test_app(memory_state(unique_security()))
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    assert!(!trace_id_header(&resp).is_empty());

    let headers = resp.headers();
    assert_eq!(headers.get("cache-control").unwrap(), "no-store");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");

    let body = test::read_body(resp).await;
    assert_eq!(body, "ok");
}

#[actix_web::test]
async fn every_response_gets_a_fresh_trace_id() {
    let app = create_test_app(memory_state(unique_security()))
        .with_prod_routes()
        .build()
        .await;

    let first = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    let second = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

    assert_ne!(trace_id_header(&first), trace_id_header(&second));
}

#[actix_web::test]
async fn rejection_trace_id_matches_the_request() {
    let app = create_test_app(memory_state(unique_security()))
        .with_prod_routes()
        .build()
        .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/user/favourites").to_request(),
    )
    .await;

    assert_eq!(resp.status().as_u16(), 401);
    // Error rendering and RequestTrace agree on the id
    let all: Vec<_> = resp.headers().get_all("x-trace-id").collect();
    assert_eq!(all.len(), 1);
    assert_ne!(all[0], "unknown");
}
