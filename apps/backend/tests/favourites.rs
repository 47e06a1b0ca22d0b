mod common;
mod support;

use std::time::SystemTime;

use actix_web::test;
use backend_test_support::unique_helpers::unique_user_name;
use common::{bearer, memory_state, register_and_login, token_for, unique_security};
use serde_json::{json, Value};
use support::create_test_app;

#[actix_web::test]
async fn favourites_round_trip() {
    let app = create_test_app(memory_state(unique_security()))
        .with_prod_routes()
        .build()
        .await;
    let token = register_and_login(&app, &unique_user_name("fay"), "pw").await;

    let steps: [(&str, &str, Value); 5] = [
        ("PUT", "/user/favourites/42", json!(["42"])),
        ("PUT", "/user/favourites/7", json!(["42", "7"])),
        // Adding an id twice leaves the list unchanged
        ("PUT", "/user/favourites/42", json!(["42", "7"])),
        ("DELETE", "/user/favourites/42", json!(["7"])),
        // Removing an absent id is not an error
        ("DELETE", "/user/favourites/42", json!(["7"])),
    ];

    for (method, uri, expected) in steps {
        let req = match method {
            "PUT" => test::TestRequest::put(),
            _ => test::TestRequest::delete(),
        }
        .uri(uri)
        .insert_header(bearer(&token))
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200, "{method} {uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, expected, "{method} {uri}");
    }

    let req = test::TestRequest::get()
        .uri("/user/favourites")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!(["7"]));
}

#[actix_web::test]
async fn favourites_and_history_are_separate_lists() {
    let app = create_test_app(memory_state(unique_security()))
        .with_prod_routes()
        .build()
        .await;
    let token = register_and_login(&app, &unique_user_name("gus"), "pw").await;

    let req = test::TestRequest::put()
        .uri("/user/favourites/1")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);

    let req = test::TestRequest::get()
        .uri("/user/history")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn valid_token_for_unknown_subject_is_422_error() {
    let security = unique_security();
    let app = create_test_app(memory_state(security.clone()))
        .with_prod_routes()
        .build()
        .await;

    // Correctly signed, but no such user in this store
    let token = token_for("ghost-id", "ghost", SystemTime::now(), &security);

    let req = test::TestRequest::get()
        .uri("/user/favourites")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Unable to find user with id: ghost-id" }));
}

#[actix_web::test]
async fn full_list_rejects_new_ids() {
    let security = unique_security();
    let app = create_test_app(memory_state(security.clone()))
        .with_prod_routes()
        .build()
        .await;
    let token = register_and_login(&app, &unique_user_name("hal"), "pw").await;
    let sub = user_api::verify_access_token(&token, SystemTime::now(), &security)
        .unwrap()
        .identity
        .sub;

    for i in 0..50 {
        let req = test::TestRequest::put()
            .uri(&format!("/user/favourites/{i}"))
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);
    }

    let req = test::TestRequest::put()
        .uri("/user/favourites/overflow")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "error": format!("Unable to update favourites for user with id: {sub}") })
    );
}
