mod common;
mod support;

use std::sync::Arc;
use std::time::SystemTime;

use actix_web::test;
use async_trait::async_trait;
use backend_test_support::unique_helpers::unique_user_name;
use common::{bearer, memory_state, register_and_login, token_for, unique_security};
use parking_lot::Mutex;
use serde_json::{json, Value};
use support::create_test_app;
use user_api::services::users::{LoginUser, RegisterUser, UserIdentity, UserList, UserService};
use user_api::{AppState, DomainError};

/// Records the subject id of every list call, and the named operation the
/// handler went through, and otherwise succeeds.
#[derive(Default)]
struct RecordingUserService {
    calls: Mutex<Vec<(String, UserList, Option<String>)>>,
    operations: Mutex<Vec<&'static str>>,
}

#[async_trait]
impl UserService for RecordingUserService {
    async fn register_user(&self, _payload: RegisterUser) -> Result<String, DomainError> {
        Err(DomainError::validation("not supported"))
    }

    async fn check_user(&self, _payload: LoginUser) -> Result<UserIdentity, DomainError> {
        Err(DomainError::validation("not supported"))
    }

    async fn list_items(&self, user_id: &str, list: UserList) -> Result<Vec<String>, DomainError> {
        self.calls.lock().push((user_id.to_string(), list, None));
        Ok(Vec::new())
    }

    async fn add_item(
        &self,
        user_id: &str,
        list: UserList,
        item_id: &str,
    ) -> Result<Vec<String>, DomainError> {
        self.calls
            .lock()
            .push((user_id.to_string(), list, Some(item_id.to_string())));
        Ok(vec![item_id.to_string()])
    }

    async fn remove_item(
        &self,
        user_id: &str,
        list: UserList,
        item_id: &str,
    ) -> Result<Vec<String>, DomainError> {
        self.calls
            .lock()
            .push((user_id.to_string(), list, Some(item_id.to_string())));
        Ok(Vec::new())
    }

    async fn get_favourites(&self, user_id: &str) -> Result<Vec<String>, DomainError> {
        self.operations.lock().push("get_favourites");
        self.list_items(user_id, UserList::Favourites).await
    }

    async fn add_favourite(&self, user_id: &str, item_id: &str) -> Result<Vec<String>, DomainError> {
        self.operations.lock().push("add_favourite");
        self.add_item(user_id, UserList::Favourites, item_id).await
    }

    async fn remove_favourite(
        &self,
        user_id: &str,
        item_id: &str,
    ) -> Result<Vec<String>, DomainError> {
        self.operations.lock().push("remove_favourite");
        self.remove_item(user_id, UserList::Favourites, item_id).await
    }

    async fn get_history(&self, user_id: &str) -> Result<Vec<String>, DomainError> {
        self.operations.lock().push("get_history");
        self.list_items(user_id, UserList::History).await
    }

    async fn add_history(&self, user_id: &str, item_id: &str) -> Result<Vec<String>, DomainError> {
        self.operations.lock().push("add_history");
        self.add_item(user_id, UserList::History, item_id).await
    }

    async fn remove_history(&self, user_id: &str, item_id: &str) -> Result<Vec<String>, DomainError> {
        self.operations.lock().push("remove_history");
        self.remove_item(user_id, UserList::History, item_id).await
    }
}

#[actix_web::test]
async fn history_round_trip() {
    let app = create_test_app(memory_state(unique_security()))
        .with_prod_routes()
        .build()
        .await;
    let token = register_and_login(&app, &unique_user_name("ida"), "pw").await;

    for (id, expected) in [("a", json!(["a"])), ("b", json!(["a", "b"]))] {
        let req = test::TestRequest::put()
            .uri(&format!("/user/history/{id}"))
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, expected);
    }

    let req = test::TestRequest::delete()
        .uri("/user/history/a")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!(["b"]));
}

#[actix_web::test]
async fn lists_of_different_users_do_not_mix() {
    let app = create_test_app(memory_state(unique_security()))
        .with_prod_routes()
        .build()
        .await;
    let jan = register_and_login(&app, &unique_user_name("jan"), "pw").await;
    let kim = register_and_login(&app, &unique_user_name("kim"), "pw").await;

    let req = test::TestRequest::put()
        .uri("/user/history/secret-item")
        .insert_header(bearer(&jan))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);

    let req = test::TestRequest::get()
        .uri("/user/history")
        .insert_header(bearer(&kim))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn subject_id_comes_only_from_the_token() {
    let security = unique_security();
    let recorder = Arc::new(RecordingUserService::default());
    let state = AppState::new(recorder.clone(), security.clone());
    let app = create_test_app(state).with_prod_routes().build().await;

    let token = token_for("subject-from-token", "lee", SystemTime::now(), &security);

    // Client-supplied identity hints are ignored
    let requests = [
        test::TestRequest::put()
            .uri("/user/history/99?userId=someone-else")
            .insert_header(bearer(&token))
            .insert_header(("X-User-Id", "someone-else"))
            .to_request(),
        test::TestRequest::delete()
            .uri("/user/favourites/99")
            .insert_header(bearer(&token))
            .set_json(json!({ "sub": "someone-else" }))
            .to_request(),
        test::TestRequest::get()
            .uri("/user/history")
            .insert_header(bearer(&token))
            .to_request(),
    ];
    for req in requests {
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);
    }

    let calls = recorder.calls.lock().clone();
    assert_eq!(
        calls,
        vec![
            ("subject-from-token".to_string(), UserList::History, Some("99".to_string())),
            ("subject-from-token".to_string(), UserList::Favourites, Some("99".to_string())),
            ("subject-from-token".to_string(), UserList::History, None),
        ]
    );
}

#[actix_web::test]
async fn each_route_calls_its_named_operation() {
    let security = unique_security();
    let recorder = Arc::new(RecordingUserService::default());
    let state = AppState::new(recorder.clone(), security.clone());
    let app = create_test_app(state).with_prod_routes().build().await;
    let token = token_for("subject-1", "max", SystemTime::now(), &security);

    let requests = [
        test::TestRequest::get().uri("/user/favourites"),
        test::TestRequest::put().uri("/user/favourites/1"),
        test::TestRequest::delete().uri("/user/favourites/1"),
        test::TestRequest::get().uri("/user/history"),
        test::TestRequest::put().uri("/user/history/1"),
        test::TestRequest::delete().uri("/user/history/1"),
    ];
    for req in requests {
        let req = req.insert_header(bearer(&token)).to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);
    }

    assert_eq!(
        *recorder.operations.lock(),
        vec![
            "get_favourites",
            "add_favourite",
            "remove_favourite",
            "get_history",
            "add_history",
            "remove_history",
        ]
    );
}

#[actix_web::test]
async fn rejected_requests_never_reach_the_user_service() {
    let recorder = Arc::new(RecordingUserService::default());
    let state = AppState::new(recorder.clone(), unique_security());
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::put().uri("/user/history/1").to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 401);

    let req = test::TestRequest::put()
        .uri("/user/history/1")
        .insert_header(bearer("abc.def.ghi"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 403);

    assert!(recorder.calls.lock().is_empty());
}
