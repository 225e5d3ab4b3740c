mod test_utils;

use actix_web::{
    http::{header, StatusCode},
    test::{self, TestRequest},
};
use contact_backend::entities::csrf::CsrfTokenResponse;
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn issues_token_in_body_and_cookie() {
    let app = TestApp::new();
    let service = app.service().await;

    let req = TestRequest::get().uri("/api/csrf-token").to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("csrf cookie is set")
        .to_str()
        .unwrap()
        .to_string();
    for attribute in ["HttpOnly", "Secure", "SameSite=Strict", "Path=/", "Max-Age=3600"] {
        assert!(set_cookie.contains(attribute), "missing {attribute} in {set_cookie}");
    }
    assert_eq!(resp.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");

    let body: CsrfTokenResponse = test::read_body_json(resp).await;
    assert_eq!(body.token.len(), 64);
    assert!(body.token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert!(set_cookie.starts_with(&format!("csrf-token={}", body.token)));
}

#[actix_rt::test]
async fn each_request_gets_a_fresh_token() {
    let app = TestApp::new();
    let service = app.service().await;

    let first: CsrfTokenResponse = test::call_and_read_body_json(
        &service,
        TestRequest::get().uri("/api/csrf-token").to_request(),
    )
    .await;
    let second: CsrfTokenResponse = test::call_and_read_body_json(
        &service,
        TestRequest::get().uri("/api/csrf-token").to_request(),
    )
    .await;

    assert_ne!(first.token, second.token);
}

#[actix_rt::test]
async fn non_get_method_is_not_allowed() {
    let app = TestApp::new();
    let service = app.service().await;

    let req = TestRequest::post().uri("/api/csrf-token").to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers().get(header::ALLOW).unwrap(), "GET");
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
}

#[actix_rt::test]
async fn issued_token_authorizes_a_submission() {
    let app = TestApp::new();
    let service = app.service().await;

    let issued: CsrfTokenResponse = test::call_and_read_body_json(
        &service,
        TestRequest::get().uri("/api/csrf-token").to_request(),
    )
    .await;

    let req = TestRequest::post()
        .uri("/api/contact")
        .insert_header(("cookie", format!("csrf-token={}", issued.token)))
        .insert_header(("x-csrf-token", issued.token.clone()))
        .set_json(json!({ "email": "visitor@example.org", "message": "Hello there" }))
        .to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(app.stored().len(), 1);
}

#[actix_rt::test]
async fn health_reports_persistence_backend() {
    let app = TestApp::new();
    let service = app.service().await;

    let body: Value = test::call_and_read_body_json(
        &service,
        TestRequest::get().uri("/health").to_request(),
    )
    .await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["persistence"], "memory: OK");
}
