//! Account registration, login, and profile management over HTTP.

mod common;

use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use common::{register_and_login, test_app};

#[actix_rt::test]
async fn registration_returns_account_without_credentials() {
    let app = test_app().await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({
                "email": "cook@example.com",
                "name": "Cook",
                "password": "stove-top",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status().as_u16(), 201);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["email"], "cook@example.com");
    assert_eq!(body["name"], "Cook");
    assert!(body["id"].as_str().is_some());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[actix_rt::test]
async fn registration_lowercases_the_email_domain() {
    let app = test_app().await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({
                "email": "Cook@EXAMPLE.com",
                "name": "Cook",
                "password": "stove-top",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status().as_u16(), 201);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["email"], "Cook@example.com");
}

#[rstest]
#[case(json!({"email": "", "name": "Cook", "password": "stove-top"}))]
#[case(json!({"email": "not-an-email", "name": "Cook", "password": "stove-top"}))]
#[case(json!({"email": "cook@example.com", "name": "", "password": "stove-top"}))]
#[case(json!({"email": "cook@example.com", "name": "Cook", "password": "pw"}))]
#[actix_rt::test]
async fn invalid_registration_payloads_are_rejected(#[case] payload: Value) {
    let app = test_app().await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status().as_u16(), 400);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}

#[actix_rt::test]
async fn duplicate_email_registration_is_rejected() {
    let app = test_app().await;
    register_and_login(&app, "cook@example.com", "stove-top").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({
                "email": "cook@example.com",
                "name": "Another cook",
                "password": "stove-top",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status().as_u16(), 400);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "email");
}

#[rstest]
#[case("cook@example.com", "wrong-password")]
#[case("nobody@example.com", "stove-top")]
#[actix_rt::test]
async fn failed_logins_share_one_message(#[case] email: &str, #[case] password: &str) {
    let app = test_app().await;
    register_and_login(&app, "cook@example.com", "stove-top").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status().as_u16(), 401);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "invalid credentials");
}

#[actix_rt::test]
async fn profile_requires_a_session() {
    let app = test_app().await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/users/me").to_request(),
    )
    .await;

    assert_eq!(res.status().as_u16(), 401);
}

#[actix_rt::test]
async fn session_cookie_unlocks_the_profile() {
    let app = test_app().await;
    let cookie = register_and_login(&app, "cook@example.com", "stove-top").await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status().as_u16(), 200);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["email"], "cook@example.com");
    assert_eq!(body["name"], "Cook");
}

#[actix_rt::test]
async fn profile_patch_updates_name_and_password() {
    let app = test_app().await;
    let cookie = register_and_login(&app, "cook@example.com", "stove-top").await;

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .set_json(json!({ "name": "Head chef", "password": "mise-en-place" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status().as_u16(), 200);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "Head chef");
    assert_eq!(body["email"], "cook@example.com");

    // The new password works, the old one no longer does.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": "cook@example.com", "password": "stove-top" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 401);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": "cook@example.com", "password": "mise-en-place" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);
}

#[actix_rt::test]
async fn profile_patch_rejects_a_short_password() {
    let app = test_app().await;
    let cookie = register_and_login(&app, "cook@example.com", "stove-top").await;

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .set_json(json!({ "password": "pw" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status().as_u16(), 400);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "password");
}
