//! Shared helpers for the HTTP API integration tests.
//!
//! Each test builds the full application over in-memory adapters, so the
//! suite runs without a database or writable media directory.
#![allow(dead_code)]

use actix_http::Request;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web};
use serde_json::{Value, json};

use recipe_backend::inbound::http::health::HealthState;
use recipe_backend::inbound::http::state::HttpState;
use recipe_backend::server::{AppDependencies, build_app};

pub fn test_deps() -> AppDependencies {
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(HttpState::in_memory()),
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

pub async fn test_app() -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>
{
    test::init_service(build_app(test_deps())).await
}

fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Register an account and log in, returning the session cookie.
pub async fn register_and_login<S>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "email": email, "name": "Cook", "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 201, "registration failed");

    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200, "login failed");
    session_cookie(&res)
}

/// Create a recipe via the API and return its response body.
pub async fn create_recipe<S>(app: &S, cookie: &Cookie<'static>, body: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/recipes")
            .cookie(cookie.clone())
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 201, "recipe creation failed");
    test::read_body_json(res).await
}

/// Minimal valid recipe payload builder.
pub fn recipe_payload(title: &str) -> Value {
    json!({
        "title": title,
        "time_minutes": 22,
        "price": "5.25",
    })
}

/// A 1x1 PNG produced through the image crate.
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::new(1, 1);
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .expect("encode png");
    bytes
}
