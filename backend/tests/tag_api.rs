//! Tag CRUD, ordering, and the assigned-only filter over HTTP.

mod common;

use actix_web::test;
use serde_json::{Value, json};

use common::{create_recipe, recipe_payload, register_and_login, test_app};

#[actix_rt::test]
async fn tags_require_a_session() {
    let app = test_app().await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/tags").to_request(),
    )
    .await;

    assert_eq!(res.status().as_u16(), 401);
}

#[actix_rt::test]
async fn tags_list_in_descending_name_order() {
    let app = test_app().await;
    let cookie = register_and_login(&app, "cook@example.com", "stove-top").await;

    for name in ["Breakfast", "Vegan", "Dessert"] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/tags")
                .cookie(cookie.clone())
                .set_json(json!({ "name": name }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status().as_u16(), 201);
    }

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/tags")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);

    let body: Value = test::read_body_json(res).await;
    let names: Vec<&str> = body
        .as_array()
        .expect("tag array")
        .iter()
        .map(|tag| tag["name"].as_str().expect("tag name"))
        .collect();
    assert_eq!(names, vec!["Vegan", "Dessert", "Breakfast"]);
}

#[actix_rt::test]
async fn blank_tag_names_are_rejected() {
    let app = test_app().await;
    let cookie = register_and_login(&app, "cook@example.com", "stove-top").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/tags")
            .cookie(cookie)
            .set_json(json!({ "name": "   " }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status().as_u16(), 400);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "name");
}

#[actix_rt::test]
async fn assigned_only_returns_tags_attached_to_recipes() {
    let app = test_app().await;
    let cookie = register_and_login(&app, "cook@example.com", "stove-top").await;

    let mut payload = recipe_payload("Pancakes");
    payload["tags"] = json!([{ "name": "Breakfast" }]);
    create_recipe(&app, &cookie, payload).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/tags")
            .cookie(cookie.clone())
            .set_json(json!({ "name": "Unused" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 201);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/tags?assigned_only=1")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);

    let body: Value = test::read_body_json(res).await;
    let names: Vec<&str> = body
        .as_array()
        .expect("tag array")
        .iter()
        .map(|tag| tag["name"].as_str().expect("tag name"))
        .collect();
    assert_eq!(names, vec!["Breakfast"]);
}

#[actix_rt::test]
async fn tag_detail_returns_the_owned_tag() {
    let app = test_app().await;
    let cookie = register_and_login(&app, "cook@example.com", "stove-top").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/tags")
            .cookie(cookie.clone())
            .set_json(json!({ "name": "Dessert" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 201);
    let created: Value = test::read_body_json(res).await;
    let id = created["id"].as_str().expect("tag id").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/tags/{id}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["id"].as_str(), Some(id.as_str()));
    assert_eq!(body["name"], "Dessert");

    let absent = uuid::Uuid::new_v4();
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/tags/{absent}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 404);
}

#[actix_rt::test]
async fn assigned_only_lists_a_shared_tag_once() {
    let app = test_app().await;
    let cookie = register_and_login(&app, "cook@example.com", "stove-top").await;

    for title in ["Pancakes", "Porridge"] {
        let mut payload = recipe_payload(title);
        payload["tags"] = json!([{ "name": "Breakfast" }]);
        create_recipe(&app, &cookie, payload).await;
    }

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/tags?assigned_only=1")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["name"], "Breakfast");
}

#[actix_rt::test]
async fn assigned_only_rejects_unknown_values() {
    let app = test_app().await;
    let cookie = register_and_login(&app, "cook@example.com", "stove-top").await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/tags?assigned_only=yes")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status().as_u16(), 400);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "assigned_only");
}

#[actix_rt::test]
async fn tags_can_be_renamed_and_deleted() {
    let app = test_app().await;
    let cookie = register_and_login(&app, "cook@example.com", "stove-top").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/tags")
            .cookie(cookie.clone())
            .set_json(json!({ "name": "Desert" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 201);
    let created: Value = test::read_body_json(res).await;
    let id = created["id"].as_str().expect("tag id").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/tags/{id}"))
            .cookie(cookie.clone())
            .set_json(json!({ "name": "Dessert" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);
    let renamed: Value = test::read_body_json(res).await;
    assert_eq!(renamed["name"], "Dessert");
    assert_eq!(renamed["id"].as_str(), Some(id.as_str()));

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/tags/{id}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 204);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/tags")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[actix_rt::test]
async fn other_users_tags_are_invisible() {
    let app = test_app().await;
    let owner = register_and_login(&app, "owner@example.com", "stove-top").await;
    let intruder = register_and_login(&app, "intruder@example.com", "stove-top").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/tags")
            .cookie(owner.clone())
            .set_json(json!({ "name": "Private" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 201);
    let created: Value = test::read_body_json(res).await;
    let id = created["id"].as_str().expect("tag id").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/tags")
            .cookie(intruder.clone())
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/tags/{id}"))
            .cookie(intruder.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 404);

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/tags/{id}"))
            .cookie(intruder.clone())
            .set_json(json!({ "name": "Stolen" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 404);

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/tags/{id}"))
            .cookie(intruder)
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 404);

    // The owner's tag is untouched.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/tags")
            .cookie(owner)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body[0]["name"], "Private");
}
