//! End-to-end tests driving the router in-process

use std::collections::HashSet;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use cafe_server::db::{create_memory_pool, create_pool, migrations};
use cafe_server::http::routes::cafes::NO_CAFE_AT_LOCATION;
use cafe_server::{build_router, AppState, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let pool = create_memory_pool().await.unwrap();
    build_router(AppState::new(pool), &ServerConfig::default())
}

fn cafe_json(name: &str, location: &str) -> Value {
    json!({
        "name": name,
        "map_url": format!("https://maps.example.com/{}", name),
        "img_url": format!("https://img.example.com/{}.jpg", name),
        "location": location,
        "seats": "20-30",
        "has_toilet": true,
        "has_wifi": false,
        "has_sockets": true,
        "can_take_calls": true,
        "coffee_price": "£2.40"
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create(app: &Router, name: &str, location: &str) -> Value {
    let (status, body) = send(app, "POST", "/cafe", Some(cafe_json(name, location))).await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", body);
    body["cafe"].clone()
}

#[tokio::test]
async fn create_then_read_returns_same_fields() {
    let app = app().await;
    let created = create(&app, "Science Gallery London", "London Bridge").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &format!("/cafe/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cafe"], created);

    let mut expected = cafe_json("Science Gallery London", "London Bridge");
    expected["id"] = json!(id);
    assert_eq!(body["cafe"], expected);
}

#[tokio::test]
async fn list_after_n_creates_returns_n() {
    let app = app().await;
    let (_, body) = send(&app, "GET", "/all", None).await;
    assert_eq!(body, json!({ "cafes": [] }));

    for i in 0..4 {
        create(&app, &format!("Cafe {}", i), "Hackney").await;
    }

    let (status, body) = send(&app, "GET", "/all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cafes"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn search_hit_and_miss() {
    let app = app().await;
    let cafe = create(&app, "Ace", "Peckham").await;

    let (status, body) = send(&app, "GET", "/search?loc=Peckham", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cafe"], cafe);

    let (status, body) = send(&app, "GET", "/search?loc=Atlantis", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "error": { "Not Found": NO_CAFE_AT_LOCATION } }));

    let (status, body) = send(&app, "GET", "/search", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"]["Not Found"].is_string());
}

#[tokio::test]
async fn search_with_repeated_loc_uses_first() {
    let app = app().await;
    let cafe = create(&app, "Ace", "Peckham").await;

    let (status, body) = send(&app, "GET", "/search?loc=Peckham&loc=Atlantis", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cafe"], cafe);

    let (status, body) = send(&app, "GET", "/search?loc=a&loc=b", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "error": { "Not Found": NO_CAFE_AT_LOCATION } }));
}

#[tokio::test]
async fn search_decodes_encoded_location() {
    let app = app().await;
    let cafe = create(&app, "Ace", "London Bridge").await;

    let (status, body) = send(&app, "GET", "/search?loc=London%20Bridge", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cafe"], cafe);
}

#[tokio::test]
async fn update_price_changes_only_price() {
    let app = app().await;
    let before = create(&app, "Ace", "Shoreditch").await;
    let id = before["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/update-price/{}", id),
        Some(json!({ "coffee_price": "£3.10" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = before.clone();
    expected["coffee_price"] = json!("£3.10");
    assert_eq!(body["cafe"], expected);

    let (_, body) = send(&app, "GET", &format!("/cafe/{}", id), None).await;
    assert_eq!(body["cafe"], expected);
}

#[tokio::test]
async fn update_price_errors() {
    let app = app().await;
    let cafe = create(&app, "Ace", "Shoreditch").await;
    let id = cafe["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PATCH",
        "/update-price/999",
        Some(json!({ "coffee_price": "£1" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Cafe with id 999 not found.");

    let (status, body) = send(&app, "PATCH", &format!("/update-price/{}", id), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing required field 'coffee_price'");

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/update-price/{}", id),
        Some(json!({ "coffee_price": "9".repeat(251) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "coffee_price exceeds maximum length of 250 characters");

    let (_, body) = send(&app, "GET", &format!("/cafe/{}", id), None).await;
    assert_eq!(body["cafe"]["coffee_price"], "£2.40");

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/update-price/{}", id),
        Some(json!({ "coffee_price": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cafe"]["coffee_price"], Value::Null);
}

#[tokio::test]
async fn delete_then_read_is_404() {
    let app = app().await;
    let cafe = create(&app, "Ace", "Shoreditch").await;
    let id = cafe["id"].as_i64().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/report-closed/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Cafe deleted successfully" }));

    let (status, body) = send(&app, "GET", &format!("/cafe/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], format!("Cafe with id {} not found.", id));

    let (status, _) = send(&app, "DELETE", &format!("/report-closed/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn random_returns_a_listed_cafe() {
    let app = app().await;
    for name in ["Ace", "Bean", "Crema"] {
        create(&app, name, "Islington").await;
    }

    let (_, all) = send(&app, "GET", "/all", None).await;
    let ids: HashSet<i64> = all["cafes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();

    for _ in 0..10 {
        let (status, body) = send(&app, "GET", "/random", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(ids.contains(&body["cafe"]["id"].as_i64().unwrap()));
    }
}

#[tokio::test]
async fn random_on_empty_table_is_404() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/random", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No cafes available.");
}

#[tokio::test]
async fn create_rejects_bad_payloads() {
    let app = app().await;
    create(&app, "Ace", "Shoreditch").await;

    // duplicate name
    let (status, body) = send(&app, "POST", "/cafe", Some(cafe_json("Ace", "Hackney"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Ace"));

    // unknown key
    let mut extra = cafe_json("Bean", "Hackney");
    extra["rating"] = json!(5);
    let (status, _) = send(&app, "POST", "/cafe", Some(extra)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // missing required key
    let mut missing = cafe_json("Bean", "Hackney");
    missing.as_object_mut().unwrap().remove("location");
    let (status, _) = send(&app, "POST", "/cafe", Some(missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // price over the column limit
    let mut long_price = cafe_json("Bean", "Hackney");
    long_price["coffee_price"] = json!("9".repeat(251));
    let (status, body) = send(&app, "POST", "/cafe", Some(long_price)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "coffee_price exceeds maximum length of 250 characters");

    // empty required text
    let (status, body) = send(&app, "POST", "/cafe", Some(cafe_json("", "Hackney"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name cannot be empty");

    let (_, all) = send(&app, "GET", "/all", None).await;
    assert_eq!(all["cafes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("cafes.db").display());

    let pool = create_pool(&url).await.unwrap();
    migrations::run(&pool).await.unwrap();
    let app = build_router(AppState::new(pool.clone()), &ServerConfig::default());
    let created = create(&app, "Ace", "Shoreditch").await;
    pool.close().await;

    let pool = create_pool(&url).await.unwrap();
    migrations::run(&pool).await.unwrap();
    let app = build_router(AppState::new(pool), &ServerConfig::default());
    let (_, body) = send(&app, "GET", "/all", None).await;
    assert_eq!(body["cafes"], json!([created]));
}
