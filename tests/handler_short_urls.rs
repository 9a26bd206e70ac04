mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{Value, json};

#[tokio::test]
async fn test_create_short_url_with_generated_slug() {
    let app = TestApp::new();
    let server = app.server();

    let response = server
        .post("/api/v1/shorturls")
        .json(&json!({ "long_url": "https://www.cloudflare.com" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let json = response.json::<Value>();
    let slug = json["slug"].as_str().unwrap();
    assert_eq!(slug.len(), 8);
    assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(json["short_url"], format!("http://sho.rt/{slug}"));
    assert_eq!(json["long_url"], "https://www.cloudflare.com");
    assert_eq!(json["expires_on"], Value::Null);
}

#[tokio::test]
async fn test_create_same_long_url_twice_returns_existing() {
    let app = TestApp::new();
    let server = app.server();

    let first = server
        .post("/api/v1/shorturls")
        .json(&json!({ "long_url": "https://www.cloudflare.com" }))
        .await;
    first.assert_status(StatusCode::CREATED);

    let second = server
        .post("/api/v1/shorturls")
        .json(&json!({ "long_url": "https://www.cloudflare.com" }))
        .await;
    second.assert_status_ok();

    assert_eq!(
        first.json::<Value>()["slug"],
        second.json::<Value>()["slug"]
    );
}

#[tokio::test]
async fn test_create_with_taken_slug_conflicts() {
    let app = TestApp::new();
    let server = app.server();

    server
        .post("/api/v1/shorturls")
        .json(&json!({ "long_url": "https://www.cloudflare.com", "slug": "cf" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/v1/shorturls")
        .json(&json!({ "long_url": "https://www.google.com", "slug": "cf" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<Value>(),
        json!({ "errors": [{ "field": "slug", "reason": "must be unique" }] })
    );

    let list = server.get("/api/v1/shorturls").await.json::<Value>();
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_with_expiry() {
    let app = TestApp::new();
    let server = app.server();

    let response = server
        .post("/api/v1/shorturls")
        .json(&json!({
            "long_url": "https://www.cloudflare.com",
            "slug": "cf",
            "expires_on": "2030-01-01T00:00:00Z"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["expires_on"], "2030-01-01T00:00:00Z");
}

#[tokio::test]
async fn test_create_rejects_unsupported_scheme() {
    let app = TestApp::new();
    let server = app.server();

    let response = server
        .post("/api/v1/shorturls")
        .json(&json!({ "long_url": "ftp://x" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["errors"][0]["field"], "long_url");

    let list = server.get("/api/v1/shorturls").await.json::<Value>();
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_requires_long_url() {
    let app = TestApp::new();
    let server = app.server();

    let response = server
        .post("/api/v1/shorturls")
        .json(&json!({ "slug": "cf" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>(),
        json!({ "errors": [{ "field": "long_url", "reason": "is required" }] })
    );
}

#[tokio::test]
async fn test_create_rejects_invalid_slug() {
    let app = TestApp::new();
    let server = app.server();

    let response = server
        .post("/api/v1/shorturls")
        .json(&json!({ "long_url": "https://example.com", "slug": "a/b" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["errors"][0]["field"], "slug");
}

#[tokio::test]
async fn test_create_rejects_malformed_body() {
    let app = TestApp::new();
    let server = app.server();

    let response = server.post("/api/v1/shorturls").text("not json").await;

    response.assert_status_bad_request();
    let json = response.json::<Value>();
    assert!(json["errors"][0]["reason"].is_string());
    assert!(json["errors"][0].get("field").is_none());
}

#[tokio::test]
async fn test_short_url_uses_host_without_base_url() {
    let app = TestApp::with_base_url(None);
    let server = app.server();

    let response = server
        .post("/api/v1/shorturls")
        .add_header("Host", "localhost:8080")
        .json(&json!({ "long_url": "https://www.cloudflare.com", "slug": "cf" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["short_url"], "http://localhost:8080/cf");
}

#[tokio::test]
async fn test_list_is_ordered_by_creation_time() {
    let app = TestApp::new();
    let server = app.server();

    for (slug, long_url) in [("one", "https://one.example"), ("two", "https://two.example")] {
        server
            .post("/api/v1/shorturls")
            .json(&json!({ "long_url": long_url, "slug": slug }))
            .await
            .assert_status(StatusCode::CREATED);
        app.clock.advance(chrono::Duration::seconds(1));
    }

    let list = server.get("/api/v1/shorturls").await.json::<Value>();
    let slugs: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["slug"].as_str().unwrap())
        .collect();

    assert_eq!(slugs, vec!["one", "two"]);
}

#[tokio::test]
async fn test_get_short_url() {
    let app = TestApp::new();
    let server = app.server();

    server
        .post("/api/v1/shorturls")
        .json(&json!({ "long_url": "https://www.cloudflare.com", "slug": "cf" }))
        .await;

    let response = server.get("/api/v1/shorturls/cf").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["long_url"], "https://www.cloudflare.com");

    server
        .get("/api/v1/shorturls/nonexistent")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_get_short_url_does_not_count_click() {
    let mut app = TestApp::new();
    let server = app.server();

    server
        .post("/api/v1/shorturls")
        .json(&json!({ "long_url": "https://www.cloudflare.com", "slug": "cf" }))
        .await;

    server.get("/api/v1/shorturls/cf").await.assert_status_ok();

    assert_eq!(app.flush_clicks().await, 0);
}

#[tokio::test]
async fn test_delete_short_url() {
    let app = TestApp::new();
    let server = app.server();

    server
        .post("/api/v1/shorturls")
        .json(&json!({ "long_url": "https://www.cloudflare.com", "slug": "cf" }))
        .await;

    server
        .delete("/api/v1/shorturls/cf")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server.get("/cf").await.assert_status_not_found();

    let response = server.delete("/api/v1/shorturls/cf").await;
    response.assert_status_not_found();
    assert_eq!(
        response.json::<Value>(),
        json!({ "errors": [{ "field": "slug", "reason": "not found" }] })
    );
}

#[tokio::test]
async fn test_create_rejects_slug_shadowed_by_route() {
    let app = TestApp::new();
    let server = app.server();

    let response = server
        .post("/api/v1/shorturls")
        .json(&json!({ "long_url": "https://example.com", "slug": "health" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>(),
        json!({ "errors": [{ "field": "slug", "reason": "is reserved" }] })
    );

    server.get("/health").await.assert_status_ok();
    assert!(
        server
            .get("/api/v1/shorturls")
            .await
            .json::<Value>()
            .as_array()
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_recreate_expired_long_url_returns_working_short_url() {
    let app = TestApp::new();
    let server = app.server();

    server
        .post("/api/v1/shorturls")
        .json(&json!({
            "long_url": "https://www.cloudflare.com",
            "slug": "old",
            "expires_on": "2022-05-10T13:00:00Z"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    app.clock.advance(chrono::Duration::hours(2));

    let response = server
        .post("/api/v1/shorturls")
        .json(&json!({ "long_url": "https://www.cloudflare.com", "slug": "new" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["short_url"], "http://sho.rt/new");

    server
        .get("/new")
        .await
        .assert_status(StatusCode::MOVED_PERMANENTLY);
    server.get("/api/v1/shorturls/old").await.assert_status_not_found();
}
