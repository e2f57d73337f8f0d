//! End-to-end tests of the Krathong HTTP API

mod common;

use common::{parse_response, submission, RecordingPublisher, TestApp};
use krathong_api::{KrathongListResponse, KrathongResponse};
use krathong_core::Krathong;
use krathong_service::PublishMode;
use serde_json::{json, Value};
use std::collections::HashSet;

#[tokio::test]
async fn test_create_krathong() {
    let app = TestApp::new().await;

    let response = app.create(&submission(1, "Som", "IT", "health")).await;
    let body: KrathongResponse = parse_response(response, 201).await;

    assert_eq!(body.response_code, "0000");
    assert_eq!(body.response_message, "Krathong created successfully");

    let data = body.data.expect("created record");
    assert!(data.krathong_id.value() > 0);
    assert_eq!(data.krathong_type, 1);
    assert_eq!(data.emp_name, "Som");
    assert_eq!(data.emp_department, "IT");
    assert_eq!(data.emp_wish.as_deref(), Some("health"));
}

#[tokio::test]
async fn test_created_at_is_present() {
    let app = TestApp::new().await;

    let response = app.create(&submission(1, "Som", "IT", "health")).await;
    let body: Value = parse_response(response, 201).await;

    assert!(body["data"]["created_at"].is_string());
}

#[tokio::test]
async fn test_ids_are_unique() {
    let app = TestApp::new().await;

    let mut ids = HashSet::new();
    for i in 0..5 {
        let response = app.create(&submission(i, "Som", "IT", "luck")).await;
        let body: KrathongResponse = parse_response(response, 201).await;
        ids.insert(body.data.unwrap().krathong_id);
    }

    assert_eq!(ids.len(), 5);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = TestApp::new().await;

    let response = app.create_raw("{\"krathong_type\": 1,").await;
    let body: Value = parse_response(response, 400).await;

    assert_eq!(body["response_code"], "0001");
    assert!(body["response_message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON format"));
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_wrong_field_type_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .create(&json!({"krathong_type": "big", "emp_name": "Som", "emp_department": "IT"}))
        .await;
    let body: Value = parse_response(response, 400).await;

    assert_eq!(body["response_code"], "0001");
}

#[tokio::test]
async fn test_positional_array_is_rejected() {
    let app = TestApp::new().await;

    let response = app.create_raw(r#"[1,"Som","IT","health"]"#).await;
    let body: Value = parse_response(response, 400).await;

    assert_eq!(body["response_code"], "0001");
    assert!(body["data"].is_null());

    let list: KrathongListResponse = parse_response(app.list().await, 200).await;
    assert!(list.data.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_array_is_rejected() {
    let app = TestApp::new().await;

    let response = app.create_raw("[]").await;
    let body: Value = parse_response(response, 400).await;

    assert_eq!(body["response_code"], "0001");
}

#[tokio::test]
async fn test_scalar_bodies_are_rejected() {
    let app = TestApp::new().await;

    for raw in [r#""text""#, "42", "null"] {
        let response = app.create_raw(raw).await;
        let body: Value = parse_response(response, 400).await;
        assert_eq!(body["response_code"], "0001", "body {}", raw);
    }
}

#[tokio::test]
async fn test_name_of_fifty_thai_characters_is_accepted() {
    let app = TestApp::new().await;
    let name = "ก".repeat(50);

    let response = app.create(&submission(1, &name, "IT", "health")).await;
    let body: KrathongResponse = parse_response(response, 201).await;

    assert_eq!(body.data.unwrap().emp_name, name);
}

#[tokio::test]
async fn test_name_of_fifty_one_thai_characters_fails_in_store() {
    let app = TestApp::new().await;
    let name = "ก".repeat(51);

    let response = app.create(&submission(1, &name, "IT", "health")).await;
    let body: Value = parse_response(response, 500).await;

    assert_eq!(body["response_code"], "0004");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_missing_name_fails_in_store() {
    let app = TestApp::new().await;

    let response = app
        .create(&json!({"krathong_type": 1, "emp_department": "IT", "emp_wish": "health"}))
        .await;
    let body: Value = parse_response(response, 500).await;

    assert_eq!(body["response_code"], "0004");
    assert!(body["response_message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to create Krathong"));
    assert!(body["data"].is_null());

    let list: KrathongListResponse = parse_response(app.list().await, 200).await;
    assert!(list.data.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_wish_is_allowed() {
    let app = TestApp::new().await;

    let response = app
        .create(&json!({"krathong_type": 2, "emp_name": "Noi", "emp_department": "HR"}))
        .await;
    let body: KrathongResponse = parse_response(response, 201).await;

    assert_eq!(body.data.unwrap().emp_wish, None);
}

#[tokio::test]
async fn test_list_empty_store() {
    let app = TestApp::new().await;

    let body: Value = parse_response(app.list().await, 200).await;

    assert_eq!(body["response_code"], "0000");
    assert_eq!(body["response_message"], "Krathongs retrieved successfully");
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_list_returns_newest_first() {
    let app = TestApp::new().await;

    for i in 0..10 {
        let response = app
            .create(&submission(i, &format!("emp-{}", i), "IT", "wish"))
            .await;
        assert_eq!(response.status().as_u16(), 201);
    }

    let body: KrathongListResponse = parse_response(app.list().await, 200).await;
    let data = body.data.unwrap();

    assert_eq!(data.len(), 10);
    assert_eq!(data[0].emp_name, "emp-9");
    assert_eq!(data[9].emp_name, "emp-0");
    assert!(data.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn test_list_is_capped_at_fifty_most_recent() {
    let app = TestApp::new().await;

    for i in 0..55 {
        let response = app
            .create(&submission(i, &format!("emp-{}", i), "IT", "wish"))
            .await;
        assert_eq!(response.status().as_u16(), 201);
    }

    let body: KrathongListResponse = parse_response(app.list().await, 200).await;
    let data = body.data.unwrap();

    assert_eq!(data.len(), 50);
    assert_eq!(data[0].emp_name, "emp-54");
    assert_eq!(data[49].emp_name, "emp-5");
}

#[tokio::test]
async fn test_created_record_round_trips_through_list() {
    let app = TestApp::new().await;

    let response = app.create(&submission(3, "Dao", "Finance", "promotion")).await;
    let created: KrathongResponse = parse_response(response, 201).await;
    let created = created.data.unwrap();

    let body: KrathongListResponse = parse_response(app.list().await, 200).await;
    let listed: Vec<Krathong> = body.data.unwrap();

    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn test_publish_disabled_never_publishes() {
    let app = TestApp::new().await;

    let response = app.create(&submission(1, "Som", "IT", "health")).await;
    assert_eq!(response.status().as_u16(), 201);

    assert!(app.publisher.messages().is_empty());
}

#[tokio::test]
async fn test_publish_required_sends_created_record() {
    let app =
        TestApp::with_publisher(PublishMode::Required, RecordingPublisher::default()).await;

    let response = app.create(&submission(1, "Som", "IT", "health")).await;
    let body: Value = parse_response(response, 201).await;

    let messages = app.publisher.messages();
    assert_eq!(messages.len(), 1);

    let (key, value) = &messages[0];
    assert_eq!(key, &body["data"]["krathong_id"].to_string());
    assert_eq!(value, &body["data"]);
}

#[tokio::test]
async fn test_publish_required_failure_returns_server_error() {
    let app =
        TestApp::with_publisher(PublishMode::Required, RecordingPublisher::failing()).await;

    let response = app.create(&submission(1, "Som", "IT", "health")).await;
    let body: Value = parse_response(response, 500).await;

    assert_eq!(body["response_code"], "0004");
    assert!(body["response_message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to publish message"));

    // The row is kept even though the request failed
    let list: KrathongListResponse = parse_response(app.list().await, 200).await;
    assert_eq!(list.data.unwrap().len(), 1);
}

#[tokio::test]
async fn test_publish_best_effort_failure_still_creates() {
    let app =
        TestApp::with_publisher(PublishMode::BestEffort, RecordingPublisher::failing()).await;

    let response = app.create(&submission(1, "Som", "IT", "health")).await;
    let body: KrathongResponse = parse_response(response, 201).await;

    assert_eq!(body.response_code, "0000");
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let response = app
        .client()
        .get(app.url("/health"))
        .send()
        .await
        .unwrap();
    let body: Value = parse_response(response, 200).await;

    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document() {
    let app = TestApp::new().await;

    let response = app
        .client()
        .get(app.url("/api-docs/openapi.json"))
        .send()
        .await
        .unwrap();
    let body: Value = parse_response(response, 200).await;

    assert!(body["paths"]["/api/v1/krathong"]["post"].is_object());
    assert!(body["paths"]["/api/v1/krathong"]["get"].is_object());
}

#[tokio::test]
async fn test_request_id_header_is_set() {
    let app = TestApp::new().await;

    let first = app.list().await;
    let second = app.list().await;

    let first_id = first.headers().get("x-request-id").cloned().unwrap();
    let second_id = second.headers().get("x-request-id").cloned().unwrap();
    assert_ne!(first_id, second_id);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = TestApp::new().await;

    let response = app
        .client()
        .get(app.url("/api/v1/krathong"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-me");
}

#[tokio::test]
async fn test_cors_mirrors_origin_with_credentials() {
    let app = TestApp::new().await;

    let response = app
        .client()
        .get(app.url("/api/v1/krathong"))
        .header("Origin", "https://party.example.com")
        .send()
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers["access-control-allow-origin"],
        "https://party.example.com"
    );
    assert_eq!(headers["access-control-allow-credentials"], "true");
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = TestApp::new().await;

    let response = app
        .client()
        .request(reqwest::Method::OPTIONS, app.url("/api/v1/krathong"))
        .header("Origin", "https://party.example.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());

    let headers = response.headers();
    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("DELETE"));
    assert!(headers.contains_key("x-request-id"));
}
