//! Common test utilities
//!
//! Starts the real router on a random port, backed by an in-memory SQLite
//! store and a recording publisher.

#![allow(dead_code)]

use async_trait::async_trait;
use krathong_api::build_api_server;
use krathong_db::{
    create_sqlite_pool, DbError, DbResult, EventPublisher, SqliteKrathongRepository,
};
use krathong_service::{DefaultKrathongService, KrathongService, PublishMode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Publisher that records messages, or fails every publish
#[derive(Default)]
pub struct RecordingPublisher {
    messages: Mutex<Vec<(String, Value)>>,
    fail: bool,
}

impl RecordingPublisher {
    /// A publisher whose every publish fails
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Messages published so far as (key, decoded value)
    pub fn messages(&self) -> Vec<(String, Value)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, key: &[u8], value: &[u8]) -> DbResult<()> {
        if self.fail {
            return Err(DbError::Broker("broker unavailable".to_string()));
        }
        let key = String::from_utf8(key.to_vec()).map_err(|e| DbError::Internal(e.to_string()))?;
        let value = serde_json::from_slice(value)?;
        self.messages.lock().unwrap().push((key, value));
        Ok(())
    }
}

/// Test application
pub struct TestApp {
    pub address: String,
    pub publisher: Arc<RecordingPublisher>,
    client: reqwest::Client,
}

impl TestApp {
    /// Start an application with publishing disabled
    pub async fn new() -> Self {
        Self::with_publisher(PublishMode::Disabled, RecordingPublisher::default()).await
    }

    /// Start an application with the given publish mode and publisher
    pub async fn with_publisher(mode: PublishMode, publisher: RecordingPublisher) -> Self {
        let pool = create_sqlite_pool("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        let publisher = Arc::new(publisher);
        let repository = Arc::new(SqliteKrathongRepository::new(pool));
        let services: Arc<dyn KrathongService> = Arc::new(DefaultKrathongService::new(
            repository,
            publisher.clone(),
            mode,
        ));

        let app = build_api_server(services);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = listener.local_addr().expect("Failed to get local address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to start test server");
        });

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("Failed to build client");

        Self {
            address: format!("http://{}", address),
            publisher,
            client,
        }
    }

    /// Absolute URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// POST a JSON value to the create endpoint
    pub async fn create(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/krathong"))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    /// POST a raw body with a JSON content type
    pub async fn create_raw(&self, body: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/krathong"))
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to send request")
    }

    /// GET the list endpoint
    pub async fn list(&self) -> reqwest::Response {
        self.client
            .get(self.url("/api/v1/krathong"))
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// A valid submission body
pub fn submission(krathong_type: i32, name: &str, department: &str, wish: &str) -> Value {
    serde_json::json!({
        "krathong_type": krathong_type,
        "emp_name": name,
        "emp_department": department,
        "emp_wish": wish,
    })
}

/// Assert status and decode the body
pub async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
    expected: u16,
) -> T {
    assert_eq!(response.status().as_u16(), expected, "unexpected status");
    response.json().await.expect("Failed to parse response body")
}
