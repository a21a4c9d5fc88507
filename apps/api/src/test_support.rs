//! Router harness for handler tests: in-memory store, mock backend and mock
//! LLM endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration as TtlDuration;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::MockServer;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::models::user::{EducationLevel, Location, NewUser};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemoryStore;
use crate::store::Store;
use crate::upstream::{RetryPolicy, UpstreamClient};

pub const TEST_EMAIL: &str = "student@example.com";

pub fn test_config(fastapi_base_url: &str, groq_api_url: &str) -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        db_acquire_timeout_secs: 1,
        groq_api_key: "test-key".to_string(),
        groq_api_url: groq_api_url.to_string(),
        fastapi_base_url: fastapi_base_url.to_string(),
        upstream_timeout_secs: 2,
        upstream_max_retries: 0,
        upstream_retry_backoff_ms: 0,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub upstream: MockServer,
    pub llm: MockServer,
}

impl TestApp {
    pub async fn new() -> Self {
        let upstream = MockServer::start().await;
        let llm = MockServer::start().await;
        let config = test_config(&upstream.uri(), &llm.uri());

        let store = Arc::new(MemoryStore::new());
        let state = AppState {
            store: store.clone(),
            upstream: UpstreamClient::new(
                &config.fastapi_base_url,
                Duration::from_secs(config.upstream_timeout_secs),
                RetryPolicy {
                    max_retries: config.upstream_max_retries,
                    backoff_base_ms: config.upstream_retry_backoff_ms,
                },
            )
            .unwrap(),
            llm: LlmClient::from_config(&config).unwrap(),
        };

        Self {
            router: build_router(state),
            store,
            upstream,
            llm,
        }
    }

    /// Sends one request and returns the status and JSON body (`Null` when
    /// the body is empty).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Creates an account for [`TEST_EMAIL`] and returns a live session
    /// token. Skips bcrypt; these tests never log in with the password.
    pub async fn signed_in_user(&self) -> Uuid {
        self.store
            .create_user(
                NewUser {
                    name: "Test Student".to_string(),
                    email: TEST_EMAIL.to_string(),
                    password: String::new(),
                    date_of_birth: None,
                    gender: None,
                    education_level: EducationLevel::Class12,
                    interests: vec!["coding".to_string()],
                    location: Location {
                        state: "Karnataka".to_string(),
                        district: "Bengaluru Urban".to_string(),
                        pincode: None,
                    },
                    preferred_streams: vec![],
                },
                "not-a-real-hash".to_string(),
            )
            .await
            .unwrap();
        self.session_for(TEST_EMAIL, TtlDuration::days(1)).await
    }

    pub async fn session_for(&self, email: &str, ttl: TtlDuration) -> Uuid {
        self.store.create_session(email, ttl).await.unwrap().token
    }
}
