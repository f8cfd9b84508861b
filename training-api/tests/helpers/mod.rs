//! Shared helpers for training-api integration tests
//!
//! Builds the full router over a private in-memory database and a stub
//! directory with fixed tokens:
//!
//! | token          | member | self-managed |
//! |----------------|--------|--------------|
//! | `alpha-admin`  | 1      | yes          |
//! | `alpha-viewer` | 1      | no           |
//! | `beta-admin`   | 2      | yes          |
//!
//! Users 10, 11, 20 and 30 exist. Looking up user 500 fails as if the
//! membership service were down.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method
use training_api::directory::DirectoryError;
use training_api::{build_router, AppState, Caller, Directory};
use training_common::config::PaginationConfig;
use training_common::db::init_memory_database;

pub const ALPHA_ADMIN: &str = "alpha-admin";
pub const ALPHA_VIEWER: &str = "alpha-viewer";
pub const BETA_ADMIN: &str = "beta-admin";

/// User whose lookup fails with a network error
pub const UNREACHABLE_USER: i64 = 500;

pub struct StubDirectory {
    callers: HashMap<String, Caller>,
    users: HashSet<i64>,
}

impl StubDirectory {
    pub fn standard() -> Self {
        let callers = [
            (ALPHA_ADMIN, 10, 1, true),
            (ALPHA_VIEWER, 11, 1, false),
            (BETA_ADMIN, 20, 2, true),
        ]
        .into_iter()
        .map(|(token, user_id, member_id, self_managed)| {
            (
                token.to_string(),
                Caller {
                    user_id,
                    member_id,
                    self_managed,
                    token: token.to_string(),
                },
            )
        })
        .collect();

        Self {
            callers,
            users: [10, 11, 20, 30].into_iter().collect(),
        }
    }
}

#[async_trait]
impl Directory for StubDirectory {
    async fn authenticate(&self, token: &str) -> Result<Caller, DirectoryError> {
        self.callers
            .get(token)
            .cloned()
            .ok_or(DirectoryError::Rejected(401))
    }

    async fn user_exists(&self, _token: &str, user_id: i64) -> Result<bool, DirectoryError> {
        if user_id == UNREACHABLE_USER {
            return Err(DirectoryError::Network("connection refused".to_string()));
        }
        Ok(self.users.contains(&user_id))
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
}

/// Router over a fresh database, page sizes 5 (default) and 10 (maximum)
pub async fn setup() -> TestApp {
    let db = init_memory_database().await.expect("Should create database");
    let state = AppState::new(
        db.clone(),
        Arc::new(StubDirectory::standard()),
        PaginationConfig {
            default_limit: 5,
            max_limit: 10,
        },
    );

    TestApp {
        router: build_router(state),
        db,
    }
}

impl TestApp {
    /// Send a request and return the status and parsed JSON body
    ///
    /// Empty bodies come back as `Value::Null`.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
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
            .expect("Should read body");

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Should parse JSON")
        };

        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send("PATCH", uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, Some(token), None).await
    }

    /// Create a Syllabus and return its id
    pub async fn syllabus(&self, token: &str, name: &str) -> i64 {
        let (status, body) = self
            .post("/syllabus/", token, json!({"name": name, "description": ""}))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["content"]["id"].as_i64().unwrap()
    }

    /// Create a Class and return its id
    pub async fn class(&self, token: &str, syllabus_id: i64, trainer: &str, start: &str) -> i64 {
        let (status, body) = self
            .post(
                "/class/",
                token,
                json!({"syllabus_id": syllabus_id, "trainer": trainer, "start_date": start}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["content"]["id"].as_i64().unwrap()
    }

    /// Create a Student and return its id
    pub async fn student(&self, token: &str, cls_id: i64, user_id: i64) -> i64 {
        let (status, body) = self
            .post("/student/", token, json!({"cls_id": cls_id, "user_id": user_id}))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["content"]["id"].as_i64().unwrap()
    }
}

/// Error code of a request-level error body
pub fn error_code(body: &Value) -> &str {
    body["error_code"].as_str().unwrap_or_default()
}

/// Error code reported for one field of a validation error body
pub fn field_error<'a>(body: &'a Value, field: &str) -> &'a str {
    body["errors"][field]["error_code"].as_str().unwrap_or_default()
}
