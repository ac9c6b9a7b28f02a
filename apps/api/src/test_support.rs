//! Router harness for handler tests. MUST NEVER be used in production.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::util::ServiceExt;
use uuid::Uuid;

use crate::auth::{issue_token, SessionKeys};
use crate::errors::AppError;
use crate::models::resume::{NewResume, Resume, ResumeChanges};
use crate::models::template::Template;
use crate::resumes::store::{MemoryResumeStore, ResumeStore};
use crate::routes::build_router;
use crate::state::AppState;
use crate::templates::store::{MemoryTemplateStore, TemplateStore};

const SECRET: &[u8] = b"handler-test-secret";

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_templates(Vec::new())
    }

    pub fn with_templates(templates: Vec<Template>) -> Self {
        Self::from_state(AppState {
            resumes: Arc::new(MemoryResumeStore::new()),
            templates: Arc::new(MemoryTemplateStore::with_templates(templates)),
            sessions: SessionKeys::new(SECRET),
        })
    }

    /// Every store call fails as if the database pool were exhausted.
    pub fn unreachable_database() -> Self {
        Self::from_state(AppState {
            resumes: Arc::new(UnreachableStore),
            templates: Arc::new(UnreachableStore),
            sessions: SessionKeys::new(SECRET),
        })
    }

    fn from_state(state: AppState) -> Self {
        Self {
            router: build_router(state),
        }
    }

    /// Sends a JSON request, signed in as `user` when given.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let authorization = user.map(|id| format!("Bearer {}", issue_token(SECRET, id, 3600)));
        self.raw_request(method, uri, authorization.as_deref(), body)
            .await
    }

    pub async fn raw_request(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let body = match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        };
        self.send(method, uri, authorization, body).await
    }

    /// Sends `text` verbatim as a JSON-typed body, signed in as `user` when given.
    pub async fn request_text(
        &self,
        method: Method,
        uri: &str,
        user: Option<Uuid>,
        text: &str,
    ) -> (StatusCode, Value) {
        let authorization = user.map(|id| format!("Bearer {}", issue_token(SECRET, id, 3600)));
        self.send(method, uri, authorization.as_deref(), Body::from(text.to_string()))
            .await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Body,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

struct UnreachableStore;

fn pool_timeout() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl ResumeStore for UnreachableStore {
    async fn list_owned(&self, _owner: Uuid) -> Result<Vec<Resume>, AppError> {
        Err(pool_timeout())
    }

    async fn insert(&self, _owner: Uuid, _input: NewResume) -> Result<Resume, AppError> {
        Err(pool_timeout())
    }

    async fn find_visible(
        &self,
        _id: Uuid,
        _viewer: Option<Uuid>,
    ) -> Result<Option<Resume>, AppError> {
        Err(pool_timeout())
    }

    async fn update_owned(
        &self,
        _id: Uuid,
        _owner: Uuid,
        _changes: ResumeChanges,
    ) -> Result<Option<Resume>, AppError> {
        Err(pool_timeout())
    }

    async fn delete_owned(&self, _id: Uuid, _owner: Uuid) -> Result<bool, AppError> {
        Err(pool_timeout())
    }
}

#[async_trait]
impl TemplateStore for UnreachableStore {
    async fn list(&self) -> Result<Vec<Template>, AppError> {
        Err(pool_timeout())
    }
}
