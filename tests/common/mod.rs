#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use fitforge::{app::build_app, auth::jwt::JwtKeys, state::AppState};

/// Router over a state whose pool never connects and whose generator
/// answers with `reply`.
pub fn test_app_with_reply(reply: &str) -> (Router, AppState) {
    let state = AppState::fake_with_reply(reply);
    (build_app(state.clone()), state)
}

pub fn test_app() -> (Router, AppState) {
    let state = AppState::fake();
    (build_app(state.clone()), state)
}

/// Router over a migrated test database.
pub fn db_app(db: PgPool, reply: &str) -> (Router, AppState) {
    let state = AppState::with_canned_reply(db, reply);
    (build_app(state.clone()), state)
}

pub fn access_token(state: &AppState) -> String {
    JwtKeys::from(&state.config.jwt)
        .sign_access(Uuid::new_v4())
        .expect("sign access token")
}

pub fn refresh_token(state: &AppState) -> String {
    JwtKeys::from(&state.config.jwt)
        .sign_refresh(Uuid::new_v4(), "session")
        .expect("sign refresh token")
}

pub struct TestRequest {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl TestRequest {
    fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_owned(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    pub fn put(uri: &str) -> Self {
        Self::new(Method::PUT, uri)
    }

    pub fn delete(uri: &str) -> Self {
        Self::new(Method::DELETE, uri)
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.headers
            .push((header::AUTHORIZATION.as_str().to_owned(), format!("Bearer {token}")));
        self
    }

    pub fn json<T: Serialize>(mut self, data: &T) -> Self {
        self.body = Some(serde_json::to_string(data).expect("serialize body"));
        self.headers.push((
            header::CONTENT_TYPE.as_str().to_owned(),
            "application/json".to_owned(),
        ));
        self
    }

    pub async fn send(self, app: Router) -> TestResponse {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        for (key, value) in self.headers {
            builder = builder.header(key, value);
        }
        let request = builder
            .body(Body::from(self.body.unwrap_or_default()))
            .expect("build request");

        let response = app.oneshot(request).await.expect("execute request");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec();
        TestResponse { status, body }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("json body")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("utf-8 body")
    }

    pub fn error(&self) -> String {
        self.json()["error"]
            .as_str()
            .expect("error message")
            .to_owned()
    }
}
