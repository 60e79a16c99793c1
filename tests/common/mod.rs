#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use chatbuddy_backend::{config::Config, database::user_store::UserStore, routes, AppState};
use serde_json::{json, Value as JsonValue};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test_secret_key";

pub fn app_with(config: Config) -> Router {
    let state = AppState::new(config, UserStore::in_memory()).expect("app state");
    routes::build_router(state)
}

pub fn app() -> Router {
    app_with(Config::for_tests(JWT_SECRET))
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let (status, _, json) = send_from(app, None, method, uri, token, body).await;
    (status, json)
}

/// Like [`send`], but attaches the peer address the server would see and
/// also returns the response headers.
pub async fn send_from(
    app: &Router,
    client: Option<SocketAddr>,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, HeaderMap, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(addr) = client {
        builder = builder.extension(ConnectInfo(addr));
    }
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, json)
}

/// Registers an account and returns its bearer token.
pub async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": email,
            "password": "analytical",
            "confirmPassword": "analytical"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

async fn fake_completion(State(content): State<String>) -> Json<JsonValue> {
    Json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

async fn fake_models() -> Json<JsonValue> {
    Json(json!({"data": [{"id": "test-model"}]}))
}

/// Starts a local stand-in for the OpenRouter API that answers every
/// completion with `content`, and returns a config pointing at it.
pub async fn config_with_upstream(content: &str) -> Config {
    let upstream = Router::new()
        .route("/api/v1/chat/completions", post(fake_completion))
        .route("/api/v1/models", get(fake_models))
        .with_state(content.to_string());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    let mut config = Config::for_tests(JWT_SECRET);
    config.openai_api_key = Some("sk-or-v1-test".to_string());
    config.openrouter_base_url = format!("http://{}/api/v1", addr);
    config.ai_timeout_secs = 5;
    config
}
