use super::*;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use blogforge_common::{
    auth::CurrentUser,
    config::DatabaseConfig,
    errors::{AppError, Result},
    generation::MockGenerator,
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod auth;

/// Generator that always fails, standing in for an unreachable upstream
struct FailingGenerator;

#[async_trait::async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _topic: &str) -> Result<String> {
        Err(AppError::Generation {
            message: "API error 503 Service Unavailable: overloaded".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

fn test_sessions() -> SessionManager {
    SessionManager::new("test-secret", 3600, "session", false).unwrap()
}

/// Build a router over a fresh in-memory database
async fn create_test_app(generator: Arc<dyn Generator>) -> Router {
    let db = DbPool::new(&DatabaseConfig::in_memory()).await.unwrap();
    db.ensure_schema().await.unwrap();

    let state = AppState {
        config: Arc::new(AppConfig::default()),
        db,
        sessions: Arc::new(test_sessions()),
        generator,
        metrics: None,
    };

    create_router(state)
}

async fn test_app() -> Router {
    create_test_app(Arc::new(MockGenerator)).await
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }

    fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// A registered user and the cookie carrying their session
struct TestUser {
    id: i64,
    cookie: String,
}

async fn register(app: &Router, username: &str) -> TestUser {
    let response = send(
        app,
        request(
            "POST",
            "/auth/register",
            None,
            Some(json!({ "username": username, "password": "password123" })),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let cookie = response
        .header(header::SET_COOKIE)
        .and_then(|c| c.split(';').next())
        .unwrap()
        .to_string();
    let id = response.json()["user"]["id"].as_i64().unwrap();

    TestUser { id, cookie }
}

async fn create_article(app: &Router, user: &TestUser, body: Value) -> TestResponse {
    send(app, request("POST", "/api/articles", Some(&user.cookie), Some(body))).await
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app().await;

    let response = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "healthy");

    let response = send(&app, request("GET", "/ready", None, None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["checks"]["database"]["status"], "up");
}

#[tokio::test]
async fn test_metrics_disabled() {
    let app = test_app().await;
    let response = send(&app, request("GET", "/metrics", None, None)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_index_page() {
    let app = test_app().await;
    let response = send(&app, request("GET", "/", None, None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .header(header::CONTENT_TYPE)
        .unwrap()
        .starts_with("text/html"));
    assert!(response.text().contains("<form id=\"blogForm\">"));
}

#[tokio::test]
async fn test_request_id_propagated() {
    let app = test_app().await;
    let response = send(&app, request("GET", "/health", None, None)).await;
    assert!(response.headers.contains_key("x-request-id"));

    // A caller-supplied id is echoed back
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-abc-123")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(
        response.header(header::HeaderName::from_static("x-request-id")),
        Some("req-abc-123")
    );
}
