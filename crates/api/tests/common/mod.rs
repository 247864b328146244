#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use waypoint_api::auth::jwt::{generate_access_token, JwtConfig};
use waypoint_api::config::ServerConfig;
use waypoint_api::router::build_app_router;
use waypoint_api::state::AppState;
use waypoint_db::MemoryStore;
use waypoint_llm::{GeminiConfig, GenerateError, RoadmapGenerator, TextModel};

pub const SERVER_KEY: &str = "server-key";

/// A well-formed model answer, fenced the way Gemini often returns it.
pub const GOOD_ANSWER: &str = r#"```json
{
    "title": "Rust in Anger",
    "description": "From ownership to async services",
    "estimated_total_time": "40 hours",
    "steps": [
        {"step_number": 1, "title": "Ownership", "type": "Concept",
         "time_allocation": "Day 1", "description": "Moves and borrows",
         "detailedNotes": "The borrow checker", "outcomes": "Reads borrowck errors",
         "resources": [{"label": "The Book", "url": "https://doc.rust-lang.org/book/"}]},
        {"step_number": 2, "title": "CLI tool", "type": "Project",
         "time_allocation": "Week 1", "description": "Build grep",
         "detailedNotes": "Error handling", "outcomes": "Shipped a crate",
         "resources": []},
        {"step_number": 3, "title": "Review", "type": "Milestone",
         "time_allocation": "Week 2", "description": "Checkpoint",
         "detailedNotes": "", "outcomes": "Confident basics", "resources": []}
    ]
}
```"#;

/// Text model that replays a configurable answer and records the keys it
/// was called with.
pub struct CannedModel {
    answer: Mutex<String>,
    keys: Mutex<Vec<String>>,
}

impl CannedModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            answer: Mutex::new(GOOD_ANSWER.to_string()),
            keys: Mutex::new(Vec::new()),
        })
    }

    pub fn set_answer(&self, answer: &str) {
        *self.answer.lock().unwrap() = answer.to_string();
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextModel for CannedModel {
    fn model_name(&self) -> &str {
        "canned-model"
    }

    async fn complete(&self, _prompt: &str, api_key: &str) -> Result<String, GenerateError> {
        self.keys.lock().unwrap().push(api_key.to_string());
        Ok(self.answer.lock().unwrap().clone())
    }
}

/// Build a test `ServerConfig` with safe defaults and no database.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        feed_cache_ttl_secs: 300,
        feed_limit: 100,
        list_limit: 100,
        // Off unless a test opts in.
        rate_limit_max: 0,
        rate_limit_window_secs: 900,
        database_url: None,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            issuer: None,
            audience: None,
        },
        gemini_api_key: Some(SERVER_KEY.to_string()),
        gemini: GeminiConfig::default(),
    }
}

/// Router plus handles on the pieces tests want to inspect.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub model: Arc<CannedModel>,
}

impl TestApp {
    /// A fresh clone of the router for one `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Sign a bearer token for `user_id`.
    pub fn token(&self, user_id: &str) -> String {
        generate_access_token(user_id, 15, &self.state.config.jwt).unwrap()
    }
}

/// Build the full application router with the in-memory store and a canned
/// model, using the same middleware stack as production.
pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let model = CannedModel::new();
    let generator = Arc::new(RoadmapGenerator::new(
        model.clone(),
        config.gemini_api_key.clone(),
    ));

    let state = AppState::new(config, store.clone(), store.clone(), generator);
    let router = build_app_router(state.clone());

    TestApp {
        router,
        state,
        store,
        model,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn post(app: Router, uri: &str) -> Response {
    send(app, request(Method::POST, uri, None, None)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::POST, uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

/// Generate with the canned model and save the result for `user_id`.
/// Returns the saved document.
pub async fn generate_and_save(test: &TestApp, user_id: &str) -> serde_json::Value {
    let response = post_json(
        test.app(),
        "/api/generate",
        serde_json::json!({"topic": "Rust", "level": "Intermediate"}),
    )
    .await;
    let content = body_json(response).await;

    let response = post_json(
        test.app(),
        "/api/save",
        serde_json::json!({"roadmap": content, "userId": user_id}),
    )
    .await;
    body_json(response).await
}
