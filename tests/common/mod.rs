#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use quiz_generator::{config::Config, routes, AppState};
use serde_json::{json, Value as JsonValue};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Stand-in for the Ollama server: answers every generate call with a fixed
/// status and body, and counts the calls.
#[derive(Clone)]
pub struct FakeOllama {
    pub base_url: String,
    calls: Arc<AtomicUsize>,
    last_body: Arc<tokio::sync::Mutex<Option<JsonValue>>>,
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: JsonValue,
    calls: Arc<AtomicUsize>,
    last_body: Arc<tokio::sync::Mutex<Option<JsonValue>>>,
}

async fn generate(State(canned): State<Canned>, Json(body): Json<JsonValue>) -> impl IntoResponse {
    canned.calls.fetch_add(1, Ordering::SeqCst);
    *canned.last_body.lock().await = Some(body);
    (canned.status, Json(canned.body.clone()))
}

impl FakeOllama {
    pub async fn start(status: StatusCode, body: JsonValue) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let last_body = Arc::new(tokio::sync::Mutex::new(None));
        let canned = Canned {
            status,
            body,
            calls: calls.clone(),
            last_body: last_body.clone(),
        };
        let app = Router::new()
            .route("/api/generate", post(generate))
            .with_state(canned);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake ollama");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake ollama");
        });

        Self {
            base_url: format!("http://{}", addr),
            calls,
            last_body,
        }
    }

    /// A model that replies with `text` as its generated output.
    pub async fn replying(text: &str) -> Self {
        Self::start(
            StatusCode::OK,
            json!({ "model": "mistral:7b", "response": text, "done": true }),
        )
        .await
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn last_body(&self) -> Option<JsonValue> {
        self.last_body.lock().await.clone()
    }
}

pub fn app_for(ollama_url: &str) -> Router {
    let config = Config {
        ollama_url: ollama_url.to_string(),
        ..Config::default()
    };
    let state = AppState::new(&config).expect("app state");
    routes::router(state)
}

pub async fn post_json(app: &Router, uri: &str, body: JsonValue) -> (StatusCode, Option<String>, JsonValue) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let source = resp
        .headers()
        .get("x-quiz-source")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, source, body)
}

pub async fn post_form(app: &Router, uri: &str, fields: &[(&str, &str)]) -> (StatusCode, String) {
    let body: String = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get_page(app: &Router, uri: &str) -> (StatusCode, String) {
    let req = Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Pulls the session token out of a rendered page.
pub fn state_token(html: &str) -> String {
    let marker = r#"name="state" value=""#;
    let start = html.find(marker).expect("state field") + marker.len();
    let end = html[start..].find('"').expect("closing quote") + start;
    html[start..end].to_string()
}
