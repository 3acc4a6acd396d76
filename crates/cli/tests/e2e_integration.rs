//! End-to-end integration tests for the CareerPath service.
//!
//! A mock Gemini server runs on an ephemeral local port. The real provider,
//! advisor, and gateway router are wired to it through `AppConfig`, so these
//! tests cover the full path from HTTP request to upstream call and back.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode, Uri};
use axum::response::Json;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use careerpath_advisor::CareerAdvisor;
use careerpath_config::AppConfig;
use careerpath_gateway::{GatewayState, build_router};

// ── Mock Gemini ──────────────────────────────────────────────────────────

struct Recorded {
    path: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone, Default)]
struct MockGemini {
    script: Arc<Mutex<VecDeque<(StatusCode, Value)>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockGemini {
    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> (String, Option<String>, Value) {
        let requests = self.requests.lock().unwrap();
        let r = &requests[index];
        (r.path.clone(), r.api_key.clone(), r.body.clone())
    }
}

async fn generate(
    State(mock): State<MockGemini>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.requests.lock().unwrap().push(Recorded {
        path: uri.path().to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
    });

    let next = mock.script.lock().unwrap().pop_front();
    match next {
        Some((status, body)) => (status, Json(body)),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "code": 500, "message": "script exhausted" } })),
        ),
    }
}

fn gemini_text(text: &str) -> (StatusCode, Value) {
    (
        StatusCode::OK,
        json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }],
            "usageMetadata": { "promptTokenCount": 120, "candidatesTokenCount": 40, "totalTokenCount": 160 },
            "modelVersion": "gemini-2.5-flash"
        }),
    )
}

fn gemini_error(code: u16, message: &str, status: &str) -> (StatusCode, Value) {
    (
        StatusCode::from_u16(code).unwrap(),
        json!({ "error": { "code": code, "message": message, "status": status } }),
    )
}

/// Start the mock upstream and return the gateway router wired to it.
async fn setup(script: Vec<(StatusCode, Value)>) -> (Router, MockGemini) {
    let mock = MockGemini {
        script: Arc::new(Mutex::new(script.into())),
        ..MockGemini::default()
    };

    let upstream = Router::new().fallback(generate).with_state(mock.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    let mut config = AppConfig::default();
    config.api_key = Some("test-key".into());
    config.api_url = Some(format!("http://{addr}/v1beta"));
    config.request_timeout_secs = 5;
    config.analysis.initial_delay_ms = 1;
    config.chat.initial_delay_ms = 1;

    let provider = careerpath_providers::build_from_config(&config);
    let advisor = Arc::new(CareerAdvisor::from_config(provider, &config));
    let router = build_router(Arc::new(GatewayState::new(advisor)), &config.gateway);

    (router, mock)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn quiz_answers() -> Value {
    json!([
        "Membangun API dan server",
        "Logika",
        "Analitis",
        "Database",
        "Tim kecil",
        "Tinggi",
        "Perusahaan teknologi",
        "Terminal",
        "Backend",
        "Sedang"
    ])
}

const RECOMMENDATION: &str = "```json\n{\n  \"careerPath\": \"Backend Developer\",\n  \"confidence\": 87,\n  \"reasons\": [\"Suka logika\", \"Tertarik server\"],\n  \"learningPath\": [\"Belajar HTTP\", \"Belajar SQL\"],\n  \"skills\": [\"Go\", \"PostgreSQL\"],\n  \"resources\": [\"roadmap.sh/backend\"]\n}\n```";

// ── Quiz analysis ────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_quiz_analysis_fenced_reply() {
    let (router, mock) = setup(vec![gemini_text(RECOMMENDATION)]).await;

    let (status, body) = send(
        router,
        post_json("/api/analyze-quiz", json!({ "answers": quiz_answers() })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["recommendation"]["careerPath"], "Backend Developer");
    assert_eq!(body["recommendation"]["confidence"], 87);
    assert_eq!(body["recommendation"]["skills"][1], "PostgreSQL");

    assert_eq!(mock.calls(), 1);
    let (path, api_key, request) = mock.request(0);
    assert_eq!(path, "/v1beta/models/gemini-2.5-flash:generateContent");
    assert_eq!(api_key.as_deref(), Some("test-key"));
    assert_eq!(
        request["generationConfig"]["responseMimeType"],
        "application/json"
    );
    let prompt = request["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("1. Membangun API dan server"));
    assert!(prompt.contains("10. Sedang"));
}

#[tokio::test]
async fn e2e_quiz_retries_overloaded_upstream() {
    let (router, mock) = setup(vec![
        gemini_error(503, "The model is overloaded.", "UNAVAILABLE"),
        gemini_text(RECOMMENDATION),
    ])
    .await;

    let (status, body) = send(
        router,
        post_json("/api/analyze-quiz", json!({ "answers": quiz_answers() })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendation"]["careerPath"], "Backend Developer");
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn e2e_quiz_gives_up_after_three_attempts() {
    let (router, mock) = setup(vec![
        gemini_error(503, "The model is overloaded.", "UNAVAILABLE"),
        gemini_error(503, "The model is overloaded.", "UNAVAILABLE"),
        gemini_error(503, "The model is overloaded.", "UNAVAILABLE"),
    ])
    .await;

    let (status, body) = send(
        router,
        post_json("/api/analyze-quiz", json!({ "answers": quiz_answers() })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["retry"], true);
    assert!(!body["message"].as_str().unwrap().contains("overloaded"));
    assert_eq!(mock.calls(), 3);
}

#[tokio::test]
async fn e2e_quiz_permanent_upstream_error_is_not_retried() {
    let (router, mock) = setup(vec![gemini_error(
        400,
        "API key not valid. Please pass a valid API key.",
        "INVALID_ARGUMENT",
    )])
    .await;

    let (status, body) = send(
        router,
        post_json("/api/analyze-quiz", json!({ "answers": quiz_answers() })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert!(!body["message"].as_str().unwrap().contains("API key"));
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn e2e_quiz_prose_reply_is_malformed() {
    let (router, mock) = setup(vec![gemini_text(
        "Menurut saya kamu cocok jadi Backend Developer!",
    )])
    .await;

    let (status, body) = send(
        router,
        post_json("/api/analyze-quiz", json!({ "answers": quiz_answers() })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["retry"], true);
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn e2e_quiz_wrong_answer_count_never_reaches_upstream() {
    let (router, mock) = setup(vec![gemini_text(RECOMMENDATION)]).await;

    let (status, body) = send(
        router,
        post_json("/api/analyze-quiz", json!({ "answers": ["a", "b", "c"] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("retry").is_none());
    assert_eq!(mock.calls(), 0);
}

// ── Chat ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_chat_with_history() {
    let (router, mock) = setup(vec![gemini_text(
        "  Mulai dari Python dan statistik dasar.  ",
    )])
    .await;

    let history: Vec<Value> = (1..=6)
        .map(|i| {
            let role = if i % 2 == 1 { "user" } else { "assistant" };
            json!({ "role": role, "content": format!("giliran-{i}") })
        })
        .collect();

    let (status, body) = send(
        router,
        post_json(
            "/api/chat",
            json!({ "message": "Gimana jadi data scientist?", "history": history }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Mulai dari Python dan statistik dasar.");

    let (_, _, request) = mock.request(0);
    assert_eq!(request["generationConfig"]["maxOutputTokens"], 150);
    let prompt = request["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(!prompt.contains("giliran-2"));
    assert!(prompt.contains("User: giliran-3"));
    assert!(prompt.contains("Assistant: giliran-6"));
    assert!(prompt.contains("User: Gimana jadi data scientist?"));
}

#[tokio::test]
async fn e2e_chat_empty_reply_uses_fallback() {
    let (router, _mock) = setup(vec![gemini_text("   ")]).await;

    let (status, body) = send(router, post_json("/api/chat", json!({ "message": "Halo" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        careerpath_advisor::CHAT_FALLBACK_REPLY
    );
}

#[tokio::test]
async fn e2e_chat_rate_limited_after_two_attempts() {
    let (router, mock) = setup(vec![
        gemini_error(429, "Resource has been exhausted", "RESOURCE_EXHAUSTED"),
        gemini_error(429, "Resource has been exhausted", "RESOURCE_EXHAUSTED"),
    ])
    .await;

    let (status, body) = send(router, post_json("/api/chat", json!({ "message": "Halo" }))).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Rate limit exceeded");
    assert_eq!(body["retry"], true);
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn e2e_chat_missing_message() {
    let (router, mock) = setup(vec![]).await;

    let (status, _) = send(router, post_json("/api/chat", json!({ "history": [] }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(mock.calls(), 0);
}

// ── Health ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_health_reports_provider() {
    let (router, _mock) = setup(vec![]).await;

    let (status, body) = send(
        router,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["provider"], "gemini");
    assert_eq!(body["model"], "gemini-2.5-flash");
}
