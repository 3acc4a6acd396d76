//! HTTP API gateway for CareerPath.
//!
//! Endpoints:
//!
//! - `POST /api/analyze-quiz` — 10 quiz answers in, career recommendation out
//! - `POST /api/chat`         — one chat turn with recent history
//! - `GET  /health`           — liveness and build info
//!
//! Built on Axum. Every error leaves as `{ error, message, retry? }`.

pub mod error;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, Method, header};
use axum::response::Json;
use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use careerpath_advisor::CareerAdvisor;
use careerpath_config::{AppConfig, GatewayConfig};
use careerpath_core::career::CareerRecommendation;
use careerpath_core::error::Error;
use careerpath_core::message::ConversationTurn;

pub use error::{ApiError, ErrorBody};

const INVALID_ANSWERS: &str = "Format jawaban tidak valid. Harus 10 jawaban.";
const MESSAGE_REQUIRED: &str = "Message is required";
const INVALID_CHAT_BODY: &str = "Format pesan tidak valid.";

/// Shared application state for the gateway.
pub struct GatewayState {
    pub advisor: Arc<CareerAdvisor>,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl GatewayState {
    pub fn new(advisor: Arc<CareerAdvisor>) -> Self {
        Self {
            advisor,
            started_at: chrono::Utc::now(),
        }
    }
}

pub type SharedState = Arc<GatewayState>;

/// Build the API routes without transport layers.
pub fn api_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/analyze-quiz", post(analyze_quiz_handler))
        .route("/api/chat", post(chat_handler))
        .with_state(state)
}

/// Build the full router: API routes plus CORS, body limit, and trace logging.
pub fn build_router(state: SharedState, gateway: &GatewayConfig) -> Router {
    api_router(state)
        .layer(DefaultBodyLimit::max(gateway.max_body_bytes))
        .layer(cors_layer(&gateway.allowed_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// CORS for the configured UI origins; unparsable entries are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
///
/// The provider and advisor are built once here and shared by every request.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let provider = careerpath_providers::build_from_config(&config);
    let advisor = Arc::new(CareerAdvisor::from_config(provider, &config));
    let state = Arc::new(GatewayState::new(advisor));
    let app = build_router(state, &config.gateway);

    info!(addr = %addr, provider = %config.provider, model = %config.model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

// --- Handlers ---

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: String,
    pub model: String,
    pub uptime_secs: i64,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        provider: state.advisor.provider().name().to_string(),
        model: state.advisor.settings().model.clone(),
        uptime_secs: (chrono::Utc::now() - state.started_at).num_seconds(),
    })
}

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default)]
    answers: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize)]
pub struct QuizResponse {
    pub success: bool,
    pub recommendation: CareerRecommendation,
}

/// `POST /api/analyze-quiz`
async fn analyze_quiz_handler(
    State(state): State<SharedState>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> Result<Json<QuizResponse>, ApiError> {
    let answers = match payload {
        Ok(Json(QuizRequest {
            answers: Some(answers),
        })) => answers,
        Ok(_) => return Err(ApiError::bad_request("Invalid request", INVALID_ANSWERS)),
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable quiz request");
            return Err(ApiError::bad_request("Invalid request", INVALID_ANSWERS));
        }
    };

    info!(answers = answers.len(), "Quiz analysis request");

    let recommendation = state
        .advisor
        .analyze_quiz(answers)
        .await
        .map_err(|e| match e {
            Error::Validation(_) => ApiError::bad_request("Invalid request", INVALID_ANSWERS),
            other => ApiError::from(other),
        })?;

    Ok(Json(QuizResponse {
        success: true,
        recommendation,
    }))
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    history: Option<Vec<ConversationTurn>>,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
}

/// `POST /api/chat`
async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable chat request");
            return Err(ApiError::bad_request("Invalid request", INVALID_CHAT_BODY));
        }
    };

    let Some(message) = request.message.filter(|m| !m.is_empty()) else {
        return Err(ApiError::bad_request("Invalid request", MESSAGE_REQUIRED));
    };
    let history = request.history.unwrap_or_default();

    info!(message_len = message.len(), history_len = history.len(), "Chat request");

    let reply = state.advisor.chat(&message, &history).await?;

    Ok(Json(ChatResponse {
        success: true,
        message: reply,
    }))
}
