//! The career advisor: orchestrates prompt rendering, the retrying provider
//! call, and validation for quiz analysis and chat.

use std::sync::Arc;

use careerpath_config::AppConfig;
use careerpath_core::career::{CareerRecommendation, QuizAnswerSet};
use careerpath_core::error::{Error, Result};
use careerpath_core::message::ConversationTurn;
use careerpath_core::provider::{CompletionRequest, Provider, ResponseFormat};
use careerpath_providers::{RetryPolicy, retry_with_backoff};
use tracing::{debug, info, warn};

use crate::prompt;
use crate::validator;

/// Reply used when the model returns an empty chat answer.
pub const CHAT_FALLBACK_REPLY: &str = "Maaf, saya tidak bisa memberikan respons saat ini.";

/// Tunables for the two advisor operations.
#[derive(Debug, Clone)]
pub struct AdvisorSettings {
    pub model: String,
    pub temperature: Option<f32>,
    pub analysis_retry: RetryPolicy,
    pub analysis_max_output_tokens: Option<u32>,
    pub chat_retry: RetryPolicy,
    pub chat_history_window: usize,
    pub chat_max_output_tokens: u32,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            temperature: None,
            analysis_retry: RetryPolicy::analysis(),
            analysis_max_output_tokens: None,
            chat_retry: RetryPolicy::chat(),
            chat_history_window: 4,
            chat_max_output_tokens: 150,
        }
    }
}

impl From<&AppConfig> for AdvisorSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            analysis_retry: RetryPolicy::new(
                config.analysis.max_attempts,
                config.analysis.initial_delay(),
            ),
            analysis_max_output_tokens: config.analysis.max_output_tokens,
            chat_retry: RetryPolicy::new(config.chat.max_attempts, config.chat.initial_delay()),
            chat_history_window: config.chat.history_window,
            chat_max_output_tokens: config.chat.max_output_tokens,
        }
    }
}

/// Career advisor over an injected provider.
///
/// Holds no per-request state, so one instance serves concurrent requests.
pub struct CareerAdvisor {
    provider: Arc<dyn Provider>,
    settings: AdvisorSettings,
}

impl CareerAdvisor {
    pub fn new(provider: Arc<dyn Provider>, settings: AdvisorSettings) -> Self {
        Self { provider, settings }
    }

    /// Build from configuration using an already-constructed provider.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(provider, AdvisorSettings::from(config))
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn settings(&self) -> &AdvisorSettings {
        &self.settings
    }

    /// Analyze quiz answers into a validated recommendation.
    ///
    /// Wrong answer counts are rejected before any provider call. Transient
    /// provider failures are retried; malformed replies are not.
    pub async fn analyze_quiz(&self, answers: Vec<String>) -> Result<CareerRecommendation> {
        let answers = QuizAnswerSet::new(answers)?;
        let prompt = prompt::quiz_analysis_prompt(&answers);

        let request = CompletionRequest::new(&self.settings.model, prompt)
            .with_response_format(ResponseFormat::Json)
            .with_max_output_tokens(self.settings.analysis_max_output_tokens)
            .with_temperature(self.settings.temperature);

        debug!(stage = "requesting", provider = %self.provider.name(), "Quiz analysis");
        let response = retry_with_backoff(&self.settings.analysis_retry, || {
            self.provider.complete(request.clone())
        })
        .await
        .map_err(|e| {
            warn!(stage = "failed", error = %e, "Quiz analysis request failed");
            Error::from(e)
        })?;

        debug!(stage = "validating", reply_len = response.text.len(), "Quiz analysis");
        let raw = if response.text.trim().is_empty() {
            "{}"
        } else {
            response.text.as_str()
        };

        let recommendation = validator::parse_recommendation(raw).inspect_err(|e| {
            warn!(stage = "failed", error = %e, reply = %raw, "Unusable analysis reply");
        })?;

        if !recommendation.is_known_path() {
            warn!(career_path = %recommendation.career_path, "Model recommended a path outside the catalogue");
        }

        info!(
            career_path = %recommendation.career_path,
            model = %response.model,
            total_tokens = response.usage.map(|u| u.total_tokens),
            "Quiz analysis done"
        );
        Ok(recommendation)
    }

    /// Answer one chat turn.
    ///
    /// Only the most recent turns of `history` reach the model. An empty
    /// message is a validation error; whitespace is passed on as typed.
    pub async fn chat(&self, message: &str, history: &[ConversationTurn]) -> Result<String> {
        if message.is_empty() {
            return Err(Error::Validation("message is required".into()));
        }

        let prompt = prompt::chat_prompt(history, message, self.settings.chat_history_window);
        let request = CompletionRequest::new(&self.settings.model, prompt)
            .with_max_output_tokens(Some(self.settings.chat_max_output_tokens))
            .with_temperature(self.settings.temperature);

        debug!(
            history_len = history.len(),
            window = self.settings.chat_history_window,
            "Chat turn"
        );

        let response = retry_with_backoff(&self.settings.chat_retry, || {
            self.provider.complete(request.clone())
        })
        .await
        .map_err(|e| {
            warn!(error = %e, "Chat request failed");
            Error::from(e)
        })?;

        let reply = response.text.trim();
        if reply.is_empty() {
            warn!("Model returned an empty chat reply");
            return Ok(CHAT_FALLBACK_REPLY.to_string());
        }

        Ok(reply.to_string())
    }
}
