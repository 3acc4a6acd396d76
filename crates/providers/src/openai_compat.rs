//! OpenAI-compatible provider implementation.
//!
//! Works with: OpenAI, OpenRouter, Groq, DeepSeek, Ollama, vLLM, and any
//! endpoint exposing `/v1/chat/completions`. The prompt is sent as a single
//! user message; JSON output is requested via `response_format`.
//!
//! Endpoints on the local machine (Ollama, vLLM) may be used without a key.

use std::time::Duration;

use async_trait::async_trait;
use careerpath_core::error::ProviderError;
use careerpath_core::provider::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::http;

/// An OpenAI-compatible completion client.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            timeout: http::DEFAULT_TIMEOUT,
        }
    }

    /// Replace the per-call HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Attach the per-call timeout and, when one is set, the bearer key.
    fn prepare(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.timeout(self.timeout);
        if self.has_key() {
            builder.bearer_auth(&self.api_key)
        } else {
            builder
        }
    }

    fn to_api_request(request: &CompletionRequest) -> ApiRequest {
        ApiRequest {
            model: request.model.clone(),
            messages: vec![ApiMessage {
                role: "user".into(),
                content: Some(request.prompt.clone()),
            }],
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
            response_format: match request.response_format {
                ResponseFormat::Json => Some(ApiResponseFormat {
                    r#type: "json_object".into(),
                }),
                ResponseFormat::Text => None,
            },
            stream: false,
        }
    }
}

#[async_trait]
impl careerpath_core::Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError> {
        if !self.has_key() && !is_local_endpoint(&self.base_url) {
            return Err(ProviderError::NotConfigured(format!(
                "API key for provider '{}' is missing",
                self.name
            )));
        }

        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::to_api_request(&request);

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .prepare(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(http::send_error)?;

        let status = response.status().as_u16();

        if !response.status().is_success() {
            let retry_after = http::retry_after_secs(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            warn!(provider = %self.name, status, body = %error_body, "Provider returned error");
            return Err(http::error_for_status(status, retry_after, error_body));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let text = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(CompletionResponse {
            text,
            model: api_response.model.unwrap_or(request.model),
            usage,
        })
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let response = self
            .prepare(self.client.get(format!("{}/models", self.base_url)))
            .send()
            .await
            .map_err(http::send_error)?;

        Ok(response.status().is_success())
    }
}

/// Whether `base_url` points at this machine.
fn is_local_endpoint(base_url: &str) -> bool {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| {
            url.host_str()
                .map(|host| matches!(host, "localhost" | "127.0.0.1" | "[::1]" | "0.0.0.0"))
        })
        .unwrap_or(false)
}

// --- OpenAI API types ---

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ApiResponseFormat>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ApiResponseFormat {
    r#type: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use careerpath_core::Provider;

    #[test]
    fn local_endpoints() {
        assert!(is_local_endpoint("http://localhost:11434/v1"));
        assert!(is_local_endpoint("http://127.0.0.1:8000/v1"));
        assert!(is_local_endpoint("http://[::1]:8000/v1"));
        assert!(!is_local_endpoint("https://api.openai.com/v1"));
        assert!(!is_local_endpoint("not a url"));
    }

    #[test]
    fn keyless_request_has_no_auth_header() {
        let provider = OpenAiCompatProvider::new("ollama", "http://localhost:11434/v1", "")
            .with_timeout(Duration::from_secs(9));
        let request = provider
            .prepare(provider.client.post("http://localhost:11434/v1/chat/completions"))
            .build()
            .unwrap();
        assert!(request.headers().get("authorization").is_none());
        assert_eq!(request.timeout(), Some(&Duration::from_secs(9)));

        let keyed = OpenAiCompatProvider::new("openai", "https://api.openai.com/v1", "sk-test");
        let request = keyed
            .prepare(keyed.client.post("https://api.openai.com/v1/chat/completions"))
            .build()
            .unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer sk-test");
        assert_eq!(request.timeout(), Some(&http::DEFAULT_TIMEOUT));
    }

    #[test]
    fn trailing_slash_trimmed() {
        let provider = OpenAiCompatProvider::new("vllm", "http://localhost:8000/v1/", "k");
        assert_eq!(provider.base_url, "http://localhost:8000/v1");
    }

    #[test]
    fn json_request_conversion() {
        let request = CompletionRequest::new("gpt-4o-mini", "Berikan JSON")
            .with_response_format(ResponseFormat::Json)
            .with_temperature(Some(0.2));
        let body = serde_json::to_value(OpenAiCompatProvider::to_api_request(&request)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Berikan JSON");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert!(body.get("max_tokens").is_none());
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn chat_request_conversion() {
        let request =
            CompletionRequest::new("gpt-4o-mini", "Halo").with_max_output_tokens(Some(150));
        let body = serde_json::to_value(OpenAiCompatProvider::to_api_request(&request)).unwrap();
        assert_eq!(body["max_tokens"], 150);
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn response_parsing() {
        let raw = r#"{
            "model": "gpt-4o-mini-2024",
            "choices": [{"message": {"role": "assistant", "content": "Coba belajar SQL dulu."}}],
            "usage": {"prompt_tokens": 40, "completion_tokens": 8, "total_tokens": 48}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.model.as_deref(), Some("gpt-4o-mini-2024"));
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Coba belajar SQL dulu.")
        );
        assert_eq!(parsed.usage.unwrap().total_tokens, 48);
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let provider = OpenAiCompatProvider::new("openai", "https://api.openai.com/v1", "");
        let result = provider
            .complete(CompletionRequest::new("gpt-4o-mini", "hi"))
            .await;
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn local_endpoint_is_called_without_key() {
        // Nothing listens on port 1, so reaching the network shows up as Network.
        let provider = OpenAiCompatProvider::new("ollama", "http://127.0.0.1:1/v1", "");
        let result = provider
            .complete(CompletionRequest::new("llama3", "hi"))
            .await;
        assert!(matches!(result, Err(ProviderError::Network(_))));
    }
}
