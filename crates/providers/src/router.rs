//! Builds the configured provider binding.
//!
//! The provider is constructed once at startup and shared read-only.

use std::sync::Arc;

use careerpath_config::AppConfig;
use careerpath_core::provider::Provider;

use crate::gemini::{self, GeminiProvider};
use crate::openai_compat::OpenAiCompatProvider;

/// Build the provider named by `config.provider`.
///
/// A missing API key still yields a provider; every call on it fails with
/// `NotConfigured`, so startup does not hinge on credentials.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn Provider> {
    let api_key = config.api_key.clone().unwrap_or_default();
    let timeout = config.request_timeout();

    if api_key.trim().is_empty() {
        tracing::warn!(provider = %config.provider, "No API key configured, AI calls will fail");
    }

    match config.provider.as_str() {
        "gemini" | "google" => {
            let base_url = config
                .api_url
                .clone()
                .unwrap_or_else(|| gemini::DEFAULT_BASE_URL.to_string());
            Arc::new(
                GeminiProvider::new(api_key)
                    .with_base_url(base_url)
                    .with_timeout(timeout),
            )
        }
        name => {
            let base_url = config
                .api_url
                .clone()
                .unwrap_or_else(|| default_base_url(name));
            Arc::new(OpenAiCompatProvider::new(name, base_url, api_key).with_timeout(timeout))
        }
    }
}

/// Get the default base URL for well-known OpenAI-compatible providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => "https://api.openai.com/v1".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_gemini() {
        let provider = build_from_config(&AppConfig::default());
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn openai_compatible_names() {
        let config = AppConfig {
            provider: "groq".into(),
            api_key: Some("gsk-test".into()),
            ..AppConfig::default()
        };
        assert_eq!(build_from_config(&config).name(), "groq");
    }

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openrouter").contains("openrouter.ai"));
        assert!(default_base_url("openai").contains("api.openai.com"));
        assert!(default_base_url("ollama").contains("localhost:11434"));
    }
}
