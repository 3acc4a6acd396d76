//! AI provider implementations for CareerPath.
//!
//! All providers implement the `careerpath_core::Provider` trait and make
//! exactly one outbound call per `complete()`. Retrying lives in [`retry`]
//! and is composed around a provider by the caller.

mod http;

pub mod gemini;
pub mod openai_compat;
pub mod retry;
pub mod router;

pub use gemini::GeminiProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use retry::{RetryPolicy, Transient, retry_with_backoff};
pub use router::build_from_config;
