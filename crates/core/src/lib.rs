//! # CareerPath Core
//!
//! Domain types, traits, and error definitions for the CareerPath advisor.
//! This crate has **no framework dependencies**. It defines the domain model
//! that the provider adapters, the advisor, and the HTTP gateway build on.
//!
//! ## Layout
//!
//! - [`career`]: quiz answers, the career-path catalogue, and the validated
//!   recommendation
//! - [`message`]: conversation turns for the chat flow
//! - [`provider`]: the `Provider` trait every AI completion backend implements
//! - [`error`]: the error taxonomy shared by retry policy and HTTP mapping

pub mod career;
pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use career::{CAREER_PATHS, CareerRecommendation, QUESTION_COUNT, QuizAnswerSet};
pub use error::{Error, ProviderError, Result};
pub use message::{ConversationTurn, Role};
pub use provider::{CompletionRequest, CompletionResponse, Provider, ResponseFormat, Usage};
