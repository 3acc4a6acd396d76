//! Career advisor orchestration for CareerPath.
//!
//! Composes the pieces of a quiz-analysis or chat request:
//!
//! - [`prompt`]: pure prompt rendering
//! - [`validator`]: fence stripping and recommendation checks
//! - [`advisor`]: the `CareerAdvisor` service that runs a provider call
//!   under the retry policy and validates the result

pub mod advisor;
pub mod prompt;
pub mod validator;

pub use advisor::{AdvisorSettings, CHAT_FALLBACK_REPLY, CareerAdvisor};
pub use validator::{parse_recommendation, strip_code_fences};
