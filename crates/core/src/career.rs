//! Career domain types: the quiz answer set, the catalogue of career paths,
//! and the recommendation produced by quiz analysis.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Number of questions in the career quiz.
pub const QUESTION_COUNT: usize = 10;

/// The IT career paths the advisor is allowed to recommend.
pub const CAREER_PATHS: [&str; 10] = [
    "Frontend Developer",
    "Backend Developer",
    "UI/UX Designer",
    "Data Scientist",
    "Data Analyst",
    "DevOps Engineer",
    "Machine Learning Engineer",
    "Game Developer",
    "Mobile Developer",
    "Full Stack Developer",
];

/// The answers to the career quiz, one per question, in question order.
///
/// Always holds exactly [`QUESTION_COUNT`] entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswerSet(Vec<String>);

impl QuizAnswerSet {
    /// Build an answer set, rejecting any length other than [`QUESTION_COUNT`].
    pub fn new(answers: Vec<String>) -> Result<Self> {
        if answers.len() != QUESTION_COUNT {
            return Err(Error::Validation(format!(
                "expected {QUESTION_COUNT} answers, got {}",
                answers.len()
            )));
        }
        Ok(Self(answers))
    }

    /// Answers paired with their 1-based question number.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().enumerate().map(|(i, a)| (i + 1, a.as_str()))
    }
}

impl TryFrom<Vec<String>> for QuizAnswerSet {
    type Error = Error;

    fn try_from(answers: Vec<String>) -> Result<Self> {
        Self::new(answers)
    }
}

/// A validated career recommendation.
///
/// Only `careerPath` and `confidence` are checked. The list fields and any
/// extra keys the model adds are carried through exactly as returned: a key
/// the model omitted stays absent, an explicit `null` is written back as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerRecommendation {
    pub career_path: String,

    pub confidence: Value,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub reasons: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub learning_path: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub skills: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub resources: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only a missing key is `None`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl CareerRecommendation {
    /// Confidence as a number, when the model sent one (numeric strings included).
    pub fn confidence_score(&self) -> Option<f64> {
        match &self.confidence {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
            _ => None,
        }
    }

    /// The string entries of one of the list fields, skipping anything else.
    pub fn items(field: Option<&Value>) -> Vec<&str> {
        match field {
            Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(s)) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }

    /// Whether the recommended path is one of [`CAREER_PATHS`].
    pub fn is_known_path(&self) -> bool {
        CAREER_PATHS
            .iter()
            .any(|p| p.eq_ignore_ascii_case(self.career_path.trim()))
    }
}
