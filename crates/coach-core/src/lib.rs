//! Core domain types and error definitions for the coaching evaluation
//! harness.
//!
//! This crate defines the types shared across the harness: conversation
//! messages, rubric scores, grading outcomes, and the error enum.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while producing or grading coaching replies.
#[derive(Error, Debug)]
pub enum CoachError {
    #[error("LLM request failed: {0}")]
    LlmError(String),

    #[error("Failed to parse model output: {0}")]
    ParseError(String),

    #[error("Example has no user turn to grade")]
    MissingUserTurn,
}

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A single message in a conversation. Sequence order is chronological.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: MessageRole::System, content: content.into() }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: MessageRole::User, content: content.into() }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: MessageRole::Assistant, content: content.into() }
    }
}

/// One of the three binary rubric criteria used to grade a coaching reply:
/// does it ask about motivation, explain why motivation matters, and give
/// example motivations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RubricKey {
    #[serde(rename = "iscore")]
    IScore,
    #[serde(rename = "rscore")]
    RScore,
    #[serde(rename = "escore")]
    EScore,
}

impl RubricKey {
    /// All keys in their fixed grading order.
    pub const ALL: [RubricKey; 3] = [RubricKey::IScore, RubricKey::RScore, RubricKey::EScore];
}

/// A single graded rubric criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricScore {
    pub key: RubricKey,
    pub score: u8,
    pub explanation: String,
}

/// The three rubric scores produced by one grading pass, in fixed order
/// (iscore, rscore, escore).
///
/// An outcome is always total: either all three scores carry validated
/// values, or all three are forced to 0 with a failure explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingOutcome {
    pub scores: [RubricScore; 3],
}

impl GradingOutcome {
    /// Builds an outcome from three validated binary scores.
    pub fn from_scores(iscore: u8, rscore: u8, escore: u8) -> Self {
        Self {
            scores: [
                RubricScore {
                    key: RubricKey::IScore,
                    score: iscore,
                    explanation: format!("Question presence: {iscore}"),
                },
                RubricScore {
                    key: RubricKey::RScore,
                    score: rscore,
                    explanation: "Explanation presence".into(),
                },
                RubricScore {
                    key: RubricKey::EScore,
                    score: escore,
                    explanation: "Examples presence".into(),
                },
            ],
        }
    }

    /// Builds the degraded all-zero outcome used when the grader's reply
    /// cannot be parsed.
    pub fn parse_failure(reason: &str) -> Self {
        Self {
            scores: RubricKey::ALL.map(|key| RubricScore {
                key,
                score: 0,
                explanation: format!("Failed to parse score: {reason}"),
            }),
        }
    }

    /// Returns the score for the given rubric key.
    pub fn get(&self, key: RubricKey) -> u8 {
        self.scores
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.score)
            .unwrap_or(0)
    }
}
