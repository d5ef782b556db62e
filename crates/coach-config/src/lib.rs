//! Harness settings and evaluation dataset loading.
//!
//! Settings come from environment variables with defaults matching the
//! original deployment; datasets are JSON files mirroring the recorded
//! conversation shape.

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use coach_core::{Message, MessageRole};
use serde::{Deserialize, Serialize};

/// Configuration and dataset loading errors.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON.
    #[error("Failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// Dataset validation failed.
    #[error("Invalid dataset '{dataset}': {message}")]
    Validation { dataset: String, message: String },
}

/// Harness settings sourced from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub coach_model: String,
    pub coach_temperature: f32,
    pub grader_model: String,
    pub grader_temperature: f32,
    pub dataset_path: String,
    pub experiment_prefix: String,
    pub system_prompt_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            coach_model: "gpt-4".into(),
            coach_temperature: 0.2,
            grader_model: "gpt-4o".into(),
            grader_temperature: 0.0,
            dataset_path: "datasets/coaching_prompts.json".into(),
            experiment_prefix: "Basic prompt tests".into(),
            system_prompt_path: None,
        }
    }
}

impl Settings {
    /// Loads settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            coach_model: env_or("COACH_MODEL", defaults.coach_model),
            coach_temperature: env_parse_or("COACH_TEMPERATURE", defaults.coach_temperature),
            grader_model: env_or("GRADER_MODEL", defaults.grader_model),
            grader_temperature: env_parse_or("GRADER_TEMPERATURE", defaults.grader_temperature),
            dataset_path: env_or("COACH_DATASET", defaults.dataset_path),
            experiment_prefix: env_or("EXPERIMENT_PREFIX", defaults.experiment_prefix),
            system_prompt_path: env::var("COACH_SYSTEM_PROMPT_FILE").ok(),
        }
    }

    /// Reads the coaching prompt override, if one is configured.
    pub fn system_prompt(&self) -> Result<Option<String>, ConfigError> {
        match &self.system_prompt_path {
            Some(path) => fs::read_to_string(path)
                .map(Some)
                .map_err(|source| ConfigError::Io { path: path.clone(), source }),
            None => Ok(None),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn env_parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// A single evaluation example: one recorded conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalExample {
    pub messages: Vec<Message>,
}

impl EvalExample {
    /// Returns the latest user turn's content, the text the grader grades
    /// the reply against.
    pub fn goal_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }
}

/// A named collection of evaluation examples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub examples: Vec<EvalExample>,
}

impl Dataset {
    /// Parses and validates a dataset from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let dataset: Dataset = serde_json::from_str(json)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Loads and validates a dataset from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.examples.is_empty() {
            return Err(ConfigError::Validation {
                dataset: self.name.clone(),
                message: "contains no examples".into(),
            });
        }

        for (idx, example) in self.examples.iter().enumerate() {
            match example.messages.last() {
                Some(m) if m.role == MessageRole::User => {}
                _ => {
                    return Err(ConfigError::Validation {
                        dataset: self.name.clone(),
                        message: format!("example {idx} must end with a user turn"),
                    })
                }
            }
        }

        Ok(())
    }
}
