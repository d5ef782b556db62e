use coach_core::{CoachError, Message};
use coach_llm::LlmClient;
use tracing::info;

use crate::prompts::COACHING_PROMPT;

/// Produces one coaching turn for a recorded conversation.
pub struct CoachingResponder {
    client: LlmClient,
    system_prompt: String,
}

impl CoachingResponder {
    /// Creates a responder with the default coaching prompt.
    pub fn new(client: LlmClient) -> Self {
        Self::with_system_prompt(client, COACHING_PROMPT)
    }

    /// Creates a responder with a substituted instructional prompt.
    pub fn with_system_prompt(client: LlmClient, system_prompt: impl Into<String>) -> Self {
        Self {
            client,
            system_prompt: system_prompt.into(),
        }
    }

    /// Prepends the instructional prompt to the history and returns the
    /// model's reply as an assistant turn. Transport failures propagate.
    pub async fn respond(&self, history: &[Message]) -> Result<Message, CoachError> {
        info!("RESPONDER: Producing coaching reply ({} prior turns)", history.len());

        let response = self
            .client
            .chat_with_history(&self.system_prompt, history)
            .await?;

        Ok(Message::assistant(response.content))
    }
}
