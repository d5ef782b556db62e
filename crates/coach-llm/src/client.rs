//! OpenAI-compatible chat completion client.
//!
//! Wraps async-openai with fixed model and sampling settings per client
//! instance, so callers with different determinism requirements can share
//! one underlying transport.

use std::time::Instant;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
    Client,
};
use coach_core::{CoachError, Message, MessageRole};
use tracing::info;

/// Token usage and timing metrics from an LLM call.
#[derive(Debug, Clone, Default)]
pub struct LlmMetrics {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub elapsed_ms: u64,
}

/// Complete response from an LLM call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub metrics: LlmMetrics,
}

/// Converts any error into a CoachError::LlmError.
fn llm_err(e: impl ToString) -> CoachError {
    CoachError::LlmError(e.to_string())
}

/// Builds the request message list: the system prompt followed by the
/// conversation history in chronological order.
fn build_messages(
    system_prompt: &str,
    history: &[Message],
) -> Result<Vec<ChatCompletionRequestMessage>, CoachError> {
    let mut messages = vec![ChatCompletionRequestMessage::System(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt)
            .build()
            .map_err(llm_err)?,
    )];

    for msg in history {
        let chat_msg = match msg.role {
            MessageRole::System => ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(msg.content.clone())
                    .build()
                    .map_err(llm_err)?,
            ),
            MessageRole::User => ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(msg.content.clone())
                    .build()
                    .map_err(llm_err)?,
            ),
            MessageRole::Assistant => ChatCompletionRequestMessage::Assistant(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .content(msg.content.clone())
                    .build()
                    .map_err(llm_err)?,
            ),
        };
        messages.push(chat_msg);
    }

    Ok(messages)
}

/// Extracts content and metrics from a completion response.
fn extract_response(
    response: CreateChatCompletionResponse,
    elapsed_ms: u64,
) -> Result<LlmResponse, CoachError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| CoachError::LlmError("No response content".into()))?;

    let (input_tokens, output_tokens) = response
        .usage
        .map(|u| (u.prompt_tokens, u.completion_tokens))
        .unwrap_or((0, 0));

    info!(
        "LLM: {}ms, tokens: {}/{} (in/out)",
        elapsed_ms, input_tokens, output_tokens
    );

    Ok(LlmResponse {
        content,
        metrics: LlmMetrics { input_tokens, output_tokens, elapsed_ms },
    })
}

/// Client for OpenAI-compatible chat completion APIs.
///
/// Model and temperature are fixed at construction; the underlying
/// transport can be shared across clients via [`LlmClient::with_client`].
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl LlmClient {
    /// Creates a client with its own transport, reading credentials from
    /// the environment.
    pub fn new(model: &str, temperature: f32) -> Self {
        Self::with_client(Client::new(), model, temperature)
    }

    /// Creates a client that reuses an existing transport.
    pub fn with_client(client: Client<OpenAIConfig>, model: &str, temperature: f32) -> Self {
        Self {
            client,
            model: model.to_string(),
            temperature,
        }
    }

    /// Sends the system prompt plus conversation history and returns the
    /// complete response.
    pub async fn chat_with_history(
        &self,
        system_prompt: &str,
        history: &[Message],
    ) -> Result<LlmResponse, CoachError> {
        let start = Instant::now();

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .messages(build_messages(system_prompt, history)?)
            .build()
            .map_err(llm_err)?;

        let response = self.client.chat().create(request).await.map_err(llm_err)?;
        extract_response(response, start.elapsed().as_millis() as u64)
    }

    /// Sends a simple system + user request.
    pub async fn chat(
        &self,
        system_prompt: &str,
        user_input: &str,
    ) -> Result<LlmResponse, CoachError> {
        self.chat_with_history(system_prompt, &[Message::user(user_input)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_comes_first_and_order_is_preserved() {
        let history = vec![
            Message::user("I want to run a marathon."),
            Message::assistant("What specific goal would you like to achieve?"),
            Message::user("Finish under four hours."),
        ];

        let messages = build_messages("coaching instructions", &history).unwrap();

        assert_eq!(messages.len(), 4);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(messages[2], ChatCompletionRequestMessage::Assistant(_)));
        assert!(matches!(messages[3], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_empty_history_yields_only_the_system_turn() {
        let messages = build_messages("coaching instructions", &[]).unwrap();
        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
    }

    #[test]
    fn test_system_turns_in_history_stay_system_turns() {
        let history = vec![Message::system("prior instructions"), Message::user("hi")];
        let messages = build_messages("outer", &history).unwrap();
        assert!(matches!(messages[1], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[2], ChatCompletionRequestMessage::User(_)));
    }
}
