//! Chat completion client for OpenAI-compatible APIs.
//!
//! Provides the message assembly and response extraction shared by the
//! coaching responder and the response grader.

mod client;

pub use client::{LlmClient, LlmMetrics, LlmResponse};
