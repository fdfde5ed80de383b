//! ModelClient trait — the abstraction over the remote LLM endpoint.
//!
//! The context engine and the writer depend on this narrow contract only:
//! a prompt goes in, generated text comes out. HTTP, retries, and streaming
//! mechanics live entirely behind it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// A completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The fully assembled prompt (context + task instruction).
    pub prompt: String,

    /// The model to use (e.g. "deepseek-chat").
    pub model: String,

    /// Temperature (0.0 = deterministic, 1.0 = creative).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Whether to stream the response.
    #[serde(default)]
    pub stream: bool,
}

fn default_temperature() -> f32 {
    0.7
}

impl CompletionRequest {
    /// A request with default sampling settings.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            temperature: default_temperature(),
            max_tokens: None,
            stream: false,
        }
    }
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A complete (non-streaming) response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated text.
    pub content: String,

    /// Which model actually responded (may differ from requested).
    pub model: String,

    /// Token usage statistics, if the provider reported them.
    pub usage: Option<Usage>,
}

/// A single chunk in a streaming response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Partial content delta.
    #[serde(default)]
    pub content: Option<String>,

    /// Whether this is the final chunk.
    #[serde(default)]
    pub done: bool,

    /// Usage info (typically only in the final chunk).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// The model backend contract.
///
/// Implementations: DeepSeek (OpenAI-compatible endpoint), mock clients for
/// tests. The writer calls `complete()` or `stream()` without knowing which.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// A human-readable name for this client (e.g. "deepseek").
    fn name(&self) -> &str;

    /// Send a prompt and get the complete generated text.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError>;

    /// Send a prompt and get a stream of response chunks.
    ///
    /// Default implementation calls `complete()` and wraps the result as a
    /// single chunk.
    async fn stream(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<
        tokio::sync::mpsc::Receiver<std::result::Result<StreamChunk, ProviderError>>,
        ProviderError,
    > {
        let response = self.complete(request).await?;
        let (tx, rx) = tokio::sync::mpsc::channel(1);
        let _ = tx
            .send(Ok(StreamChunk {
                content: Some(response.content),
                done: true,
                usage: response.usage,
            }))
            .await;
        Ok(rx)
    }

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned;

    #[async_trait]
    impl ModelClient for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> std::result::Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                content: format!("echo: {}", request.prompt),
                model: request.model,
                usage: None,
            })
        }
    }

    #[test]
    fn request_defaults() {
        let req = CompletionRequest::new("Write chapter one", "deepseek-chat");
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(!req.stream);
        assert!(req.max_tokens.is_none());
    }

    #[tokio::test]
    async fn default_stream_wraps_complete() {
        let client = Canned;
        let mut rx = client
            .stream(CompletionRequest::new("hello", "deepseek-chat"))
            .await
            .unwrap();
        let chunk = rx.recv().await.unwrap().unwrap();
        assert!(chunk.done);
        assert_eq!(chunk.content.as_deref(), Some("echo: hello"));
        assert!(rx.recv().await.is_none());
    }
}
