//! A scripted model client for tests.
//!
//! Queue up responses (or errors) and inspect the prompts that were sent.
//! Once the queue runs dry every call returns the fallback text.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use storyloom_core::client::{CompletionRequest, CompletionResponse, ModelClient};
use storyloom_core::error::ProviderError;

/// A model client that replays scripted responses.
pub struct MockClient {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
    fallback: String,
}

impl MockClient {
    /// A client that always answers with `fallback`.
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            fallback: fallback.into(),
        }
    }

    /// Queue a successful response.
    pub fn push_response(&self, content: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(content.into()));
    }

    /// Queue an error.
    pub fn push_error(&self, error: ProviderError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// All prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of completion calls made.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let scripted = self.responses.lock().unwrap().pop_front();
        let content = match scripted {
            Some(Ok(content)) => content,
            Some(Err(e)) => return Err(e),
            None => self.fallback.clone(),
        };
        Ok(CompletionResponse {
            content,
            model: request.model,
            usage: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_responses_in_order_then_fallback() {
        let mock = MockClient::new("fallback");
        mock.push_response("first");
        mock.push_response("second");

        let req = CompletionRequest::new("p", "m");
        assert_eq!(mock.complete(req.clone()).await.unwrap().content, "first");
        assert_eq!(mock.complete(req.clone()).await.unwrap().content, "second");
        assert_eq!(mock.complete(req).await.unwrap().content, "fallback");
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn scripted_error_is_returned() {
        let mock = MockClient::new("fallback");
        mock.push_error(ProviderError::Network("connection reset".into()));
        let err = mock
            .complete(CompletionRequest::new("p", "m"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }

    #[tokio::test]
    async fn prompts_are_recorded() {
        let mock = MockClient::new("ok");
        let _ = mock.complete(CompletionRequest::new("alpha", "m")).await;
        let _ = mock.complete(CompletionRequest::new("beta", "m")).await;
        assert_eq!(mock.prompts(), vec!["alpha", "beta"]);
    }
}
