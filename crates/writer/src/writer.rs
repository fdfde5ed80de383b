//! The chapter writer — orchestrates one generation request end to end.

use std::sync::Arc;

use tracing::debug;

use storyloom_context::{extract_entities, ContextBuilder};
use storyloom_core::client::{CompletionRequest, ModelClient, StreamChunk};
use storyloom_core::error::ProviderError;
use storyloom_core::{
    Error, GeneratedContent, GenerationContext, KnowledgeBase, Outline, Result,
};

use crate::prompts;

/// Orchestrates generation requests against a model client.
///
/// Holds no mutable state of its own; the knowledge base is borrowed per
/// call, so concurrent generations for different chapters cannot interfere.
pub struct ChapterWriter {
    client: Arc<dyn ModelClient>,
    builder: ContextBuilder,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl ChapterWriter {
    pub fn new(client: Arc<dyn ModelClient>, builder: ContextBuilder, model: impl Into<String>) -> Self {
        Self {
            client,
            builder,
            model: model.into(),
            temperature: 0.7,
            max_tokens: Some(2000),
        }
    }

    /// Override sampling settings.
    pub fn with_sampling(mut self, temperature: f32, max_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Compose the budget-enforced context for the chapter at `chapter_index`.
    ///
    /// Exposed so callers can inspect what the model will see.
    pub fn compose_context(&self, kb: &KnowledgeBase, chapter_index: usize) -> GenerationContext {
        self.builder.build(kb, chapter_index)
    }

    /// Generate the chapter at `chapter_index` from a task instruction.
    pub async fn generate_chapter(
        &self,
        kb: &KnowledgeBase,
        chapter_index: usize,
        instruction: &str,
    ) -> Result<GeneratedContent> {
        let ctx = self.builder.build(kb, chapter_index);
        let prompt = prompts::chapter_prompt(instruction, &ctx);
        debug!(chapter_index, prompt_len = prompt.len(), "Generating chapter");

        let response = self.client.complete(self.request(prompt)).await?;
        Ok(GeneratedContent {
            title: extract_title(instruction),
            body: response.content,
        })
    }

    /// Generate the chapter at `chapter_index`, streaming chunks as they
    /// arrive.
    pub async fn generate_chapter_stream(
        &self,
        kb: &KnowledgeBase,
        chapter_index: usize,
        instruction: &str,
    ) -> Result<tokio::sync::mpsc::Receiver<std::result::Result<StreamChunk, ProviderError>>> {
        let ctx = self.builder.build(kb, chapter_index);
        let prompt = prompts::chapter_prompt(instruction, &ctx);
        let mut request = self.request(prompt);
        request.stream = true;
        Ok(self.client.stream(request).await?)
    }

    /// Rewrite existing chapter content under a specific instruction.
    pub async fn rewrite_chapter(&self, content: &str, instruction: &str) -> Result<String> {
        let response = self
            .client
            .complete(self.request(prompts::rewrite_prompt(content, instruction)))
            .await?;
        Ok(response.content)
    }

    /// Polish chapter content for tone and clarity.
    pub async fn polish_chapter(&self, content: &str) -> Result<String> {
        let response = self
            .client
            .complete(self.request(prompts::polish_prompt(content)))
            .await?;
        Ok(response.content)
    }

    /// Generate a fresh outline from a free-text idea.
    ///
    /// The model's prose answer becomes the premise; structured refinement
    /// (characters, chapter plan) is a later editing step in the application.
    pub async fn generate_outline(&self, description: &str, style: &str) -> Result<Outline> {
        let response = self
            .client
            .complete(self.request(prompts::outline_prompt(description, style)))
            .await?;

        if response.content.trim().is_empty() {
            return Err(Error::Generation("model returned an empty outline".into()));
        }

        Ok(Outline {
            title: description.to_string(),
            genre: style.to_string(),
            premise: response.content,
            main_characters: Vec::new(),
            plot_structure: vec![
                "Act I: setup".into(),
                "Act II: confrontation".into(),
                "Act III: resolution".into(),
            ],
            worldbuilding: String::new(),
        })
    }

    /// Summarize a finished chapter and feed it back into the knowledge
    /// base, so future compositions can see it. Returns the assigned
    /// chapter index.
    pub async fn summarize_chapter(
        &self,
        kb: &mut KnowledgeBase,
        title: &str,
        content: &str,
    ) -> Result<usize> {
        let response = self
            .client
            .complete(self.request(prompts::summary_prompt(content)))
            .await?;

        let key_entities = extract_entities(&response.content);
        let index = kb.push_summary(title, response.content, key_entities);
        debug!(chapter_index = index, "Recorded chapter summary");
        Ok(index)
    }

    fn request(&self, prompt: String) -> CompletionRequest {
        CompletionRequest {
            prompt,
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        }
    }
}

/// The first non-empty line of the instruction, or a fixed fallback.
fn extract_title(instruction: &str) -> String {
    instruction
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("Untitled Chapter")
        .to_string()
}
