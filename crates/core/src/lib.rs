//! # Storyloom Core
//!
//! Domain types, traits, and error definitions for the Storyloom novel-writing
//! assistant. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The knowledge base is the single source of truth for everything the context
//! engine composes. It is owned and mutated by the calling application; the
//! engine only ever sees it through an immutable reference. The model backend
//! is defined as a trait here so the engine and writer never learn about HTTP,
//! retries, or streaming.

pub mod client;
pub mod error;
pub mod generation;
pub mod knowledge;

// Re-export key types at crate root for ergonomics
pub use client::{CompletionRequest, CompletionResponse, ModelClient, StreamChunk, Usage};
pub use error::{Error, ProviderError, Result};
pub use generation::{FullContext, GeneratedContent, GenerationContext, ValidationReport};
pub use knowledge::{
    ChapterSummary, Character, ConsistencyRule, KnowledgeBase, Outline, PlotPoint, Severity,
    WorldSetting,
};
