//! Generation orchestration for Storyloom.
//!
//! The writer sits between the context engine and the model client: it asks
//! [`storyloom_context::ContextBuilder`] for a budget-enforced context,
//! merges it with a task instruction, and hands the result to whatever
//! `ModelClient` it was given. Model output flows back into the knowledge
//! base as chapter summaries, closing the loop for future compositions.

pub mod prompts;
pub mod writer;

pub use writer::ChapterWriter;
