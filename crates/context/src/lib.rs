//! Context composition and token-budget enforcement — the core engine.
//!
//! For every generation request this crate decides what slice of a growing
//! knowledge base is serialized into a fixed-size prompt, how it is
//! prioritized, and how it is compressed when it would overflow the model's
//! context window.
//!
//! # Pipeline
//!
//! | Stage | Input | Output |
//! |-------|-------|--------|
//! | 1. Compose core | outline + characters | stable segment |
//! | 2. Compose dynamic | chapter history < target | recent + related segment |
//! | 3. Enforce budget | both segments | `GenerationContext` |
//!
//! # Determinism
//!
//! Every function here is pure and synchronous: identical inputs always
//! produce identical outputs. The knowledge base is only ever read through an
//! immutable reference, never from ambient state, so concurrent compositions
//! for different chapters cannot interfere.

pub mod budget;
pub mod builder;
pub mod composer;
pub mod entities;
pub mod relevance;
pub mod token;

pub use budget::enforce_budget;
pub use builder::ContextBuilder;
pub use composer::{
    compose_core, compose_dynamic, validate_outline, NO_OUTLINE_PLACEHOLDER, RELATED_DELIMITER,
};
pub use entities::{extract_entities, MAX_ENTITIES};
pub use relevance::find_related;
pub use token::estimate_tokens;
