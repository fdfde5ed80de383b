//! The composition pipeline: knowledge base in, `GenerationContext` out.

use storyloom_core::{FullContext, GenerationContext, KnowledgeBase};

use crate::budget::enforce_budget;
use crate::composer::{compose_core, compose_dynamic};
use crate::token::estimate_tokens;

/// Builds budget-enforced generation contexts. Stateless — create one and
/// reuse it across requests; concurrent use is safe because every build reads
/// the knowledge base through a shared reference and touches nothing else.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    token_budget: usize,
    core_ratio: f64,
}

impl ContextBuilder {
    /// Create a builder with an explicit budget and core/dynamic split.
    pub fn new(token_budget: usize, core_ratio: f64) -> Self {
        Self {
            token_budget,
            core_ratio,
        }
    }

    /// Compose both segments from the knowledge base and enforce the budget
    /// for the chapter at `chapter_index`.
    pub fn build(&self, kb: &KnowledgeBase, chapter_index: usize) -> GenerationContext {
        let full = FullContext {
            core: compose_core(kb),
            dynamic: compose_dynamic(kb, chapter_index),
        };

        let core_tokens = estimate_tokens(&full.core);
        let dynamic_tokens = estimate_tokens(&full.dynamic);
        let ctx = enforce_budget(full, self.token_budget, self.core_ratio, chapter_index);

        tracing::debug!(
            chapter_index,
            core_tokens,
            dynamic_tokens,
            budget = self.token_budget,
            remaining = ctx.remaining_tokens,
            compressed = core_tokens + dynamic_tokens > self.token_budget,
            "Composed generation context"
        );

        ctx
    }
}

impl Default for ContextBuilder {
    /// The system default: 1600 tokens, 60% of it reserved for core.
    fn default() -> Self {
        Self::new(1600, 0.6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyloom_core::{Character, Outline};

    fn populated_kb() -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        kb.set_outline(Outline {
            title: "The Glass Orchard".into(),
            genre: "fantasy".into(),
            premise: "An orchard that grows memories.".into(),
            main_characters: vec![],
            plot_structure: vec![],
            worldbuilding: "Memories are a currency.".into(),
        });
        kb.upsert_character(Character::new("Ava", "protagonist"));
        for i in 0..5 {
            kb.push_summary(
                format!("Chapter {i}"),
                format!("Ava does something important in chapter {i}."),
                vec!["Ava".into()],
            );
        }
        kb
    }

    #[test]
    fn build_produces_both_segments() {
        let builder = ContextBuilder::default();
        let ctx = builder.build(&populated_kb(), 3);
        assert!(ctx.core_context.contains("The Glass Orchard"));
        assert!(ctx.dynamic_context.contains("chapter 0"));
        assert!(!ctx.dynamic_context.contains("chapter 3"));
        assert!(!ctx.dynamic_context.contains("chapter 4"));
        assert_eq!(ctx.chapter_index, 3);
        assert_eq!(ctx.token_budget, 1600);
    }

    #[test]
    fn build_is_deterministic() {
        let builder = ContextBuilder::default();
        let kb = populated_kb();
        let a = builder.build(&kb, 2);
        let b = builder.build(&kb, 2);
        assert_eq!(a, b);
    }

    #[test]
    fn build_never_mutates_the_knowledge_base() {
        let builder = ContextBuilder::default();
        let kb = populated_kb();
        let before = serde_json::to_string(&kb).unwrap();
        let _ = builder.build(&kb, 4);
        let after = serde_json::to_string(&kb).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn tiny_budget_still_returns_a_context() {
        let builder = ContextBuilder::new(1, 0.6);
        let ctx = builder.build(&populated_kb(), 3);
        // Degenerate but well-formed; callers must tolerate empty context.
        assert!(ctx.remaining_tokens <= 1);
    }

    #[test]
    fn empty_knowledge_base_composes_placeholder() {
        let builder = ContextBuilder::default();
        let ctx = builder.build(&KnowledgeBase::new(), 0);
        assert_eq!(ctx.core_context, crate::composer::NO_OUTLINE_PLACEHOLDER);
        assert_eq!(ctx.dynamic_context, "");
    }
}
