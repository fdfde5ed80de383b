//! Prompt templates.
//!
//! The context engine produces two opaque text segments; everything that
//! turns them into an actual instruction for the model lives here.

use storyloom_core::GenerationContext;

/// Merge a budget-enforced context with a task instruction.
pub fn chapter_prompt(instruction: &str, ctx: &GenerationContext) -> String {
    format!(
        "Core background:\n{}\n\nRecent developments:\n{}\n\nTask:\n{}",
        ctx.core_context, ctx.dynamic_context, instruction
    )
    .trim()
    .to_string()
}

/// Rewrite existing content under a specific instruction.
pub fn rewrite_prompt(content: &str, instruction: &str) -> String {
    format!(
        "Rewrite the following content according to this instruction:\n{instruction}\n\nOriginal content:\n{content}"
    )
}

/// Polish pass: tone and clarity only, no plot changes.
pub fn polish_prompt(content: &str) -> String {
    format!(
        "Improve the narrative tone and clarity of the following content, keeping the plot unchanged:\n\n{content}"
    )
}

/// Generate a structured outline from a free-text idea.
pub fn outline_prompt(description: &str, style: &str) -> String {
    format!(
        "Create a detailed novel outline for the following idea:\nDescription: {description}\nStyle: {style}\n\nInclude:\n1. The story premise\n2. Main characters (at least 3)\n3. Plot structure (three acts)\n4. World-building\n5. Chapter plan (at least 10 chapters)"
    )
}

/// Condense a finished chapter into a summary for the knowledge base.
pub fn summary_prompt(content: &str) -> String {
    format!(
        "Summarize the following chapter in a few sentences, keeping every character name and significant place name:\n\n{content}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_prompt_orders_context_before_task() {
        let ctx = GenerationContext {
            core_context: "OUTLINE".into(),
            dynamic_context: "HISTORY".into(),
            token_budget: 1600,
            remaining_tokens: 100,
            chapter_index: 2,
        };
        let prompt = chapter_prompt("Write chapter three.", &ctx);
        let core = prompt.find("OUTLINE").unwrap();
        let history = prompt.find("HISTORY").unwrap();
        let task = prompt.find("Write chapter three.").unwrap();
        assert!(core < history && history < task);
    }

    #[test]
    fn chapter_prompt_tolerates_empty_context() {
        let ctx = GenerationContext {
            core_context: String::new(),
            dynamic_context: String::new(),
            token_budget: 0,
            remaining_tokens: 0,
            chapter_index: 0,
        };
        let prompt = chapter_prompt("Write the opening.", &ctx);
        assert!(prompt.contains("Write the opening."));
    }

    #[test]
    fn rewrite_prompt_carries_both_parts() {
        let prompt = rewrite_prompt("old text", "make it tense");
        assert!(prompt.contains("old text"));
        assert!(prompt.contains("make it tense"));
    }
}
