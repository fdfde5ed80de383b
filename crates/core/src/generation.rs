//! Transient value objects that flow through one generation request.
//!
//! None of these are persisted. A `FullContext` is built once per request,
//! squeezed into a `GenerationContext` by the budget allocator, handed by
//! value to the model client, and discarded.

use serde::{Deserialize, Serialize};

/// The two context segments before budget enforcement.
///
/// `core` is the stable prompt material (outline, characters); `dynamic` is
/// the volatile part (recent and topically related chapter history).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullContext {
    pub core: String,
    pub dynamic: String,
}

/// The context actually sent alongside a task instruction, after budget
/// enforcement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationContext {
    pub core_context: String,
    pub dynamic_context: String,
    /// The budget that was enforced on the two segments combined.
    pub token_budget: usize,
    /// Budget left over after the segments' estimated cost.
    pub remaining_tokens: usize,
    /// The chapter being written. Nothing at or beyond this index was
    /// allowed into `dynamic_context`.
    pub chapter_index: usize,
}

/// A generated chapter, as returned by the writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub title: String,
    pub body: String,
}

/// Result of checking an outline for structural problems.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<String>,
}

impl ValidationReport {
    pub fn ok() -> Self {
        Self { valid: true, issues: Vec::new() }
    }

    pub fn with_issues(issues: Vec<String>) -> Self {
        Self { valid: issues.is_empty(), issues }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_report_validity_follows_issues() {
        assert!(ValidationReport::ok().valid);
        assert!(ValidationReport::with_issues(vec![]).valid);
        let report = ValidationReport::with_issues(vec!["missing premise".into()]);
        assert!(!report.valid);
        assert_eq!(report.issues.len(), 1);
    }

    #[test]
    fn generation_context_roundtrip() {
        let ctx = GenerationContext {
            core_context: "outline".into(),
            dynamic_context: "history".into(),
            token_budget: 1600,
            remaining_tokens: 120,
            chapter_index: 4,
        };
        let json = serde_json::to_string(&ctx).unwrap();
        let restored: GenerationContext = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ctx);
    }
}
