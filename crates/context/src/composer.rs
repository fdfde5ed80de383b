//! Context composition — turning a knowledge base into the two prompt
//! segments.
//!
//! The core segment (outline + characters) rarely changes across a session;
//! the dynamic segment (recent + related chapter history) changes with every
//! chapter. Both are plain text; budget enforcement happens later in
//! [`crate::budget`].

use storyloom_core::{KnowledgeBase, Outline, ValidationReport};

use crate::entities::extract_entities;
use crate::relevance::find_related;

/// Substituted when no outline exists yet. Missing outline is not an error.
pub const NO_OUTLINE_PLACEHOLDER: &str = "No outline yet";

/// Separates the chronological history from the related-but-distant section,
/// so the model client can tell "recent" from "related".
pub const RELATED_DELIMITER: &str = "[Related History]";

/// Compose the stable segment: outline title, premise, worldbuilding, then
/// one line per character. With no outline the placeholder stands in; with no
/// characters the character block is omitted entirely.
pub fn compose_core(kb: &KnowledgeBase) -> String {
    let mut out = match &kb.outline {
        Some(outline) => format!(
            "{}\n{}\n{}",
            outline.title, outline.premise, outline.worldbuilding
        ),
        None => NO_OUTLINE_PLACEHOLDER.to_string(),
    };

    if !kb.characters.is_empty() {
        out.push_str("\nCharacters:\n");
        let lines: Vec<String> = kb
            .characters
            .iter()
            .map(|c| format!("{} ({}): {}", c.name, c.role, c.traits.join(", ")))
            .collect();
        out.push_str(&lines.join("\n"));
    }

    out
}

/// Compose the volatile segment for the chapter at `target_index`.
///
/// Only summaries strictly before the target are eligible — the chapter being
/// written, and anything after it, is never shown to the model. Entities
/// extracted from that window drive a relevance pass over the whole summary
/// set (still capped below the target), so older, topically related chapters
/// resurface even when chronologically distant.
pub fn compose_dynamic(kb: &KnowledgeBase, target_index: usize) -> String {
    let window: Vec<&storyloom_core::ChapterSummary> = kb
        .chapter_summaries
        .iter()
        .filter(|s| s.chapter_index < target_index)
        .collect();

    let chronological = window
        .iter()
        .map(|s| s.summary.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let entities = extract_entities(&chronological);
    let related: Vec<&storyloom_core::ChapterSummary> =
        find_related(&entities, &kb.chapter_summaries)
            .into_iter()
            .filter(|s| s.chapter_index < target_index)
            .collect();

    if related.is_empty() {
        return chronological;
    }

    let related_text = related
        .iter()
        .map(|s| s.summary.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    format!("{chronological}\n{RELATED_DELIMITER}\n{related_text}")
}

/// Check an outline for the structural problems that make generation drift:
/// no outline at all, a missing premise, or no main characters.
pub fn validate_outline(outline: Option<&Outline>) -> ValidationReport {
    let Some(outline) = outline else {
        return ValidationReport::with_issues(vec!["outline is missing".into()]);
    };

    let mut issues = Vec::new();
    if outline.premise.trim().is_empty() {
        issues.push("premise is missing".into());
    }
    if outline.main_characters.is_empty() {
        issues.push("at least one main character is required".into());
    }
    ValidationReport::with_issues(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyloom_core::{ChapterSummary, Character};

    fn outline() -> Outline {
        Outline {
            title: "The Glass Orchard".into(),
            genre: "fantasy".into(),
            premise: "An orchard that grows memories.".into(),
            main_characters: vec![Character::new("Ava", "protagonist")],
            plot_structure: vec!["Act I".into()],
            worldbuilding: "Memories are a currency.".into(),
        }
    }

    fn kb_with_summaries(texts: &[(usize, &str)]) -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        for (index, text) in texts {
            kb.chapter_summaries.push(ChapterSummary {
                chapter_index: *index,
                title: format!("Chapter {index}"),
                summary: (*text).into(),
                key_entities: vec![],
            });
        }
        kb
    }

    // ── compose_core ──

    #[test]
    fn empty_knowledge_base_yields_bare_placeholder() {
        let kb = KnowledgeBase::new();
        assert_eq!(compose_core(&kb), NO_OUTLINE_PLACEHOLDER);
    }

    #[test]
    fn core_concatenates_in_fixed_order() {
        let mut kb = KnowledgeBase::new();
        kb.set_outline(outline());
        let mut ava = Character::new("Ava", "protagonist");
        ava.traits = vec!["stubborn".into(), "curious".into()];
        kb.upsert_character(ava);

        let core = compose_core(&kb);
        let title_pos = core.find("The Glass Orchard").unwrap();
        let premise_pos = core.find("grows memories").unwrap();
        let world_pos = core.find("currency").unwrap();
        let chars_pos = core.find("Characters:").unwrap();
        assert!(title_pos < premise_pos && premise_pos < world_pos && world_pos < chars_pos);
        assert!(core.contains("Ava (protagonist): stubborn, curious"));
    }

    #[test]
    fn characters_without_outline_still_listed() {
        let mut kb = KnowledgeBase::new();
        kb.upsert_character(Character::new("Bram", "mentor"));
        let core = compose_core(&kb);
        assert!(core.starts_with(NO_OUTLINE_PLACEHOLDER));
        assert!(core.contains("Bram (mentor):"));
    }

    // ── compose_dynamic ──

    #[test]
    fn dynamic_never_sees_the_future() {
        let kb = kb_with_summaries(&[
            (0, "Ava plants the first tree."),
            (1, "The orchard blooms."),
            (2, "Ava meets Bram."),
            (3, "Ava betrays Bram."),
            (4, "The orchard burns."),
        ]);
        let dynamic = compose_dynamic(&kb, 3);
        assert!(!dynamic.contains("betrays"));
        assert!(!dynamic.contains("burns"));
        // chronological order of the included window
        let p0 = dynamic.find("first tree").unwrap();
        let p1 = dynamic.find("blooms").unwrap();
        let p2 = dynamic.find("meets Bram").unwrap();
        assert!(p0 < p1 && p1 < p2);
    }

    #[test]
    fn related_section_appended_after_delimiter() {
        let kb = kb_with_summaries(&[
            (0, "Ava plants the first tree."),
            (1, "A quiet winter passes."),
            (2, "Ava meets Bram."),
        ]);
        let dynamic = compose_dynamic(&kb, 3);
        let delim = dynamic.find(RELATED_DELIMITER).expect("delimiter present");
        // entity-related summaries (mentioning Ava) follow the delimiter
        assert!(dynamic[delim..].contains("plants the first tree"));
        assert!(dynamic[delim..].contains("meets Bram"));
    }

    #[test]
    fn related_section_also_capped_at_target() {
        let kb = kb_with_summaries(&[
            (0, "Ava plants the first tree."),
            (4, "Ava burns the orchard down."),
        ]);
        let dynamic = compose_dynamic(&kb, 1);
        // index 4 mentions Ava but is at-or-beyond the target
        assert!(!dynamic.contains("burns"));
    }

    #[test]
    fn target_zero_yields_empty_dynamic() {
        let kb = kb_with_summaries(&[(0, "Ava departs."), (1, "Ava returns.")]);
        assert_eq!(compose_dynamic(&kb, 0), "");
    }

    // ── validate_outline ──

    #[test]
    fn missing_outline_is_invalid() {
        let report = validate_outline(None);
        assert!(!report.valid);
        assert_eq!(report.issues, vec!["outline is missing".to_string()]);
    }

    #[test]
    fn outline_issues_accumulate() {
        let mut o = outline();
        o.premise = "  ".into();
        o.main_characters.clear();
        let report = validate_outline(Some(&o));
        assert!(!report.valid);
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn complete_outline_is_valid() {
        let o = outline();
        assert!(validate_outline(Some(&o)).valid);
    }
}
