//! The knowledge base — durable project state for one novel.
//!
//! Owned by the surrounding application: loaded at startup, mutated through
//! the methods here, saved after each mutation (the storage format is the
//! caller's concern; everything derives `Serialize`/`Deserialize`).
//!
//! Invariant: chapter summary indices are unique and monotonically assigned
//! as chapters are completed. `push_summary` is the only way to append one,
//! so the invariant holds by construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A character card. Referenced by value when composing core context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Character {
    /// Stable identity, unique within a knowledge base.
    pub id: String,
    pub name: String,
    /// Narrative role (e.g. "protagonist", "mentor").
    pub role: String,
    pub traits: Vec<String>,
    /// What this character wants, in free text.
    pub goals: String,
}

impl Character {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            role: role.into(),
            traits: Vec::new(),
            goals: String::new(),
        }
    }
}

/// A named piece of world-building with its own rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSetting {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rules: String,
}

/// The summary of one written chapter.
///
/// Produced after a chapter is generated or edited; immutable once produced
/// except through [`KnowledgeBase::replace_summary`] (explicit regeneration).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChapterSummary {
    /// Position in the narrative — not necessarily equal to array position.
    pub chapter_index: usize,
    pub title: String,
    pub summary: String,
    /// Salient names/terms extracted from the chapter, used for relevance
    /// filtering in later compositions.
    pub key_entities: Vec<String>,
}

/// A planned plot beat and its intended impact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotPoint {
    pub id: String,
    pub description: String,
    pub impact: String,
}

/// Severity of a consistency rule violation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A rule the narrative must not break (e.g. "magic always has a cost").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyRule {
    pub id: String,
    pub description: String,
    pub severity: Severity,
}

/// The novel's outline. Created once by generation, mutated by refinement;
/// never deleted, only replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,
    pub genre: String,
    /// The story premise, free text.
    pub premise: String,
    pub main_characters: Vec<Character>,
    /// Plot-structure description (e.g. three acts).
    pub plot_structure: Vec<String>,
    pub worldbuilding: String,
}

/// The durable project state — single source of truth for all context
/// composition. No cached derived state outlives one composition call.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KnowledgeBase {
    /// Absent until the first outline generation succeeds.
    pub outline: Option<Outline>,
    pub characters: Vec<Character>,
    pub world_settings: Vec<WorldSetting>,
    /// Ordered by completion; indices unique and monotonically assigned.
    pub chapter_summaries: Vec<ChapterSummary>,
    pub plot_points: Vec<PlotPoint>,
    pub consistency_rules: Vec<ConsistencyRule>,
    /// When this knowledge base was last mutated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl KnowledgeBase {
    /// An empty knowledge base for a brand-new project.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the outline. An outline is never deleted once one exists.
    pub fn set_outline(&mut self, outline: Outline) {
        self.outline = Some(outline);
        self.touch();
    }

    /// Insert or update a character card, matched by id.
    pub fn upsert_character(&mut self, character: Character) {
        match self.characters.iter_mut().find(|c| c.id == character.id) {
            Some(existing) => *existing = character,
            None => self.characters.push(character),
        }
        self.touch();
    }

    /// The index the next completed chapter will receive.
    pub fn next_chapter_index(&self) -> usize {
        self.chapter_summaries
            .iter()
            .map(|s| s.chapter_index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Append a summary for a newly completed chapter, assigning the next
    /// monotonic chapter index. Returns the assigned index.
    pub fn push_summary(
        &mut self,
        title: impl Into<String>,
        summary: impl Into<String>,
        key_entities: Vec<String>,
    ) -> usize {
        let chapter_index = self.next_chapter_index();
        self.chapter_summaries.push(ChapterSummary {
            chapter_index,
            title: title.into(),
            summary: summary.into(),
            key_entities,
        });
        self.touch();
        chapter_index
    }

    /// Replace the summary for an existing chapter index (explicit
    /// regeneration). Returns `false` if no summary has that index.
    pub fn replace_summary(&mut self, replacement: ChapterSummary) -> bool {
        match self
            .chapter_summaries
            .iter_mut()
            .find(|s| s.chapter_index == replacement.chapter_index)
        {
            Some(existing) => {
                *existing = replacement;
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Whether nothing has been written into this knowledge base yet.
    pub fn is_empty(&self) -> bool {
        self.outline.is_none()
            && self.characters.is_empty()
            && self.world_settings.is_empty()
            && self.chapter_summaries.is_empty()
            && self.plot_points.is_empty()
            && self.consistency_rules.is_empty()
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_knowledge_base_is_empty() {
        let kb = KnowledgeBase::new();
        assert!(kb.is_empty());
        assert!(kb.outline.is_none());
        assert_eq!(kb.next_chapter_index(), 0);
    }

    #[test]
    fn push_summary_assigns_monotonic_indices() {
        let mut kb = KnowledgeBase::new();
        assert_eq!(kb.push_summary("One", "The hero departs.", vec![]), 0);
        assert_eq!(kb.push_summary("Two", "The hero returns.", vec![]), 1);
        assert_eq!(kb.push_summary("Three", "A twist.", vec![]), 2);
        assert_eq!(kb.next_chapter_index(), 3);

        let indices: Vec<usize> = kb.chapter_summaries.iter().map(|s| s.chapter_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn replace_summary_only_touches_matching_index() {
        let mut kb = KnowledgeBase::new();
        kb.push_summary("One", "Original.", vec![]);
        kb.push_summary("Two", "Untouched.", vec![]);

        let replaced = kb.replace_summary(ChapterSummary {
            chapter_index: 0,
            title: "One (revised)".into(),
            summary: "Regenerated.".into(),
            key_entities: vec!["Hero".into()],
        });
        assert!(replaced);
        assert_eq!(kb.chapter_summaries[0].summary, "Regenerated.");
        assert_eq!(kb.chapter_summaries[1].summary, "Untouched.");

        assert!(!kb.replace_summary(ChapterSummary {
            chapter_index: 99,
            title: "Nope".into(),
            summary: String::new(),
            key_entities: vec![],
        }));
    }

    #[test]
    fn upsert_character_updates_by_id() {
        let mut kb = KnowledgeBase::new();
        let mut ava = Character::new("Ava", "protagonist");
        kb.upsert_character(ava.clone());
        assert_eq!(kb.characters.len(), 1);

        ava.traits.push("stubborn".into());
        kb.upsert_character(ava.clone());
        assert_eq!(kb.characters.len(), 1);
        assert_eq!(kb.characters[0].traits, vec!["stubborn".to_string()]);

        kb.upsert_character(Character::new("Bram", "mentor"));
        assert_eq!(kb.characters.len(), 2);
    }

    #[test]
    fn serialization_roundtrip() {
        let mut kb = KnowledgeBase::new();
        kb.set_outline(Outline {
            title: "The Glass Orchard".into(),
            genre: "fantasy".into(),
            premise: "An orchard that grows memories.".into(),
            main_characters: vec![Character::new("Ava", "protagonist")],
            plot_structure: vec!["Act I".into(), "Act II".into(), "Act III".into()],
            worldbuilding: "Memories are a currency.".into(),
        });
        kb.push_summary("One", "Ava steals a memory.", vec!["Ava".into()]);

        let json = serde_json::to_string(&kb).unwrap();
        let restored: KnowledgeBase = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.outline.as_ref().unwrap().title, "The Glass Orchard");
        assert_eq!(restored.chapter_summaries.len(), 1);
        assert_eq!(restored.chapter_summaries[0].key_entities, vec!["Ava".to_string()]);
    }
}
