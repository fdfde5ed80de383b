//! Relevance filtering over chapter history.
//!
//! Resurfaces topically related but chronologically distant chapters: a
//! summary is related if any extracted entity appears as a substring of its
//! summary text. Runs in `O(|entities| × |history|)` — fine for session-scale
//! histories (hundreds of chapters), not meant to scale beyond that.

use storyloom_core::ChapterSummary;

/// Return the subset of `history` whose summary text mentions any of the
/// given entities, preserving the input's relative order.
pub fn find_related<'a>(
    entities: &[String],
    history: &'a [ChapterSummary],
) -> Vec<&'a ChapterSummary> {
    if entities.is_empty() {
        return Vec::new();
    }
    history
        .iter()
        .filter(|summary| entities.iter().any(|e| summary.summary.contains(e.as_str())))
        .collect()
}
