//! Heuristic extraction of salient names and terms from narrative text.
//!
//! Not named-entity recognition: a bounded, fast relevance signal. False
//! positives and negatives are acceptable as long as the bias is toward
//! including rather than excluding plot-relevant names.
//!
//! Candidates are Latin capitalized words and, for ideographic text,
//! recurring two-character substrings. First-appearance order is preserved
//! up to the cap.

use std::collections::{HashMap, HashSet};

use crate::token::is_ideographic;

/// Upper bound on extracted entities, to bound downstream filtering cost.
pub const MAX_ENTITIES: usize = 10;

/// Extract up to [`MAX_ENTITIES`] distinct salient terms from `text`,
/// in order of first appearance.
pub fn extract_entities(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();

    // First pass: count ideographic bigrams so "recurring" is decidable.
    let mut bigram_counts: HashMap<(char, char), usize> = HashMap::new();
    for pair in chars.windows(2) {
        if is_ideographic(pair[0]) && is_ideographic(pair[1]) {
            *bigram_counts.entry((pair[0], pair[1])).or_insert(0) += 1;
        }
    }

    // Second pass: collect candidates in positional order.
    let mut seen: HashSet<String> = HashSet::new();
    let mut entities: Vec<String> = Vec::new();
    let mut i = 0;

    while i < chars.len() && entities.len() < MAX_ENTITIES {
        let c = chars[i];

        // Latin capitalized word: an uppercase letter followed by lowercase.
        if c.is_ascii_uppercase() && i + 1 < chars.len() && chars[i + 1].is_ascii_lowercase() {
            let mut end = i + 1;
            while end < chars.len() && chars[end].is_ascii_lowercase() {
                end += 1;
            }
            let word: String = chars[i..end].iter().collect();
            if seen.insert(word.clone()) {
                entities.push(word);
            }
            i = end;
            continue;
        }

        // Recurring ideographic bigram (overlapping scan).
        if i + 1 < chars.len()
            && is_ideographic(c)
            && is_ideographic(chars[i + 1])
            && bigram_counts[&(c, chars[i + 1])] >= 2
        {
            let bigram: String = [c, chars[i + 1]].iter().collect();
            if seen.insert(bigram.clone()) {
                entities.push(bigram);
            }
        }

        i += 1;
    }

    entities
}
