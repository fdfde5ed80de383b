//! Budget allocation and compression.
//!
//! A pure transformation: the two composed segments go in, a
//! `GenerationContext` that fits the token budget comes out. This never
//! fails — in the worst case a segment whose share rounds down to nothing
//! comes back as an empty string, and callers must tolerate that.
//!
//! When the segments jointly exceed the budget, the split is fixed: the core
//! segment may use at most `core_ratio` of the budget (default 60%), the
//! dynamic segment the rest. Core wins because outline/character drift hurts
//! narrative consistency more than losing recent-history detail. Slack in one
//! segment is deliberately not reclaimed by the other.

use storyloom_core::{FullContext, GenerationContext};

use crate::token::estimate_tokens;

/// Enforce `budget` over the two segments of `ctx`.
///
/// Under budget, both segments pass through unchanged and the leftover is
/// reported in `remaining_tokens`. Over budget, each segment is truncated —
/// always from the end, preferring sentence boundaries — until its estimate
/// fits its share.
pub fn enforce_budget(
    ctx: FullContext,
    budget: usize,
    core_ratio: f64,
    chapter_index: usize,
) -> GenerationContext {
    let core_tokens = estimate_tokens(&ctx.core);
    let dynamic_tokens = estimate_tokens(&ctx.dynamic);

    if core_tokens + dynamic_tokens <= budget {
        return GenerationContext {
            core_context: ctx.core,
            dynamic_context: ctx.dynamic,
            token_budget: budget,
            remaining_tokens: budget - (core_tokens + dynamic_tokens),
            chapter_index,
        };
    }

    let core_budget = (budget as f64 * core_ratio).floor() as usize;
    let dynamic_budget = budget - core_budget;

    let core = compress_segment(ctx.core, core_tokens, core_budget);
    let dynamic = compress_segment(ctx.dynamic, dynamic_tokens, dynamic_budget);

    let used = estimate_tokens(&core) + estimate_tokens(&dynamic);
    GenerationContext {
        core_context: core,
        dynamic_context: dynamic,
        token_budget: budget,
        remaining_tokens: budget.saturating_sub(used),
        chapter_index,
    }
}

/// Truncate one segment to its token share. `segment_tokens` is the caller's
/// already-computed estimate for `text`.
fn compress_segment(text: String, segment_tokens: usize, segment_budget: usize) -> String {
    if segment_tokens <= segment_budget {
        return text;
    }
    if segment_budget == 0 {
        return String::new();
    }

    // Prefer a prefix of whole sentences whose estimate fits the share.
    let mut kept_end = 0; // byte offset of the last whole sentence that fits
    for boundary in sentence_boundaries(&text) {
        if estimate_tokens(&text[..boundary]) <= segment_budget {
            kept_end = boundary;
        } else {
            break;
        }
    }
    if kept_end > 0 {
        return text[..kept_end].to_string();
    }

    // No whole sentence fits: hard cut. Start from the proportional character
    // budget, which assumes average token density. A prefix denser than the
    // tail (ideographic opening, sparse Latin tail) can still overshoot its
    // share, so re-estimate and shrink to the largest prefix that fits. The
    // estimator is monotone under append, which makes the binary search valid.
    // Degraded output quality, not an error.
    let ratio = segment_budget as f64 / segment_tokens as f64;
    let chars: Vec<char> = text.chars().collect();
    let char_budget = (chars.len() as f64 * ratio).floor() as usize;

    let prefix: String = chars[..char_budget].iter().collect();
    if estimate_tokens(&prefix) <= segment_budget {
        return prefix;
    }

    let mut lo = 0;
    let mut hi = char_budget;
    while lo < hi {
        let mid = (lo + hi).div_ceil(2);
        let candidate: String = chars[..mid].iter().collect();
        if estimate_tokens(&candidate) <= segment_budget {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    chars[..lo].iter().collect()
}

/// Byte offsets just past each sentence-final punctuation mark, plus the end
/// of the text (so an unterminated tail still counts as a sentence).
fn sentence_boundaries(text: &str) -> Vec<usize> {
    let mut boundaries = Vec::new();
    for (i, c) in text.char_indices() {
        if is_sentence_final(c) {
            boundaries.push(i + c.len_utf8());
        }
    }
    if boundaries.last() != Some(&text.len()) && !text.is_empty() {
        boundaries.push(text.len());
    }
    boundaries
}

fn is_sentence_final(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…' | '。' | '！' | '？')
}
