//! Bounded text perturbation.
//!
//! Replies get small human touches (a transposed typo, a trailing
//! ellipsis), but only inside free conversational text. Before mutating
//! anything the strategy consults the extractor's own pattern set and
//! refuses to touch any span that would match a reportable artifact, so a
//! quoted UPI handle or account number always survives byte-identical.

use rand::Rng;
use std::ops::Range;

use crate::domain::intel::artifact_spans;

/// Chance of transposing two characters in one eligible word.
const TYPO_PROBABILITY: f64 = 0.10;

/// Chance of stretching the final full stop into an ellipsis.
const ELLIPSIS_PROBABILITY: f64 = 0.15;

/// Minimum word length eligible for a typo.
const MIN_TYPO_WORD_LEN: usize = 5;

/// Applies at most one typo and one ellipsis per reply.
#[derive(Debug, Clone, Default)]
pub struct Perturbation;

impl Perturbation {
    pub fn new() -> Self {
        Self
    }

    /// Perturbs `text` using the thread RNG.
    pub fn apply(&self, text: &str) -> String {
        self.apply_with(text, &mut rand::thread_rng())
    }

    /// Perturbs `text` with a caller-supplied RNG (deterministic in tests).
    pub fn apply_with<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> String {
        let protected = artifact_spans(text);
        let mut result = text.to_string();

        if rng.gen_bool(TYPO_PROBABILITY) {
            result = transpose_one_word(&result, &protected, rng);
        }
        if rng.gen_bool(ELLIPSIS_PROBABILITY) {
            result = stretch_final_stop(&result, &protected);
        }
        result
    }
}

fn overlaps(range: &Range<usize>, protected: &[Range<usize>]) -> bool {
    protected
        .iter()
        .any(|p| range.start < p.end && p.start < range.end)
}

/// Swaps two adjacent characters in one randomly chosen eligible word.
///
/// Eligible words are ASCII-alphabetic, long enough, and outside every
/// protected span. Returns the text unchanged when nothing is eligible.
fn transpose_one_word<R: Rng + ?Sized>(
    text: &str,
    protected: &[Range<usize>],
    rng: &mut R,
) -> String {
    let candidates: Vec<Range<usize>> = word_ranges(text)
        .into_iter()
        .filter(|range| {
            let word = &text[range.clone()];
            word.len() >= MIN_TYPO_WORD_LEN
                && word.chars().all(|c| c.is_ascii_alphabetic())
                && !overlaps(range, protected)
        })
        .collect();

    let Some(range) = candidates.get(rng.gen_range(0..candidates.len().max(1))).cloned() else {
        return text.to_string();
    };

    let mut bytes = text.as_bytes().to_vec();
    // Swap two adjacent letters somewhere past the first character.
    let offset = rng.gen_range(1..(range.len() - 1));
    bytes.swap(range.start + offset, range.start + offset + 1);
    String::from_utf8(bytes).unwrap_or_else(|_| text.to_string())
}

/// Turns a trailing "." into "..." when the tail is unprotected.
fn stretch_final_stop(text: &str, protected: &[Range<usize>]) -> String {
    let trimmed = text.trim_end();
    if !trimmed.ends_with('.') || trimmed.ends_with("...") {
        return text.to_string();
    }
    let dot_at = trimmed.len() - 1;
    if overlaps(&(dot_at..trimmed.len()), protected) {
        return text.to_string();
    }
    format!("{}..", trimmed)
}

/// Byte ranges of whitespace-separated words.
fn word_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = None;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                ranges.push(s..idx);
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(s) = start {
        ranges.push(s..text.len());
    }
    ranges
}
