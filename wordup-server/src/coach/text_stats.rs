use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

pub const FILLER_WORDS: &[&str] = &[
    "um",
    "uh",
    "like",
    "you know",
    "basically",
    "actually",
    "literally",
    "sort of",
    "kind of",
];

lazy_static! {
    static ref FILLER_PATTERNS: Vec<Regex> = FILLER_WORDS
        .iter()
        .map(|word| {
            Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word)))
                .expect("filler word patterns are static")
        })
        .collect();
    static ref SENTENCE_TERMINATORS: Regex =
        Regex::new(r"[.!?]+").expect("sentence terminator pattern is static");
}

/// Lexical counts computed locally before a transcript is sent for feedback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptStats {
    pub word_count: usize,
    pub sentence_count: usize,
    pub filler_word_count: usize,
}

impl TranscriptStats {
    pub fn of(transcript: &str) -> Self {
        Self {
            word_count: count_words(transcript),
            sentence_count: count_sentences(transcript),
            filler_word_count: count_filler_words(transcript),
        }
    }
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Pieces between runs of `.`, `!` and `?` that hold any text. Never below 1.
pub fn count_sentences(text: &str) -> usize {
    SENTENCE_TERMINATORS
        .split(text)
        .filter(|piece| !piece.trim().is_empty())
        .count()
        .max(1)
}

pub fn count_filler_words(text: &str) -> usize {
    FILLER_PATTERNS
        .iter()
        .map(|pattern| pattern.find_iter(text).count())
        .sum()
}
