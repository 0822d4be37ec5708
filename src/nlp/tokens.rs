//! Word and sentence segmentation shared by every analysis routine.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{Alphabetic}\p{Nd}]+").expect("valid regex"));

/// A run of terminal punctuation followed by whitespace or the end of text.
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("valid regex"));

/// Lower-cased words that take a period without ending a sentence.
const ABBREVIATIONS: &[&str] = &[
    "dr", "e.g", "i.e", "inc", "jr", "ltd", "mr", "mrs", "ms", "prof", "sr", "st", "vs",
];

/// A word occurrence with byte offsets into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

/// Maximal runs of letters and digits, in text order and original case.
pub fn words(text: &str) -> impl Iterator<Item = Word<'_>> {
    WORD.find_iter(text).map(|m| Word {
        start: m.start(),
        end: m.end(),
        text: m.as_str(),
    })
}

/// Lower-cased, deduplicated and sorted word set.
pub fn unique_words(text: &str) -> Vec<String> {
    words(text)
        .map(|w| w.text.to_lowercase())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Split text after runs of `.`, `!` or `?` that are followed by whitespace
/// or the end of the text, so decimals like `3.5` stay whole. A single period
/// after a known abbreviation (`Dr.`, `e.g.`) does not end a sentence.
/// Fragments without any word are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for end in SENTENCE_END.find_iter(text) {
        let punct = end.as_str().trim_end();
        if punct == "." && follows_abbreviation(&text[start..end.start()]) {
            continue;
        }
        pieces.push(&text[start..end.end()]);
        start = end.end();
    }
    pieces.push(&text[start..]);
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|s| WORD.is_match(s))
        .map(str::to_string)
        .collect()
}

fn follows_abbreviation(before: &str) -> bool {
    let last = before
        .split_whitespace()
        .next_back()
        .unwrap_or_default()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    ABBREVIATIONS.contains(&last.as_str())
}
