use std::sync::LazyLock;

use regex::Regex;

use crate::config::WORDS_PER_MINUTE;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Rounds half-way values up, the way browsers round (`Math.round`).
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// `round(100 × score / total)`; zero for an empty quiz.
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    round_half_up(100.0 * score as f64 / total as f64).max(0) as u32
}

/// Length in characters, as shown to the student.
pub fn char_length(text: &str) -> usize {
    text.chars().count()
}

/// `round(100 × (original − summary) / original)`. Negative when the summary
/// is longer than its source; zero for an empty source.
pub fn compression_rate(original_length: usize, summary_length: usize) -> i64 {
    if original_length == 0 {
        return 0;
    }
    let saved = original_length as f64 - summary_length as f64;
    round_half_up(100.0 * saved / original_length as f64)
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Minutes needed to read `text`, rounded up.
pub fn estimated_read_time(text: &str) -> usize {
    word_count(text).div_ceil(WORDS_PER_MINUTE)
}

/// Replaces every whitespace run (line breaks included) with one space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// First `max_chars` characters of `text`.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
