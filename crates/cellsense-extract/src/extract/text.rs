//! Shared string primitives for the extractors.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

static RUNS_OF_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Repeated separators left behind when tokens are cut out, e.g. `", ,"`.
static ORPHAN_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"([,;])(?:\s*[,;])+").unwrap());

static SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([,;:.!?)])").unwrap());

static EMPTY_PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*\)").unwrap());

/// Sentences of `text`, each trimmed and keeping its terminator.
///
/// Breaks only where [`is_sentence_end`] holds with text still to follow, so
/// `64.5` stays whole and a closing `.` belongs to the last sentence.
pub(crate) fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut rest_start = 0;
    for (i, _) in text.match_indices(['.', '!', '?']) {
        if i + 1 < text.len() && is_sentence_end(text, i) {
            push_sentence(&mut sentences, &text[rest_start..=i]);
            rest_start = i + 1;
        }
    }
    push_sentence(&mut sentences, &text[rest_start..]);
    sentences
}

fn push_sentence<'a>(sentences: &mut Vec<&'a str>, raw: &'a str) {
    let sentence = raw.trim();
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
}

/// Whether byte `i` of `text` (an ASCII terminator) ends a sentence.
pub(crate) fn is_sentence_end(text: &str, i: usize) -> bool {
    let bytes = text.as_bytes();
    matches!(bytes.get(i), Some(b'.' | b'!' | b'?'))
        && bytes.get(i + 1).map_or(true, |b| b.is_ascii_whitespace())
}

pub(crate) fn count_char(text: &str, c: char) -> usize {
    text.chars().filter(|&ch| ch == c).count()
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    RUNS_OF_WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Remove byte ranges from `text`, leaving a space where each range was.
///
/// A `,` or `;` directly after a range goes with it, so removing the items
/// of a list does not leave its separators behind.
pub(crate) fn remove_spans(text: &str, spans: &[Range<usize>]) -> String {
    let mut sorted: Vec<Range<usize>> = spans.to_vec();
    sorted.sort_by_key(|r| r.start);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in sorted {
        if span.end <= cursor {
            continue;
        }
        let start = span.start.max(cursor);
        out.push_str(&text[cursor..start]);
        out.push(' ');
        cursor = swallow_separator(text, span.end);
    }
    out.push_str(&text[cursor..]);
    out
}

fn swallow_separator(text: &str, end: usize) -> usize {
    let rest = &text[end..];
    let trimmed = rest.trim_start();
    if trimmed.starts_with(',') || trimmed.starts_with(';') {
        end + (rest.len() - trimmed.len()) + 1
    } else {
        end
    }
}

/// Clean up text that had tokens cut out of it.
pub(crate) fn tidy_residual(text: &str) -> String {
    let s = EMPTY_PARENS.replace_all(text, " ");
    let s = collapse_whitespace(&s);
    let s = ORPHAN_SEPARATORS.replace_all(&s, "$1");
    let s = SPACE_BEFORE_PUNCT.replace_all(&s, "$1");
    s.trim_matches(|c: char| c.is_whitespace() || ",;:-–—".contains(c))
        .trim_start_matches('.')
        .trim()
        .to_string()
}
