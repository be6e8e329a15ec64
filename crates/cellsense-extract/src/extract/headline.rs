//! Headline and summary extraction for narrative previews.

use serde::{Deserialize, Serialize};

use super::text::{collapse_whitespace, is_sentence_end, split_sentences};

const TERMINAL_PUNCT: &[char] = &['.', '!', '?', ';', ':'];

/// Leading-clause headline.
///
/// `WholeText` means the headline would repeat the entire input, so callers
/// should not render it separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum Headline {
    Empty,
    Separate(String),
    WholeText(String),
}

impl Headline {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Separate(s) | Self::WholeText(s) => s,
        }
    }

    pub fn is_separate(&self) -> bool {
        matches!(self, Self::Separate(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub text: String,
    pub truncated: bool,
    pub omitted_sentences: usize,
}

/// Take the clause before the first strong punctuation, capped at `max_words`.
pub fn extract_headline(text: &str, max_words: usize) -> Headline {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Headline::Empty;
    }

    let lead = match lead_clause_end(trimmed) {
        Some(end) if !trimmed[..end].trim().is_empty() => trimmed[..end].trim(),
        _ => trimmed,
    };

    let headline = lead
        .split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ");

    let whole = collapse_whitespace(trimmed.trim_end_matches(TERMINAL_PUNCT));
    if headline.is_empty() {
        Headline::Empty
    } else if headline == whole || headline == collapse_whitespace(trimmed) {
        Headline::WholeText(headline)
    } else {
        Headline::Separate(headline)
    }
}

/// Byte offset of the first strong punctuation mark.
fn lead_clause_end(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    for (i, c) in text.char_indices() {
        let strong = match c {
            '.' | '!' | '?' => is_sentence_end(text, i),
            ':' => bytes.get(i + 1).map_or(true, |b| b.is_ascii_whitespace()),
            ';' | '—' => true,
            '-' | '–' => {
                i > 0
                    && bytes[i - 1] == b' '
                    && bytes.get(i + c.len_utf8()).map_or(false, |b| *b == b' ')
            }
            _ => false,
        };
        if strong {
            return Some(i);
        }
    }
    None
}

/// Join the first `sentence_count` sentences.
pub fn extract_summary(text: &str, sentence_count: usize) -> Summary {
    let sentences = split_sentences(text);
    if sentences.len() <= sentence_count {
        return Summary {
            text: text.to_string(),
            truncated: false,
            omitted_sentences: 0,
        };
    }

    Summary {
        text: sentences[..sentence_count].join(" "),
        truncated: true,
        omitted_sentences: sentences.len() - sentence_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline_leading_clause() {
        let h = extract_headline("Occupancy recovered: 46.0% by 2025, up from 45.9%.", 10);
        assert_eq!(h, Headline::Separate("Occupancy recovered".into()));
        assert!(h.is_separate());
    }

    #[test]
    fn test_headline_word_cap() {
        let h = extract_headline(
            "The portfolio of regulated utilities delivered steady inflation linked returns throughout the period. More text.",
            5,
        );
        assert_eq!(h.as_str(), "The portfolio of regulated utilities");
    }

    #[test]
    fn test_headline_decimal_is_not_a_break() {
        let h = extract_headline("Yield of 4.5 percent - above plan", 10);
        assert_eq!(h.as_str(), "Yield of 4.5 percent");
    }

    #[test]
    fn test_headline_whole_text_ignores_spacing() {
        assert_eq!(
            extract_headline("Strong   quarter", 10),
            Headline::WholeText("Strong quarter".into())
        );
        assert_eq!(
            extract_headline("  Strong\n quarter. ", 10),
            Headline::WholeText("Strong quarter".into())
        );
    }

    #[test]
    fn test_headline_whole_text() {
        assert_eq!(
            extract_headline("Strong quarter.", 10),
            Headline::WholeText("Strong quarter".into())
        );
        assert_eq!(extract_headline("  ", 10), Headline::Empty);
    }

    #[test]
    fn test_summary() {
        let text = "First point. Second point! Third point? Fourth.";
        let s = extract_summary(text, 2);
        assert_eq!(s.text, "First point. Second point!");
        assert!(s.truncated);
        assert_eq!(s.omitted_sentences, 2);

        let unchanged = extract_summary("Only one sentence here.", 2);
        assert_eq!(unchanged.text, "Only one sentence here.");
        assert!(!unchanged.truncated);
    }
}
