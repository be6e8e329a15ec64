//! Content classification: number, short text or long narrative.

use cellsense_core::EngineConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::text::count_char;
use super::CellValue;

static NUMERIC_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\d.]+\s*,\s*").unwrap());

static YEAR_LIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

/// How a cell should be treated before any structure is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Number,
    ShortText,
    LongText,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number => write!(f, "number"),
            Self::ShortText => write!(f, "short-text"),
            Self::LongText => write!(f, "long-text"),
        }
    }
}

/// Classify a raw cell.
pub fn classify(value: &CellValue, config: &EngineConfig) -> ContentKind {
    match value {
        CellValue::Number(_) => ContentKind::Number,
        CellValue::Text(text) => classify_text(text, config),
    }
}

/// Classify a string cell.
///
/// Dense strings (many commas, parentheses, percentages or years) are long
/// text even when short, because they pack several data points together.
pub fn classify_text(text: &str, config: &EngineConfig) -> ContentKind {
    let text = text.trim();
    if text.is_empty() {
        return ContentKind::ShortText;
    }

    if looks_dense(text, config) {
        return ContentKind::LongText;
    }

    if text.chars().count() <= config.short_text_max_chars {
        ContentKind::ShortText
    } else {
        ContentKind::LongText
    }
}

fn looks_dense(text: &str, config: &EngineConfig) -> bool {
    let commas = count_char(text, ',');

    if commas >= config.long_text_min_commas
        || count_char(text, '(') >= config.long_text_min_parens
        || count_char(text, '%') >= config.long_text_min_percents
        || longest_numeric_run(text) >= config.long_text_min_numeric_run
        || YEAR_LIKE.find_iter(text).count() >= config.long_text_min_years
    {
        return true;
    }

    commas >= config.forecast_min_commas && config.has_forecast_marker(&text.to_lowercase())
}

/// Longest chain of adjacent `number,` tokens such as `1.2, 3.4, 5,`.
fn longest_numeric_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut last_end = None;

    for m in NUMERIC_TOKEN.find_iter(text) {
        current = if last_end == Some(m.start()) { current + 1 } else { 1 };
        longest = longest.max(current);
        last_end = Some(m.end());
    }
    longest
}
