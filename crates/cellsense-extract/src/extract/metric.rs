//! Metric token detection and unit normalization.
//!
//! A metric is a percentage, a currency amount, a number with a magnitude
//! word (`1.2 billion`, `40bn`) or a bare decimal. Bare integers such as
//! years are not metrics.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static METRIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:(?P<cur>[$€£¥])\s*)?(?P<sign>[-+−])?\b(?P<num>\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)(?:\s*(?P<unit>%|(?i:percent|pct|bps|ppts?|pp|thousand|million|billion|trillion|bn|mn|mm|tn|[kmbtx])\b))?",
    )
    .unwrap()
});

/// The leading metric of a narrative, used as its headline number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryMetric {
    pub value: f64,
    /// Normalized unit, e.g. `%`, `$B`, `x`. Empty for a plain decimal.
    pub unit: String,
    /// The token as it appeared in the text.
    pub raw: String,
}

/// Whether text contains at least one metric token.
pub fn contains_metric(text: &str) -> bool {
    METRIC_RE.captures_iter(text).any(|cap| is_metric(&cap))
}

/// Extract the first metric token in the text.
pub fn extract_primary_metric(text: &str) -> Option<PrimaryMetric> {
    METRIC_RE
        .captures_iter(text)
        .filter(is_metric)
        .find_map(|cap| {
            let value = parse_number(cap.name("sign").map(|m| m.as_str()), cap.name("num")?.as_str())?;
            Some(PrimaryMetric {
                value,
                unit: normalize_unit(
                    cap.name("cur").map(|m| m.as_str()),
                    cap.name("unit").map(|m| m.as_str()),
                ),
                raw: cap.get(0)?.as_str().trim().to_string(),
            })
        })
}

fn is_metric(cap: &Captures<'_>) -> bool {
    cap.name("cur").is_some()
        || cap.name("unit").is_some()
        || cap.name("num").map_or(false, |m| m.as_str().contains('.'))
}

/// Parse a captured number with optional sign, dropping thousands separators.
pub(crate) fn parse_number(sign: Option<&str>, num: &str) -> Option<f64> {
    let value: f64 = num.replace(',', "").parse().ok()?;
    let value = match sign {
        Some("-") | Some("−") => -value,
        _ => value,
    };
    value.is_finite().then_some(value)
}

/// Map a currency symbol and unit token onto the canonical unit label.
///
/// `$` + `bn` becomes `$B`; `percent` becomes `%`; unknown units such as
/// `GW` pass through as written.
pub(crate) fn normalize_unit(currency: Option<&str>, unit: Option<&str>) -> String {
    let base = match unit {
        None => String::new(),
        Some(raw) => match raw.to_lowercase().as_str() {
            "%" | "percent" | "pct" => "%".to_string(),
            "pp" | "ppt" | "ppts" | "pt" | "pts" => "pp".to_string(),
            "bps" => "bps".to_string(),
            "k" | "thousand" => "K".to_string(),
            "m" | "mm" | "mn" | "million" => "M".to_string(),
            "b" | "bn" | "billion" => "B".to_string(),
            "t" | "tn" | "trillion" => "T".to_string(),
            "x" => "x".to_string(),
            _ => raw.to_string(),
        },
    };
    match currency {
        Some(c) => format!("{}{}", c, base),
        None => base,
    }
}
