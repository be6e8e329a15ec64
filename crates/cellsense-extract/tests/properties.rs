//! Property-based tests for the narrative extractors.
//!
//! These pin down the invariants the dashboard relies on: totality,
//! first-seen dedup, year ordering, idempotent decomposition and
//! word-boundary headlines.

use cellsense_core::EngineConfig;
use cellsense_extract::{
    calculate_change, classify_text, decompose_narrative, dedup_time_series_by_year,
    detect_scope, extract_headline, extract_key_facts, extract_primary_metric, extract_summary,
    parse_time_series, ContentKind, Direction, TimeSeriesPoint,
};
use proptest::prelude::*;

/// Strategy for (year, value) series entries.
fn series_entries() -> impl Strategy<Value = Vec<(u16, f64)>> {
    prop::collection::vec((1990u16..2040, 0u32..10_000), 1..8).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(year, tenths)| (year, tenths as f64 / 10.0))
            .collect()
    })
}

fn render_series(entries: &[(u16, f64)]) -> String {
    entries
        .iter()
        .map(|(year, value)| format!("{:.1}% ({})", value, year))
        .collect::<Vec<_>>()
        .join(", ")
}

fn point(year: u16, value: f64) -> TimeSeriesPoint {
    TimeSeriesPoint {
        year: year.to_string(),
        value,
        unit: "%".into(),
        is_projection: false,
        annotation: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: three or more percent signs always force long text
    #[test]
    fn percent_heavy_text_is_long(a in "[a-z ]{0,20}", b in "[a-z ]{0,20}", c in "[a-z ]{0,20}") {
        let text = format!("{}%{}%{}%", a, b, c);
        prop_assert_eq!(classify_text(&text, &EngineConfig::default()), ContentKind::LongText);
    }

    /// Property: extractors never panic on arbitrary input
    #[test]
    fn extractors_are_total(text in "\\PC{0,160}") {
        let config = EngineConfig::default();
        let _ = classify_text(&text, &config);
        let _ = parse_time_series(&text, &config);
        let _ = extract_key_facts(&text, &config);
        let _ = detect_scope(&text);
        let _ = extract_headline(&text, 10);
        let _ = extract_summary(&text, 2);
        let _ = extract_primary_metric(&text);
        let _ = decompose_narrative(&text, &config);
    }

    /// Property: parsed series are ascending with one point per year
    #[test]
    fn parsed_series_sorted_and_unique(entries in series_entries()) {
        let points = parse_time_series(&render_series(&entries), &EngineConfig::default());

        let mut distinct: Vec<u16> = entries.iter().map(|(y, _)| *y).collect();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(points.len(), distinct.len());

        let years: Vec<u16> = points.iter().map(|p| p.year.parse().unwrap()).collect();
        prop_assert_eq!(years, distinct);
    }

    /// Property: dedup keeps the first value seen for each year
    #[test]
    fn dedup_keeps_first_seen(entries in series_entries()) {
        let points: Vec<TimeSeriesPoint> = entries.iter().map(|(y, v)| point(*y, *v)).collect();
        let deduped = dedup_time_series_by_year(points);

        for p in &deduped {
            let first = entries.iter().find(|(y, _)| y.to_string() == p.year).unwrap();
            prop_assert_eq!(p.value, first.1);
        }
    }

    /// Property: decomposing the same text twice gives the same structure
    #[test]
    fn decomposition_is_idempotent(prefix in "[A-Za-z ]{0,30}", entries in series_entries(), tail in "[A-Za-z ,.:]{0,40}") {
        let text = format!("{} {} {}", prefix, render_series(&entries), tail);
        let config = EngineConfig::default();
        prop_assert_eq!(decompose_narrative(&text, &config), decompose_narrative(&text, &config));
    }

    /// Property: text without scope markers or years in parens decomposes to nothing
    #[test]
    fn unmarked_text_is_unstructured(text in "[a-z0-9 ,.%()]{0,120}") {
        prop_assume!(!text.contains("includ") && !text.contains("exclud"));
        let squeezed: String = text.chars().filter(|c| *c != ' ').collect();
        prop_assume!(!squeezed.contains("(19") && !squeezed.contains("(20"));
        let structure = decompose_narrative(&text, &EngineConfig::default());
        prop_assert!(!structure.has_structured_data);
        prop_assert!(structure.context.is_none());
    }

    /// Property: bracketed numbers that are not years never form a series
    #[test]
    fn non_year_parens_are_unstructured(value in 0u32..10_000, inner in 0u32..1900) {
        let text = format!("Output rose to {} units (up {}) over the period", value, inner);
        let structure = decompose_narrative(&text, &EngineConfig::default());
        prop_assert!(!structure.has_structured_data);
        prop_assert!(structure.time_series.is_none());
    }

    /// Property: headlines respect the word cap and never cut a word
    #[test]
    fn headline_word_boundaries(text in "[A-Za-z0-9 .,;:!?-]{0,160}", max_words in 1usize..15) {
        let headline = extract_headline(&text, max_words);
        let headline = headline.as_str();
        prop_assert!(headline.split_whitespace().count() <= max_words);

        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        prop_assert!(normalized.starts_with(headline));
        let next = normalized[headline.len()..].chars().next();
        prop_assert!(next.map_or(true, |c| !c.is_alphanumeric()));
    }

    /// Property: direction is neutral exactly when the values match
    #[test]
    fn change_direction_matches_values(current in -1.0e6f64..1.0e6, previous in -1.0e6f64..1.0e6) {
        let change = calculate_change(current, previous, "$M", &EngineConfig::default());
        let expected = if current > previous {
            Direction::Up
        } else if current < previous {
            Direction::Down
        } else {
            Direction::Neutral
        };
        prop_assert_eq!(change.direction, expected);
        prop_assert!(change.percentage.is_finite());
    }
}
