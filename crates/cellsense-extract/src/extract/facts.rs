//! Key-fact extraction — splits a narrative into clauses and ranks them.
//!
//! Clauses carrying a metric near the top of the narrative (or flagged with
//! an emphatic word such as "record") rank highest.

use cellsense_core::EngineConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::metric::contains_metric;
use super::text::is_sentence_end;

/// Enumeration markers: `(1)`, `(a)` and `a.` anywhere; bare `1)` and `a)`
/// only at a clause start, so `(up 12)` in prose is left alone.
static ENUM_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:^|\s)(?:\(\d{1,2}\)|\([a-z]\)|[a-z]\.)\s+|(?:^|[.;:]\s|\n)\s*(?:\d{1,2}\)|[a-z]\))\s+",
    )
    .unwrap()
});

static BULLET_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*[-*•·][ \t]+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyFact {
    pub text: String,
    pub importance: Importance,
    pub has_metric: bool,
}

/// The facts to show plus how many were held back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactSelection {
    pub facts: Vec<KeyFact>,
    pub remaining: usize,
}

/// Split a narrative into factual clauses.
pub fn split_clauses(text: &str) -> Vec<String> {
    let text = BULLET_MARKER.replace_all(text, "\n");
    let text = ENUM_MARKER.replace_all(&text, "\n");

    let mut clauses = Vec::new();
    for line in text.split('\n') {
        let mut start = 0;
        for (i, c) in line.char_indices() {
            if c == ';' || ((c == '.' || c == '!' || c == '?') && is_sentence_end(line, i)) {
                push_clause(&mut clauses, &line[start..i]);
                start = i + c.len_utf8();
            }
        }
        push_clause(&mut clauses, &line[start..]);
    }
    clauses
}

fn push_clause(clauses: &mut Vec<String>, raw: &str) {
    let clause = raw
        .trim()
        .trim_end_matches(|c: char| ".;,:".contains(c))
        .trim();
    if clause.chars().count() >= 3 && clause.chars().any(char::is_alphanumeric) {
        clauses.push(clause.to_string());
    }
}

/// Extract every clause as a fact, in original order.
pub fn extract_key_facts(text: &str, config: &EngineConfig) -> Vec<KeyFact> {
    split_clauses(text)
        .into_iter()
        .enumerate()
        .map(|(i, clause)| {
            let has_metric = contains_metric(&clause);
            let importance = if !has_metric {
                Importance::Low
            } else if i < config.high_positions || has_emphatic_marker(&clause, config) {
                Importance::High
            } else {
                Importance::Medium
            };
            KeyFact {
                text: clause,
                importance,
                has_metric,
            }
        })
        .collect()
}

fn has_emphatic_marker(clause: &str, config: &EngineConfig) -> bool {
    let lower = clause.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| config.emphatic_markers.iter().any(|m| m == word))
}

/// Order facts high → medium → low; ties keep their clause order.
pub fn rank_key_facts(mut facts: Vec<KeyFact>) -> Vec<KeyFact> {
    facts.sort_by_key(|f| f.importance);
    facts
}

/// Keep the first `max` facts and count the rest.
pub fn take_top_facts(mut facts: Vec<KeyFact>, max: usize) -> FactSelection {
    let remaining = facts.len().saturating_sub(max);
    facts.truncate(max);
    FactSelection { facts, remaining }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_sentences_and_semicolons() {
        let clauses = split_clauses("Revenue grew 12.5% to $40m. Margins held; churn fell to 3%.");
        assert_eq!(
            clauses,
            vec!["Revenue grew 12.5% to $40m", "Margins held", "churn fell to 3%"]
        );
    }

    #[test]
    fn test_split_on_enumeration() {
        let clauses = split_clauses("Risks: (1) permitting delays (2) grid interconnection a. tariffs");
        assert_eq!(
            clauses,
            vec!["Risks", "permitting delays", "grid interconnection", "tariffs"]
        );
    }

    #[test]
    fn test_bare_markers_only_at_clause_start() {
        assert_eq!(
            split_clauses("Revenue grew (up 12) over the prior year"),
            vec!["Revenue grew (up 12) over the prior year"]
        );
        assert_eq!(
            split_clauses("Risks: 1) permitting delays; 2) grid works"),
            vec!["Risks", "permitting delays", "grid works"]
        );
    }

    #[test]
    fn test_split_on_bullets() {
        let clauses = split_clauses("- Solar 40%\n- Wind 35%\n* Storage");
        assert_eq!(clauses, vec!["Solar 40%", "Wind 35%", "Storage"]);
    }

    #[test]
    fn test_importance() {
        let config = EngineConfig::default();
        let facts = extract_key_facts(
            "Capex was $2.1bn. Team expanded. Opex rose 4.2%. A record 9.1% yield. Outlook stable.",
            &config,
        );
        let importance: Vec<Importance> = facts.iter().map(|f| f.importance).collect();
        assert_eq!(
            importance,
            vec![
                Importance::High,
                Importance::Low,
                Importance::Medium,
                Importance::High,
                Importance::Low,
            ]
        );
        assert!(facts[0].has_metric);
        assert!(!facts[1].has_metric);
    }

    #[test]
    fn test_rank_is_stable() {
        let config = EngineConfig::default();
        let ranked = rank_key_facts(extract_key_facts(
            "Alpha. Beta 1.5x. Gamma 2.5x. Delta 3.5x. Epsilon.",
            &config,
        ));
        let texts: Vec<&str> = ranked.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["Beta 1.5x", "Gamma 2.5x", "Delta 3.5x", "Alpha", "Epsilon"]);
    }

    #[test]
    fn test_take_top_facts() {
        let config = EngineConfig::default();
        let facts = extract_key_facts("One. Two. Three. Four.", &config);
        let selection = take_top_facts(facts, 3);
        assert_eq!(selection.facts.len(), 3);
        assert_eq!(selection.remaining, 1);

        let selection = take_top_facts(Vec::new(), 3);
        assert_eq!(selection.remaining, 0);
    }
}
