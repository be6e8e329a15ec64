//! Includes/excludes clause detection.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::text::is_sentence_end;

/// `includes:` / `excludes:` anywhere, or `including` / `excluding` opening a clause.
static SCOPE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:\b(?P<colon>includes?|excludes?)\s*:|(?:^|[,;(]|\s[-–—])\s*(?P<lead>including|excluding)\b\s*:?)",
    )
    .unwrap()
});

/// What a metric covers and leaves out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Includes,
    Excludes,
}

struct ScopeClause {
    kind: ScopeKind,
    items: Vec<String>,
    span: Range<usize>,
}

/// Whether the text carries an includes/excludes marker.
pub fn detect_includes_excludes(text: &str) -> bool {
    SCOPE_MARKER.is_match(text)
}

/// Collect the includes/excludes lists. `None` when no marker is present.
pub fn detect_scope(text: &str) -> Option<Scope> {
    let clauses = scan_scope(text);
    if clauses.is_empty() {
        return None;
    }

    let mut scope = Scope::default();
    for clause in clauses {
        match clause.kind {
            ScopeKind::Includes => scope.includes.extend(clause.items),
            ScopeKind::Excludes => scope.excludes.extend(clause.items),
        }
    }
    Some(scope)
}

/// Byte ranges consumed by scope clauses, marker through list terminator.
pub(crate) fn scope_spans(text: &str) -> Vec<Range<usize>> {
    scan_scope(text).into_iter().map(|c| c.span).collect()
}

fn scan_scope(text: &str) -> Vec<ScopeClause> {
    let markers: Vec<(Range<usize>, ScopeKind)> = SCOPE_MARKER
        .captures_iter(text)
        .filter_map(|cap| {
            let word = cap.name("colon").or_else(|| cap.name("lead"))?;
            let kind = if word.as_str().to_lowercase().starts_with("incl") {
                ScopeKind::Includes
            } else {
                ScopeKind::Excludes
            };
            Some((cap.get(0)?.range(), kind))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(idx, (marker, kind))| {
            let limit = markers.get(idx + 1).map_or(text.len(), |(next, _)| next.start);
            let region = &text[marker.end..limit];
            let (list_end, consumed) = list_extent(region);
            ScopeClause {
                kind: *kind,
                items: split_items(&region[..list_end]),
                span: marker.start..marker.end + consumed,
            }
        })
        .collect()
}

/// Where a list ends inside `region`: (end of list, end including terminator).
///
/// A `)` only ends the list when it closes a bracket opened before the marker.
fn list_extent(region: &str) -> (usize, usize) {
    let mut depth = 0usize;
    for (i, c) in region.char_indices() {
        let terminates = match c {
            '(' => {
                depth += 1;
                false
            }
            ')' if depth > 0 => {
                depth -= 1;
                false
            }
            ')' | '\n' => true,
            '.' | '!' | '?' => is_sentence_end(region, i),
            _ => false,
        };
        if terminates {
            return (i, i + c.len_utf8());
        }
    }
    (region.len(), region.len())
}

/// Split on `,` and `;` outside brackets.
fn split_items(list: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' | ';' if depth == 0 => {
                pieces.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&list[start..]);

    pieces
        .into_iter()
        .map(|item| {
            let item = item.trim();
            let item = strip_prefix_ignore_case(item, "and ")
                .or_else(|| strip_prefix_ignore_case(item, "or "))
                .unwrap_or(item);
            item.trim().trim_end_matches('.').trim().to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}
