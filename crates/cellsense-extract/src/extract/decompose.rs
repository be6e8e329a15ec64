//! Narrative decomposition — combines the time-series and scope extractors
//! and keeps whatever prose is left over as context.

use cellsense_core::EngineConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::scope::{detect_scope, scope_spans, Scope};
use super::text::{remove_spans, tidy_residual};
use super::timeseries::{dedup_time_series_by_year, scan_time_series, TimeSeriesPoint};

/// Structured view of one narrative string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeStructure {
    pub has_structured_data: bool,
    pub time_series: Option<Vec<TimeSeriesPoint>>,
    pub scope: Option<Scope>,
    /// Prose left after structured tokens are removed.
    pub context: Option<String>,
}

impl NarrativeStructure {
    /// The structure of text with nothing recognizable in it.
    pub fn unstructured() -> Self {
        Self {
            has_structured_data: false,
            time_series: None,
            scope: None,
            context: None,
        }
    }
}

pub fn decompose_narrative(text: &str, config: &EngineConfig) -> NarrativeStructure {
    let scanned = scan_time_series(text, config);
    let scope = detect_scope(text);

    if scanned.is_empty() && scope.is_none() {
        return NarrativeStructure::unstructured();
    }

    let mut spans: Vec<_> = scanned.iter().map(|s| s.span.clone()).collect();
    spans.extend(scope_spans(text));

    let residual = tidy_residual(&remove_spans(text, &spans));
    let context = (residual.chars().count() >= config.min_context_chars).then_some(residual);

    let mut points = dedup_time_series_by_year(scanned.into_iter().map(|s| s.point).collect());
    points.sort_by_key(TimeSeriesPoint::year_number);

    debug!(
        points = points.len(),
        scope = scope.is_some(),
        context = context.is_some(),
        "decomposed narrative"
    );

    NarrativeStructure {
        has_structured_data: true,
        time_series: (!points.is_empty()).then_some(points),
        scope,
        context,
    }
}
