//! Heuristic cell analysis.
//!
//! Classifies a cell, then runs the narrative extractors over text cells:
//! headline and summary, primary metric, key facts, and the time-series /
//! scope decomposition. The result carries a layout recommendation so the
//! dashboard can choose between a number badge, a paragraph, a bullet list,
//! a table of years or an includes/excludes panel.

pub mod classify;
pub mod decompose;
pub mod facts;
pub mod headline;
pub mod metric;
pub mod scope;
mod text;
pub mod timeseries;

use cellsense_core::EngineConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use classify::ContentKind;
use decompose::NarrativeStructure;
use facts::KeyFact;
use headline::{Headline, Summary};
use metric::PrimaryMetric;
use timeseries::PeriodChange;

/// A raw value pulled from the upstream JSON feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Convert a JSON value; `null`, booleans, arrays and objects are not cells.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// The widget a cell should render as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    Number,
    ShortText,
    TimeSeries,
    Scope,
    BulletList,
    Paragraph,
}

/// Everything extracted from one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellAnalysis {
    pub kind: ContentKind,
    pub layout: Layout,
    pub headline: Headline,
    pub summary: Option<Summary>,
    pub primary_metric: Option<PrimaryMetric>,
    /// Top-ranked facts, at most `max_facts`.
    pub key_facts: Vec<KeyFact>,
    /// Facts held back from `key_facts`.
    pub remaining_facts: usize,
    pub structure: NarrativeStructure,
    pub changes: Vec<PeriodChange>,
    pub trend: Option<PeriodChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAnalysis {
    pub key: String,
    pub analysis: CellAnalysis,
}

/// Analysis of every cell in one feed record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAnalysis {
    pub fields: Vec<FieldAnalysis>,
    /// Keys whose values were not strings or numbers.
    pub skipped: Vec<String>,
}

/// Pick a layout. The time-series check runs before the multi-fact check.
pub fn choose_layout(
    kind: ContentKind,
    structure: &NarrativeStructure,
    fact_count: usize,
    config: &EngineConfig,
) -> Layout {
    match kind {
        ContentKind::Number => Layout::Number,
        ContentKind::ShortText => Layout::ShortText,
        ContentKind::LongText => {
            if structure.time_series.as_ref().map_or(false, |ts| !ts.is_empty()) {
                Layout::TimeSeries
            } else if structure.scope.is_some() {
                Layout::Scope
            } else if fact_count >= config.min_bullet_facts {
                Layout::BulletList
            } else {
                Layout::Paragraph
            }
        }
    }
}

/// Runs the extractors with one set of thresholds.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: EngineConfig,
}

impl Analyzer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyze(&self, value: &CellValue) -> CellAnalysis {
        match value {
            CellValue::Number(n) => self.analyze_number(*n),
            CellValue::Text(text) => self.analyze_text(text),
        }
    }

    fn analyze_number(&self, n: f64) -> CellAnalysis {
        CellAnalysis {
            kind: ContentKind::Number,
            layout: Layout::Number,
            headline: Headline::Empty,
            summary: None,
            primary_metric: n.is_finite().then(|| PrimaryMetric {
                value: n,
                unit: String::new(),
                raw: n.to_string(),
            }),
            key_facts: Vec::new(),
            remaining_facts: 0,
            structure: NarrativeStructure::unstructured(),
            changes: Vec::new(),
            trend: None,
        }
    }

    pub fn analyze_text(&self, text: &str) -> CellAnalysis {
        let config = &self.config;
        let kind = classify::classify_text(text, config);

        let all_facts = facts::extract_key_facts(text, config);
        let fact_count = all_facts.len();
        let selection = facts::take_top_facts(facts::rank_key_facts(all_facts), config.max_facts);

        let structure = decompose::decompose_narrative(text, config);
        let series: &[timeseries::TimeSeriesPoint] = structure.time_series.as_deref().unwrap_or(&[]);
        let changes = timeseries::series_changes(series, config);
        let trend = timeseries::overall_trend(series, config);

        let layout = choose_layout(kind, &structure, fact_count, config);
        debug!(%kind, ?layout, facts = fact_count, "analyzed cell");

        CellAnalysis {
            kind,
            layout,
            headline: headline::extract_headline(text, config.headline_max_words),
            summary: Some(headline::extract_summary(text, config.summary_sentences)),
            primary_metric: metric::extract_primary_metric(text),
            key_facts: selection.facts,
            remaining_facts: selection.remaining,
            structure,
            changes,
            trend,
        }
    }

    /// Analyze every string or number field of a JSON record, in key order.
    pub fn analyze_record(&self, record: &serde_json::Map<String, serde_json::Value>) -> RecordAnalysis {
        let mut result = RecordAnalysis::default();
        for (key, value) in record {
            match CellValue::from_json(value) {
                Some(cell) => result.fields.push(FieldAnalysis {
                    key: key.clone(),
                    analysis: self.analyze(&cell),
                }),
                None => result.skipped.push(key.clone()),
            }
        }
        result
    }
}
