//! cellsense extract: narrative decomposition for spreadsheet-derived cells.
//!
//! Classifies a cell as a number, short text or long narrative, then pulls
//! time series, key facts, scope clauses, headlines and a primary metric out
//! of the narrative so a dashboard can pick a widget for it.

pub mod extract;

pub use extract::classify::{classify, classify_text, ContentKind};
pub use extract::decompose::{decompose_narrative, NarrativeStructure};
pub use extract::facts::{
    extract_key_facts, rank_key_facts, split_clauses, take_top_facts, FactSelection, Importance,
    KeyFact,
};
pub use extract::headline::{extract_headline, extract_summary, Headline, Summary};
pub use extract::metric::{contains_metric, extract_primary_metric, PrimaryMetric};
pub use extract::scope::{detect_includes_excludes, detect_scope, Scope};
pub use extract::timeseries::{
    calculate_change, dedup_time_series_by_year, format_change, overall_trend,
    parse_time_series, scan_time_series, series_changes, ChangeResult, Direction, DisplayMode,
    InterpretLower, PeriodChange, ScannedPoint, TimeSeriesPoint,
};
pub use extract::{
    choose_layout, Analyzer, CellAnalysis, CellValue, FieldAnalysis, Layout, RecordAnalysis,
};
