//! Time-series extraction from "value (year, note)" narratives.
//!
//! `64.5% (2022), 45.9% (2023 - sharp decline), 46.0% (2025 proj)` yields
//! three points; the last is a projection.

use std::collections::HashSet;
use std::ops::Range;

use cellsense_core::EngineConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::metric::{normalize_unit, parse_number};

static POINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:(?P<cur>[$€£¥])\s*)?(?P<sign>[-+−])?\b(?P<num>\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)\s*(?P<unit>%|(?i:percent|pct|bps|ppts?|pts?|pp|thousand|million|billion|trillion|bn|mn|mm|tn|[kmbtx])\b|[A-Z][A-Za-z]{1,3}\b)?\s*\(\s*(?P<year>(?:19|20)\d{2})(?P<suffix>[EeFfPp])?\b(?P<note>[^)]*)\)",
    )
    .unwrap()
});

/// One year's value pulled out of a narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Four-digit year.
    pub year: String,
    pub value: f64,
    /// Normalized unit (`%`, `$B`, `GW`, ...). Empty when unitless.
    pub unit: String,
    pub is_projection: bool,
    /// Qualifier text inside the parentheses after the year.
    pub annotation: Option<String>,
}

impl TimeSeriesPoint {
    pub fn year_number(&self) -> i32 {
        self.year.parse().unwrap_or_default()
    }
}

/// A point plus the byte range of the text it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedPoint {
    pub point: TimeSeriesPoint,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Raw difference, for series already expressed in percent.
    Points,
    Percent,
}

/// Whether a falling value is good news (costs, vacancy) or bad (revenue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpretLower {
    Good,
    #[default]
    Bad,
}

/// Change between two consecutive values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeResult {
    pub percentage: f64,
    pub direction: Direction,
    pub display_mode: DisplayMode,
}

impl ChangeResult {
    pub fn is_good_change(&self, interpret_lower: InterpretLower) -> bool {
        match interpret_lower {
            InterpretLower::Good => self.direction == Direction::Down,
            InterpretLower::Bad => self.direction == Direction::Up,
        }
    }
}

/// Change between two labelled years, with its display string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodChange {
    pub from_year: String,
    pub to_year: String,
    pub change: ChangeResult,
    pub display: String,
}

/// Scan text for points, in the order they appear.
pub fn scan_time_series(text: &str, config: &EngineConfig) -> Vec<ScannedPoint> {
    POINT_RE
        .captures_iter(text)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let value = parse_number(cap.name("sign").map(|m| m.as_str()), cap.name("num")?.as_str())?;

            let annotation = cap
                .name("note")
                .map(|m| {
                    m.as_str()
                        .trim_matches(|c: char| c.is_whitespace() || "-–—,:;".contains(c))
                        .to_string()
                })
                .filter(|note| !note.is_empty());

            let is_projection = cap.name("suffix").is_some()
                || annotation
                    .as_deref()
                    .map_or(false, |note| config.has_projection_marker(&note.to_lowercase()));

            Some(ScannedPoint {
                point: TimeSeriesPoint {
                    year: cap.name("year")?.as_str().to_string(),
                    value,
                    unit: normalize_unit(
                        cap.name("cur").map(|m| m.as_str()),
                        cap.name("unit").map(|m| m.as_str()),
                    ),
                    is_projection,
                    annotation,
                },
                span: whole.range(),
            })
        })
        .collect()
}

/// Keep the first point seen for each year, preserving scan order.
pub fn dedup_time_series_by_year(points: Vec<TimeSeriesPoint>) -> Vec<TimeSeriesPoint> {
    let mut seen = HashSet::new();
    points
        .into_iter()
        .filter(|p| seen.insert(p.year.clone()))
        .collect()
}

/// Extract a display-ready series: deduplicated by year, ascending by year.
pub fn parse_time_series(text: &str, config: &EngineConfig) -> Vec<TimeSeriesPoint> {
    let scanned: Vec<TimeSeriesPoint> = scan_time_series(text, config)
        .into_iter()
        .map(|s| s.point)
        .collect();
    let found = scanned.len();

    let mut points = dedup_time_series_by_year(scanned);
    points.sort_by_key(TimeSeriesPoint::year_number);

    if found > 0 {
        debug!(found, kept = points.len(), "parsed time series");
    }
    points
}

/// Change from `previous` to `current`.
///
/// Series in point units (`%`, `pp`, `bps`) report the raw difference;
/// everything else reports a percentage of `|previous|`. A zero baseline
/// has no percentage, so it also falls back to the raw difference.
pub fn calculate_change(current: f64, previous: f64, unit: &str, config: &EngineConfig) -> ChangeResult {
    let diff = current - previous;

    let (percentage, display_mode) = if config.is_point_unit(unit) || previous == 0.0 {
        (diff, DisplayMode::Points)
    } else {
        (diff / previous.abs() * 100.0, DisplayMode::Percent)
    };

    let direction = if diff > 0.0 {
        Direction::Up
    } else if diff < 0.0 {
        Direction::Down
    } else {
        Direction::Neutral
    };

    ChangeResult {
        percentage,
        direction,
        display_mode,
    }
}

/// Changes between each consecutive pair of points.
pub fn series_changes(points: &[TimeSeriesPoint], config: &EngineConfig) -> Vec<PeriodChange> {
    points
        .windows(2)
        .map(|pair| period_change(&pair[0], &pair[1], config))
        .collect()
}

/// Change from the first point to the last, if there are at least two.
pub fn overall_trend(points: &[TimeSeriesPoint], config: &EngineConfig) -> Option<PeriodChange> {
    match points {
        [first, .., last] => Some(period_change(first, last, config)),
        _ => None,
    }
}

fn period_change(from: &TimeSeriesPoint, to: &TimeSeriesPoint, config: &EngineConfig) -> PeriodChange {
    let change = calculate_change(to.value, from.value, &to.unit, config);
    PeriodChange {
        from_year: from.year.clone(),
        to_year: to.year.clone(),
        display: format_change(&change),
        change,
    }
}

/// Render a change as `+12.3%` or `-18.6 pts`.
pub fn format_change(change: &ChangeResult) -> String {
    let magnitude = if change.direction == Direction::Neutral {
        "0.0".to_string()
    } else {
        format!("{:+.1}", change.percentage)
    };
    match change.display_mode {
        DisplayMode::Percent => format!("{}%", magnitude),
        DisplayMode::Points => format!("{} pts", magnitude),
    }
}
