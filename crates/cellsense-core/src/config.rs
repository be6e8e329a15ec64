//! Engine thresholds and server settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 3010;
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Tunables for the narrative decomposition engine.
///
/// Every field falls back to its default when absent from a config file, so a
/// partial JSON document such as `{"shortTextMaxChars": 80}` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Strings at or under this many characters are short text.
    pub short_text_max_chars: usize,
    /// Comma count that forces long text.
    pub long_text_min_commas: usize,
    /// Opening parenthesis count that forces long text.
    pub long_text_min_parens: usize,
    /// Length of a comma-separated numeric run that forces long text.
    pub long_text_min_numeric_run: usize,
    /// `%` count that forces long text.
    pub long_text_min_percents: usize,
    /// Number of year-like tokens in sequence that forces long text.
    pub long_text_min_years: usize,
    /// Comma count that forces long text when a forecast marker is present.
    pub forecast_min_commas: usize,
    /// Substrings the classifier treats as forecast language.
    pub forecast_markers: Vec<String>,
    /// Annotation substrings that flag a time-series point as a projection.
    pub projection_markers: Vec<String>,
    /// Units whose values are already percentages; changes are reported in points.
    pub point_units: Vec<String>,
    /// Words that promote a metric-bearing clause to high importance.
    pub emphatic_markers: Vec<String>,
    /// Leading clauses with a metric that count as high importance.
    pub high_positions: usize,
    pub headline_max_words: usize,
    pub summary_sentences: usize,
    /// Key facts shown before the remainder is collapsed into a count.
    pub max_facts: usize,
    /// Clause count at which a narrative renders as a bullet list.
    pub min_bullet_facts: usize,
    /// Residual context shorter than this is dropped.
    pub min_context_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            short_text_max_chars: 50,
            long_text_min_commas: 3,
            long_text_min_parens: 3,
            long_text_min_numeric_run: 3,
            long_text_min_percents: 3,
            long_text_min_years: 3,
            forecast_min_commas: 2,
            forecast_markers: strings(&["proj", "forecast", "est"]),
            projection_markers: strings(&[
                "proj", "forecast", "est", "expected", "target", "budget",
            ]),
            point_units: strings(&["%", "pp", "bps"]),
            emphatic_markers: strings(&[
                "record", "key", "significant", "major", "primary", "largest",
                "highest", "lowest", "critical", "notably",
            ]),
            high_positions: 2,
            headline_max_words: 10,
            summary_sentences: 2,
            max_facts: 5,
            min_bullet_facts: 3,
            min_context_chars: 10,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl EngineConfig {
    /// Load config from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No engine config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: EngineConfig = serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Reject settings that would make extraction degenerate.
    pub fn validate(&self) -> Result<()> {
        if self.headline_max_words == 0 {
            return Err(Error::Config("headlineMaxWords must be at least 1".into()));
        }
        if self.summary_sentences == 0 {
            return Err(Error::Config("summarySentences must be at least 1".into()));
        }
        if self.min_bullet_facts == 0 {
            return Err(Error::Config("minBulletFacts must be at least 1".into()));
        }
        if self.projection_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(Error::Config("projectionMarkers may not contain blanks".into()));
        }
        if self.forecast_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(Error::Config("forecastMarkers may not contain blanks".into()));
        }
        Ok(())
    }

    /// Whether a word of already-lowercased text starts with a projection marker.
    ///
    /// `est` matches "est" and "estimated" but not "highest" or "latest".
    pub fn has_projection_marker(&self, lower: &str) -> bool {
        lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .any(|word| {
                self.projection_markers
                    .iter()
                    .any(|m| word.starts_with(m.trim().to_lowercase().as_str()))
            })
    }

    /// Whether already-lowercased text contains a forecast marker.
    pub fn has_forecast_marker(&self, lower: &str) -> bool {
        self.forecast_markers
            .iter()
            .any(|m| lower.contains(m.to_lowercase().as_str()))
    }

    /// Whether a normalized unit is expressed in percentage points.
    pub fn is_point_unit(&self, unit: &str) -> bool {
        let unit = unit.trim();
        self.point_units.iter().any(|u| u.eq_ignore_ascii_case(unit))
    }

    /// Apply an update, merging with the existing config.
    pub fn apply_update(&mut self, update: &EngineConfigUpdate) {
        if let Some(v) = update.short_text_max_chars {
            self.short_text_max_chars = v;
        }
        if let Some(v) = update.long_text_min_commas {
            self.long_text_min_commas = v;
        }
        if let Some(v) = update.long_text_min_percents {
            self.long_text_min_percents = v;
        }
        if let Some(v) = &update.projection_markers {
            self.projection_markers = v.clone();
        }
        if let Some(v) = &update.point_units {
            self.point_units = v.clone();
        }
        if let Some(v) = update.headline_max_words {
            self.headline_max_words = v;
        }
        if let Some(v) = update.summary_sentences {
            self.summary_sentences = v;
        }
        if let Some(v) = update.max_facts {
            self.max_facts = v;
        }
        if let Some(v) = update.min_context_chars {
            self.min_context_chars = v;
        }
    }
}

/// Partial update accepted by `PUT /api/config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfigUpdate {
    pub short_text_max_chars: Option<usize>,
    pub long_text_min_commas: Option<usize>,
    pub long_text_min_percents: Option<usize>,
    pub projection_markers: Option<Vec<String>>,
    pub point_units: Option<Vec<String>>,
    pub headline_max_words: Option<usize>,
    pub summary_sentences: Option<usize>,
    pub max_facts: Option<usize>,
    pub min_context_chars: Option<usize>,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub bind: String,
    /// Optional JSON file holding an [`EngineConfig`].
    pub engine_config_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Self {
        let port = match std::env::var("PORT") {
            Ok(p) => p.parse().unwrap_or_else(|_| {
                warn!("Ignoring unparseable PORT={}", p);
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        let bind = std::env::var("CELLSENSE_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let engine_config_path = std::env::var("CELLSENSE_CONFIG").ok().map(PathBuf::from);

        Self {
            port,
            bind,
            engine_config_path,
        }
    }

    /// Load the engine config this server points at, or the defaults.
    pub fn load_engine_config(&self) -> Result<EngineConfig> {
        match &self.engine_config_path {
            Some(path) => EngineConfig::load(path),
            None => Ok(EngineConfig::default()),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"shortTextMaxChars": 80}"#).unwrap();
        assert_eq!(config.short_text_max_chars, 80);
        assert_eq!(config.long_text_min_commas, 3);
        assert_eq!(config.min_context_chars, 10);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(EngineConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_rejects_zero_headline_words() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{"headlineMaxWords": 0}"#).unwrap();
        assert!(EngineConfig::load(&path).is_err());
    }

    #[test]
    fn test_apply_update() {
        let mut config = EngineConfig::default();
        config.apply_update(&EngineConfigUpdate {
            max_facts: Some(8),
            point_units: Some(vec!["%".into()]),
            ..Default::default()
        });
        assert_eq!(config.max_facts, 8);
        assert!(config.is_point_unit("%"));
        assert!(!config.is_point_unit("bps"));
        assert_eq!(config.headline_max_words, 10);
    }

    #[test]
    fn test_markers_are_case_insensitive_on_config_side() {
        let mut config = EngineConfig::default();
        config.projection_markers = vec!["PROJ".into()];
        assert!(config.has_projection_marker("2025 proj"));
    }

    #[test]
    fn test_projection_markers_match_word_starts() {
        let config = EngineConfig::default();
        assert!(config.has_projection_marker("2026 estimated"));
        assert!(config.has_projection_marker("projected, pre-budget"));
        assert!(!config.has_projection_marker("2023 - highest on record"));
        assert!(!config.has_projection_marker("latest"));
        assert!(!config.has_projection_marker("net interest"));
    }

    #[test]
    fn test_rejects_blank_forecast_marker() {
        let mut config = EngineConfig::default();
        config.forecast_markers.push("  ".into());
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_server_config_loads_engine_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{"maxFacts": 3}"#).unwrap();

        let server = ServerConfig {
            port: 4000,
            bind: "127.0.0.1".into(),
            engine_config_path: Some(path),
        };
        assert_eq!(server.addr(), "127.0.0.1:4000");
        assert_eq!(server.load_engine_config().unwrap().max_facts, 3);
    }
}
