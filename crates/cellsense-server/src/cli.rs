//! Offline analysis of a JSON feed file.

use std::path::Path;

use cellsense_core::{EngineConfig, Error, Result};
use cellsense_extract::Analyzer;
use tracing::info;

/// Analyze a feed file holding one record object or an array of them.
pub fn analyze_file(path: &Path, config: EngineConfig) -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)?;
    let feed: serde_json::Value = serde_json::from_str(&raw)?;
    analyze_feed(&feed, config)
}

pub fn analyze_feed(feed: &serde_json::Value, config: EngineConfig) -> Result<serde_json::Value> {
    let analyzer = Analyzer::new(config);

    match feed {
        serde_json::Value::Object(record) => Ok(serde_json::to_value(analyzer.analyze_record(record))?),
        serde_json::Value::Array(records) => {
            let mut results = Vec::with_capacity(records.len());
            for (i, record) in records.iter().enumerate() {
                let record = record.as_object().ok_or_else(|| {
                    Error::InvalidInput(format!("feed entry {} is not an object", i))
                })?;
                results.push(serde_json::to_value(analyzer.analyze_record(record))?);
            }
            info!("Analyzed {} records", results.len());
            Ok(serde_json::Value::Array(results))
        }
        _ => Err(Error::InvalidInput(
            "feed must be an object or an array of objects".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_file_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.json");
        std::fs::write(
            &path,
            r#"[{"deal": "Harbor Wind", "irr": 11.2}, {"notes": "Includes: turbines, cabling."}]"#,
        )
        .unwrap();

        let result = analyze_file(&path, EngineConfig::default()).unwrap();
        let records = result.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["fields"][1]["key"], "irr");
        assert_eq!(
            records[1]["fields"][0]["analysis"]["structure"]["scope"]["includes"],
            serde_json::json!(["turbines", "cabling"])
        );
    }

    #[test]
    fn test_rejects_scalar_feed() {
        let err = analyze_feed(&serde_json::json!(42), EngineConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_non_object_entry() {
        let err = analyze_feed(&serde_json::json!([{}, "x"]), EngineConfig::default()).unwrap_err();
        assert!(err.to_string().contains("entry 1"));
    }

    #[test]
    fn test_missing_file() {
        let err = analyze_file(Path::new("/nonexistent/feed.json"), EngineConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
