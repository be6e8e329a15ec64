//! Shared application state.

use std::sync::atomic::{AtomicU64, Ordering};

use cellsense_core::{EngineConfig, ServerConfig};
use cellsense_extract::Analyzer;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub engine_config: RwLock<EngineConfig>,
    pub started_at: DateTime<Utc>,
    analyzed: AtomicU64,
}

impl AppState {
    pub fn new(config: ServerConfig, engine_config: EngineConfig) -> Self {
        Self {
            config,
            engine_config: RwLock::new(engine_config),
            started_at: Utc::now(),
            analyzed: AtomicU64::new(0),
        }
    }

    /// Snapshot the current thresholds into an analyzer for one request.
    pub fn analyzer(&self) -> Analyzer {
        Analyzer::new(self.engine_config.read().clone())
    }

    pub fn record_analyzed(&self, cells: usize) {
        self.analyzed.fetch_add(cells as u64, Ordering::Relaxed);
    }

    pub fn analyzed_count(&self) -> u64 {
        self.analyzed.load(Ordering::Relaxed)
    }
}
