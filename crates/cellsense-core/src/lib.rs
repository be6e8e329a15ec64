//! cellsense core: error type and configuration shared by the engine and server.

pub mod config;
pub mod error;

pub use config::{EngineConfig, EngineConfigUpdate, ServerConfig};
pub use error::{Error, Result};
