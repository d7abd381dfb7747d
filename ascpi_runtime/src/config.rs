//! Runtime configuration file: engine and glyph settings in one JSON object.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use ascpi_kernel::domain::EngineConfig;
use hexglyph::GlyphConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    pub glyph: GlyphConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(String),

    #[error("invalid engine config: {0}")]
    Engine(#[from] ascpi_kernel::error::EngineError),

    #[error("invalid glyph config: {0}")]
    Glyph(#[from] hexglyph::GlyphError),
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.glyph.validate()?;
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded runtime config");
        Ok(config)
    }
}
