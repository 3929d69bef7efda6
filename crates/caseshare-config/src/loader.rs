//! Loading and validating `EngineConfig`.

use std::path::Path;

use tracing::debug;

use caseshare_contracts::error::{CaseError, CaseResult};

use crate::settings::EngineConfig;

impl EngineConfig {
    /// Parse `s` as TOML and validate the result.
    ///
    /// Returns `CaseError::ConfigError` if the TOML is malformed, does not
    /// match the `EngineConfig` schema, or fails validation.
    pub fn from_toml_str(s: &str) -> CaseResult<Self> {
        let config: EngineConfig = toml::from_str(s).map_err(|e| CaseError::ConfigError {
            reason: format!("failed to parse engine TOML: {}", e),
        })?;
        config.validate()?;
        debug!(
            disclosure = ?config.access.denial_disclosure,
            max_batch = config.mentions.max_batch,
            ledger_id = %config.audit.ledger_id,
            "engine configuration loaded"
        );
        Ok(config)
    }

    /// Read the file at `path` and parse it as engine configuration.
    pub fn from_file(path: &Path) -> CaseResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CaseError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> CaseResult<()> {
        if self.mentions.max_batch == 0 {
            return Err(CaseError::ConfigError {
                reason: "mentions.max_batch must be at least 1".to_string(),
            });
        }
        if self.audit.ledger_id.trim().is_empty() {
            return Err(CaseError::ConfigError {
                reason: "audit.ledger_id must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
