//! Query Configuration
//!
//! Initial values for newly created query descriptors, loadable from TOML.
//!
//! - Cursor buffer size
//! - Query timeout

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config_validator::{format_validation_errors, ConfigValidator};
use crate::query::{QueryError, QueryResult, DEFAULT_CURSOR_BUFFER_SIZE, DEFAULT_TIMEOUT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlQueryConfig {
    /// Max buffered rows per cursor
    #[serde(default = "default_cursor_buffer_size")]
    pub cursor_buffer_size: i32,

    /// Query timeout in ms (0 = none, -1 = executor default)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: i64,
}

fn default_cursor_buffer_size() -> i32 {
    DEFAULT_CURSOR_BUFFER_SIZE
}

fn default_timeout_ms() -> i64 {
    DEFAULT_TIMEOUT
}

impl Default for SqlQueryConfig {
    fn default() -> Self {
        Self {
            cursor_buffer_size: default_cursor_buffer_size(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SqlQueryConfig {
    /// Parse and validate configuration from a TOML document
    pub fn from_toml_str(content: &str) -> QueryResult<Self> {
        let config: SqlQueryConfig =
            toml::from_str(content).map_err(|e| QueryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> QueryResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            QueryError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;

        tracing::info!(
            path = %path.display(),
            cursor_buffer_size = config.cursor_buffer_size,
            timeout_ms = config.timeout_ms,
            "sql_query_config_loaded"
        );
        Ok(config)
    }

    /// Validate all fields, reporting every violation at once
    pub fn validate(&self) -> QueryResult<()> {
        let mut v = ConfigValidator::new();
        v.validate_positive("cursor_buffer_size", i64::from(self.cursor_buffer_size))
            .validate_timeout_ms("timeout_ms", self.timeout_ms);

        v.finish()
            .map_err(|errors| QueryError::Config(format_validation_errors(&errors)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SqlQueryConfig::default();
        assert_eq!(config.cursor_buffer_size, 4096);
        assert_eq!(config.timeout_ms, -1);
        assert!(config.validate().is_ok());

        assert_eq!(SqlQueryConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_from_toml() {
        let config = SqlQueryConfig::from_toml_str(
            "cursor_buffer_size = 128\ntimeout_ms = 30000\n",
        )
        .unwrap();
        assert_eq!(config.cursor_buffer_size, 128);
        assert_eq!(config.timeout_ms, 30000);
    }

    #[test]
    fn test_invalid_values_are_all_reported() {
        let err = SqlQueryConfig::from_toml_str("cursor_buffer_size = 0\ntimeout_ms = -5\n")
            .unwrap_err();
        match err {
            QueryError::Config(msg) => {
                assert!(msg.contains("cursor_buffer_size"));
                assert!(msg.contains("timeout_ms"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_toml() {
        let err = SqlQueryConfig::from_toml_str("cursor_buffer_size = \"big\"").unwrap_err();
        assert!(matches!(err, QueryError::Config(_)));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_ms = 0").unwrap();

        let config = SqlQueryConfig::load(file.path()).unwrap();
        assert_eq!(config.timeout_ms, 0);
        assert_eq!(config.cursor_buffer_size, 4096);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SqlQueryConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, QueryError::Config(_)));
    }
}
