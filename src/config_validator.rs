//! Configuration Validation
//!
//! Validates configuration values, collecting every violation
//! with an explicit error message.

use crate::query::TIMEOUT_NOT_SET;

/// Configuration validation errors
#[derive(Debug)]
pub struct ConfigValidationError {
    pub field: String,
    pub value: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid configuration for '{}': {} (value: {})",
            self.field, self.message, self.value
        )
    }
}

impl std::error::Error for ConfigValidationError {}

/// Result of config validation
pub type ConfigResult<T> = Result<T, Vec<ConfigValidationError>>;

/// Configuration validator
pub struct ConfigValidator {
    errors: Vec<ConfigValidationError>,
}

impl ConfigValidator {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    fn error(&mut self, field: &str, value: impl std::fmt::Display, message: &str) {
        self.errors.push(ConfigValidationError {
            field: field.to_string(),
            value: value.to_string(),
            message: message.to_string(),
        });
    }

    /// Validate positive integer
    pub fn validate_positive(&mut self, field: &str, value: i64) -> &mut Self {
        if value <= 0 {
            self.error(field, value, "Value must be positive");
        }
        self
    }

    /// Validate timeout: non-negative, or -1 for "not set"
    pub fn validate_timeout_ms(&mut self, field: &str, ms: i64) -> &mut Self {
        if ms < 0 && ms != TIMEOUT_NOT_SET {
            self.error(field, format!("{}ms", ms), "Timeout must be non-negative or -1");
        }
        self
    }

    /// Finish validation and return result
    pub fn finish(self) -> ConfigResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// Check if any errors occurred
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Format validation errors for display
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_validation() {
        let mut v = ConfigValidator::new();
        v.validate_positive("cursor_buffer_size", 1);
        assert!(v.finish().is_ok());

        let mut v = ConfigValidator::new();
        v.validate_positive("cursor_buffer_size", 0);
        let err = v.finish().unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err[0].message.contains("positive"));
    }

    #[test]
    fn test_timeout_validation() {
        let mut v = ConfigValidator::new();
        v.validate_timeout_ms("timeout_ms", -1)
            .validate_timeout_ms("timeout_ms", 0)
            .validate_timeout_ms("timeout_ms", 5000);
        assert!(!v.has_errors());

        let mut v = ConfigValidator::new();
        v.validate_timeout_ms("timeout_ms", -2);
        let err = v.finish().unwrap_err();
        assert_eq!(err[0].value, "-2ms");
    }

    #[test]
    fn test_multiple_errors() {
        let mut v = ConfigValidator::new();
        v.validate_positive("cursor_buffer_size", -5)
            .validate_timeout_ms("timeout_ms", -10);

        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        let rendered = format_validation_errors(&errors);
        assert!(rendered.starts_with("  - Invalid configuration for 'cursor_buffer_size'"));
    }
}
