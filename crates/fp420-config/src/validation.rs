// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks that configuration values are present and within range before the
//! detector is constructed.

use crate::{ConfigError, ConfigResult, Fp420Config};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["text", "json"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &Fp420Config) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_sensitive_detector(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_sensitive_detector(config: &Fp420Config, errors: &mut Vec<ConfigValidationError>) {
    let sd = &config.sensitive_detector;

    if sd.name.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "sensitive_detector.name".to_string(),
        });
    }

    if sd.max_hits_per_event == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "sensitive_detector.max_hits_per_event".to_string(),
            reason: "must be positive".to_string(),
        });
    }

    if sd.verbosity < 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "sensitive_detector.verbosity".to_string(),
            reason: "must not be negative".to_string(),
        });
    }
}

fn validate_logging(config: &Fp420Config, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }

    let format = config.logging.format.to_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.format".to_string(),
            reason: "must be 'text' or 'json'".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Fp420Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_detector_name() {
        let mut config = Fp420Config::default();
        config.sensitive_detector.name = "  ".to_string();

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("sensitive_detector.name"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_hit_cap() {
        let mut config = Fp420Config::default();
        config.sensitive_detector.max_hits_per_event = 0;

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("max_hits_per_event"));
                assert!(msg.contains("positive"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_errors_are_reported_together() {
        let mut config = Fp420Config::default();
        config.sensitive_detector.verbosity = -1;
        config.logging.level = "loud".to_string();
        config.logging.format = "xml".to_string();

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("verbosity"));
                assert!(msg.contains("logging.level"));
                assert!(msg.contains("logging.format"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = Fp420Config::default();
        config.logging.level = "WARN".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
