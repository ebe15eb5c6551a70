// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `fp420_configuration.toml`.

use serde::{Deserialize, Serialize};

/// Default cap on the number of hits persisted per event
pub const DEFAULT_MAX_HITS_PER_EVENT: usize = 15_000;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Fp420Config {
    pub sensitive_detector: SensitiveDetectorConfig,
    pub logging: LoggingConfig,
}

/// Sensitive detector parameters (the `FP420SD` parameter set)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SensitiveDetectorConfig {
    /// Registered detector name; selects the numbering scheme
    pub name: String,
    /// Log verbosity; values above 0 enable per-hit debug traces
    pub verbosity: i32,
    /// Hits beyond this count are not handed downstream at end of event
    pub max_hits_per_event: usize,
}

impl Default for SensitiveDetectorConfig {
    fn default() -> Self {
        Self {
            name: "FP420SI".to_string(),
            verbosity: 0,
            max_hits_per_event: DEFAULT_MAX_HITS_PER_EVENT,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// text or json
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}
