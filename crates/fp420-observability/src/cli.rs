// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-fp420-hits` to raise one crate to debug level.

use std::collections::HashMap;
use std::env;

use crate::KNOWN_CRATES;

/// Per-crate debug switches parsed from arguments and `FP420_DEBUG`
///
/// # Example
/// ```rust
/// use fp420_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-fp420-hits".to_string()]);
/// assert!(flags.is_enabled("fp420_hits"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: HashMap<String, bool>,
}

/// Crate names are accepted with dashes but tracing targets use underscores.
fn normalize(crate_name: &str) -> String {
    crate_name.trim().replace('-', "_")
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}`; `--debug-all`
    /// enables every known crate.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();

        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
                continue;
            }
            if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enable(crate_name);
            }
        }

        flags
    }

    pub fn enable(&mut self, crate_name: &str) {
        let name = normalize(crate_name);
        if !name.is_empty() {
            self.enabled_crates.insert(name, true);
        }
    }

    pub fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enable(crate_name);
        }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains_key(&normalize(crate_name))
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Get log level for a crate
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Build an `EnvFilter` directive string
    ///
    /// Format: `fp420_hits=debug,info`, with `default_level` as the trailing
    /// directive for every other target.
    pub fn to_filter_string(&self, default_level: &str) -> String {
        let mut names: Vec<&String> = self.enabled_crates.keys().collect();
        names.sort();

        let mut filters: Vec<String> = names
            .into_iter()
            .map(|crate_name| format!("{}=debug", crate_name))
            .collect();
        filters.push(default_level.to_lowercase());
        filters.join(",")
    }
}

/// Parse debug flags from process arguments and the `FP420_DEBUG` variable
///
/// Environment variable format: comma-separated crate names or `all`.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());

    if let Ok(env_var) = env::var("FP420_DEBUG") {
        if env_var == "all" {
            flags.enable_all();
        } else {
            for crate_name in env_var.split(',') {
                flags.enable(crate_name);
            }
        }
    }

    flags
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  FP420_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  FP420_DEBUG=all                               Enable debug for all crates
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-fp420-hits".to_string()]);
        assert!(flags.is_enabled("fp420-hits"));
        assert!(flags.is_enabled("fp420_hits"));
        assert!(!flags.is_enabled("fp420_config"));
    }

    #[test]
    fn test_unrelated_args_ignored() {
        let flags = CrateDebugFlags::from_args(vec![
            "--input".to_string(),
            "events.json".to_string(),
        ]);
        assert!(!flags.any_enabled());
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_filter_string() {
        let flags = CrateDebugFlags::from_args(vec![
            "--debug-fp420-hits".to_string(),
            "--debug-fp420-config".to_string(),
        ]);
        assert_eq!(
            flags.to_filter_string("WARN"),
            "fp420_config=debug,fp420_hits=debug,warn"
        );
        assert_eq!(CrateDebugFlags::default().to_filter_string("info"), "info");
    }

    #[test]
    fn test_log_level() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-fp420-hits".to_string()]);
        assert_eq!(flags.log_level("fp420_hits"), tracing::Level::DEBUG);
        assert_eq!(flags.log_level("fp420_config"), tracing::Level::INFO);
    }
}
