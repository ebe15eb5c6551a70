// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later tiers win:
//! 1. TOML file (base values)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, Fp420Config};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "fp420_configuration.toml";

/// Find the FP420 configuration file
///
/// Search order:
/// 1. `FP420_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("FP420_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by FP420_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet FP420_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<Fp420Config> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: Fp420Config = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `FP420_SD_NAME` -> `sensitive_detector.name`
/// - `FP420_SD_VERBOSITY` -> `sensitive_detector.verbosity`
/// - `FP420_MAX_HITS` -> `sensitive_detector.max_hits_per_event`
/// - `FP420_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut Fp420Config) {
    if let Ok(value) = env::var("FP420_SD_NAME") {
        config.sensitive_detector.name = value;
    }
    if let Ok(value) = env::var("FP420_SD_VERBOSITY") {
        if let Ok(verbosity) = value.parse::<i32>() {
            config.sensitive_detector.verbosity = verbosity;
        }
    }
    if let Ok(value) = env::var("FP420_MAX_HITS") {
        if let Ok(max_hits) = value.parse::<usize>() {
            config.sensitive_detector.max_hits_per_event = max_hits;
        }
    }
    if let Ok(value) = env::var("FP420_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// Recognised keys: `sd_name`, `verbosity`, `max_hits`, `log_level`, `log_format`.
pub fn apply_cli_overrides(config: &mut Fp420Config, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("sd_name") {
        config.sensitive_detector.name = value.clone();
    }
    if let Some(value) = cli_args.get("verbosity") {
        if let Ok(verbosity) = value.parse::<i32>() {
            config.sensitive_detector.verbosity = verbosity;
        }
    }
    if let Some(value) = cli_args.get("max_hits") {
        if let Ok(max_hits) = value.parse::<usize>() {
            config.sensitive_detector.max_hits_per_event = max_hits;
        }
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        config.logging.format = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_override_env() {
        for key in [
            "FP420_SD_NAME",
            "FP420_SD_VERBOSITY",
            "FP420_MAX_HITS",
            "FP420_LOG_LEVEL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("FP420_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("FP420_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing_file() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("does_not_exist.toml");

        env::set_var("FP420_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("FP420_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_override_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[sensitive_detector]").unwrap();
        writeln!(file, "verbosity = 3").unwrap();
        writeln!(file, "max_hits_per_event = 500").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.sensitive_detector.verbosity, 3);
        assert_eq!(config.sensitive_detector.max_hits_per_event, 500);
        assert_eq!(config.sensitive_detector.name, "FP420SI");
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = Fp420Config::default();

        env::set_var("FP420_SD_NAME", "FP420XX");
        env::set_var("FP420_MAX_HITS", "42");
        env::set_var("FP420_SD_VERBOSITY", "not-a-number");

        apply_environment_overrides(&mut config);
        clear_override_env();

        assert_eq!(config.sensitive_detector.name, "FP420XX");
        assert_eq!(config.sensitive_detector.max_hits_per_event, 42);
        assert_eq!(config.sensitive_detector.verbosity, 0);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Fp420Config::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("verbosity".to_string(), "1".to_string());
        cli_args.insert("log_format".to_string(), "json".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert_eq!(config.sensitive_detector.verbosity, 1);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_override_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "level = \"warn\"").unwrap();
        writeln!(file, "[sensitive_detector]").unwrap();
        writeln!(file, "verbosity = 1").unwrap();

        env::set_var("FP420_LOG_LEVEL", "debug");
        env::set_var("FP420_SD_VERBOSITY", "2");

        let mut cli_args = HashMap::new();
        cli_args.insert("log_level".to_string(), "trace".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();
        clear_override_env();

        // CLI wins for level, env wins for verbosity (no CLI override)
        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.sensitive_detector.verbosity, 2);
    }
}
