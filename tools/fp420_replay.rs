// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! FP420 event replay.
//!
//! Reads recorded transport steps from JSON, drives the FP420 sensitive
//! detector through each event and writes the persisted hits as JSON lines.

use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};

use fp420::config::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    validate_config, Fp420Config,
};
use fp420::observability::{debug_flags_help, init_logging, parse_debug_flags};
use fp420::replay::{read_input, write_json_lines, ReplayRunner};

struct Args {
    input: PathBuf,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    overrides: HashMap<String, String>,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: fp420_replay --input <path> [--config <path>] [--output <path>]\n\
         \x20                   [--sd-name <name>] [--verbosity <n>] [--max-hits <n>] [--log-level <level>]\n\n\
         Defaults:\n\
         - config: fp420_configuration.toml (searched from the working directory)\n\
         - output: stdout\n\n\
         {}",
        debug_flags_help()
    );
    process::exit(2);
}

fn parse_args() -> Args {
    let mut input = None;
    let mut config = None;
    let mut output = None;
    let mut overrides = HashMap::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = || args.next().unwrap_or_else(|| usage_and_exit());
        match arg.as_str() {
            "--input" => input = Some(PathBuf::from(value())),
            "--config" => config = Some(PathBuf::from(value())),
            "--output" => output = Some(PathBuf::from(value())),
            "--sd-name" => {
                overrides.insert("sd_name".to_string(), value());
            }
            "--verbosity" => {
                overrides.insert("verbosity".to_string(), value());
            }
            "--max-hits" => {
                overrides.insert("max_hits".to_string(), value());
            }
            "--log-level" => {
                overrides.insert("log_level".to_string(), value());
            }
            "-h" | "--help" => usage_and_exit(),
            // consumed by parse_debug_flags
            other if other.starts_with("--debug-") => {}
            other => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
        }
    }

    Args {
        input: input.unwrap_or_else(|| usage_and_exit()),
        config,
        output,
        overrides,
    }
}

fn run(args: Args) -> Result<()> {
    // Without an explicit --config a missing file falls back to defaults
    let mut config = match args.config.as_deref() {
        Some(path) => load_config(Some(path), None).context("Failed to load configuration")?,
        None => match find_config_file() {
            Ok(path) => load_config(Some(&path), None).context("Failed to load configuration")?,
            Err(_) => {
                let mut config = Fp420Config::default();
                apply_environment_overrides(&mut config);
                config
            }
        },
    };
    apply_cli_overrides(&mut config, &args.overrides);
    validate_config(&config).context("Invalid configuration")?;

    let debug_flags = parse_debug_flags();
    let _guard = init_logging(&debug_flags, &config.logging)?;

    let input = read_input(&args.input)?;
    let mut runner = ReplayRunner::new(&config, &input.logical_volumes);
    let results = runner.run(&input);

    match args.output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            write_json_lines(&results, BufWriter::new(file))
        }
        None => write_json_lines(&results, io::stdout().lock()),
    }
}

fn main() {
    let args = parse_args();
    if let Err(err) = run(args) {
        eprintln!("fp420_replay: {err:#}");
        process::exit(1);
    }
}
