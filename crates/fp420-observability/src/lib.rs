// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # fp420-observability
//!
//! Logging setup shared by the FP420 crates and tools.
//!
//! Provides consistent `tracing` initialization with per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: File-based log rotation in timestamped run folders

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known FP420 log targets for debug flags
pub const KNOWN_CRATES: &[&str] = &["fp420_hits", "fp420_config", "fp420_replay"];
