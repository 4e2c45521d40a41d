// ABOUTME: Configuration module for extraction and transform runs
// ABOUTME: Environment settings plus JSON config file parameter lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration
//!
//! - **environment**: `ExtractConfig` built from `FITBIT_*` environment variables
//! - **file**: single-parameter lookup in a deployment `config.json`

/// Environment-based run configuration
pub mod environment;
/// JSON config file parameter lookup
pub mod file;

pub use environment::ExtractConfig;
pub use file::read_config_parameter;
