// ABOUTME: JSON config file parameter lookup for deployment settings
// ABOUTME: Rejects missing files, missing keys, and unfilled placeholder values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fs;
use std::path::Path;

use fitbit_core::{ExtractError, ExtractResult};
use serde_json::{Map, Value};

/// Read one string parameter from a flat JSON config file
///
/// A value that is empty, null, or still equal to its own key (the template
/// placeholder) counts as unfilled.
///
/// # Errors
///
/// Returns a `Config` error if the file is missing or unparsable, the key is
/// absent, or the value is unfilled
pub fn read_config_parameter(path: &Path, name: &str) -> ExtractResult<String> {
    if !path.exists() {
        return Err(ExtractError::config(format!(
            "No config file found at {}",
            path.display()
        )));
    }

    let raw = fs::read_to_string(path)?;
    let parameters: Map<String, Value> = serde_json::from_str(&raw)?;

    match parameters.get(name) {
        None => Err(ExtractError::config(format!("Please add {name} to {}", path.display()))),
        Some(Value::Null) => Err(unfilled(name)),
        Some(Value::String(value)) if value.is_empty() || value == name => Err(unfilled(name)),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Ok(other.to_string()),
    }
}

fn unfilled(name: &str) -> ExtractError {
    ExtractError::config(format!("Please fill in {name} with a value"))
}
