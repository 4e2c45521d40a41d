// ABOUTME: Transform command for fitbit-extract
// ABOUTME: Processes one stored response and reports rows loaded per table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use fitbit_extract::config::ExtractConfig;
use fitbit_extract::pipeline::transform_file;

/// Transform one stored file into the warehouse dir
pub async fn transform(config: &ExtractConfig, path: &str) -> Result<()> {
    let outcome = transform_file(config, path).await?;
    for (table, rows) in &outcome.rows_loaded {
        println!("{table}: {rows} row(s)");
    }
    if outcome.follow_ups > 0 {
        println!("{} follow-up endpoint(s) scheduled", outcome.follow_ups);
    }
    Ok(())
}
