// ABOUTME: Extraction commands for fitbit-extract
// ABOUTME: Builds a run request from flags or a base64 message and fetches every endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use chrono::Local;
use fitbit_extract::config::ExtractConfig;
use fitbit_extract::endpoints::EndpointSpec;
use fitbit_extract::messaging::{resolve_run_date, EndpointBatch, RunRequest};
use fitbit_extract::pipeline::extract_for_date;
use tracing::info;

/// Fetch endpoints named on the command line
pub async fn extract(
    mut config: ExtractConfig,
    user: String,
    date: &str,
    endpoints: Vec<String>,
    retries: Option<u32>,
) -> Result<()> {
    if let Some(retries) = retries {
        config.request_retries = retries;
    }
    let endpoints = if endpoints.is_empty() {
        EndpointBatch::All
    } else {
        EndpointBatch::Specs(endpoints.into_iter().map(EndpointSpec::new).collect())
    };
    let request = RunRequest {
        user_id: user,
        date: resolve_run_date(date, Local::now().date_naive())?,
        endpoints,
    };
    run(&config, &request).await
}

/// Fetch endpoints described by a base64 run request
pub async fn run_request(config: &ExtractConfig, message: &str) -> Result<()> {
    let request = RunRequest::decode(message, Local::now().date_naive())?;
    run(config, &request).await
}

async fn run(config: &ExtractConfig, request: &RunRequest) -> Result<()> {
    info!(user.id = %request.user_id, run.date = %request.date, "Starting extraction");
    let stored = extract_for_date(config, request).await?;
    for response in &stored {
        println!(
            "{}/{}.{} ({} attempt(s))",
            response.folder, response.name, response.format, response.attempts
        );
    }
    Ok(())
}
