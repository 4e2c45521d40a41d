// ABOUTME: fitbit-extract CLI - runs extractions, transforms, schema generation, and authorization
// ABOUTME: Reads FITBIT_* configuration from the environment and logs to stderr
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Fetch the default endpoints for yesterday
//! fitbit-extract extract --user ABC123 --date current
//!
//! # Fetch one endpoint with URL parameters
//! fitbit-extract extract --user ABC123 --date 2023-01-18 --endpoint get_heart_rate_by_date
//!
//! # Run a base64 encoded request as delivered by the message channel
//! fitbit-extract run-request --message eyJ1c2VyX2lkIjogLi4ufQ==
//!
//! # Transform one stored response
//! fitbit-extract transform local_data/data/get_sleep_by_date/20230118/get_sleep_by_date_ABC123.json
//!
//! # Print warehouse DDL
//! fitbit-extract schema --project my-project --dataset fitbit
//!
//! # One-off local authorization
//! fitbit-extract authorize --scope "activity heartrate sleep"
//! fitbit-extract exchange --callback-url "<redirected url>" --verifier <verifier>
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fitbit_extract::config::ExtractConfig;
use fitbit_extract::http_client::initialize_shared_client;
use fitbit_extract::logging::LoggingConfig;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "fitbit-extract",
    about = "Fitbit Web API extraction and warehouse transform",
    long_about = "Fetches Fitbit Web API responses per owner and date, stores them raw, and transforms stored responses into warehouse rows."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Fetch endpoints for one owner and date
    Extract {
        /// Owner user id; must match the stored token
        #[arg(long)]
        user: String,

        /// Run date as YYYY-MM-DD, or "current" for yesterday
        #[arg(long, default_value = "current")]
        date: String,

        /// Endpoint name to fetch (repeatable, defaults to the standard set)
        #[arg(long = "endpoint")]
        endpoints: Vec<String>,

        /// Override `FITBIT_REQUEST_RETRIES`
        #[arg(long)]
        retries: Option<u32>,
    },

    /// Run a base64 encoded run request
    RunRequest {
        /// Base64 JSON `{user_id, date, endpoints}`
        #[arg(long)]
        message: String,
    },

    /// Transform a stored response into warehouse rows
    Transform {
        /// Stored path `{endpoint}/{YYYYMMDD}/{instance}_{user}.{format}`
        path: String,
    },

    /// Print CREATE statements for every warehouse table
    Schema {
        /// Warehouse project id (falls back to `gcp_project` in --config)
        #[arg(long)]
        project: Option<String>,

        /// Dataset name (falls back to `gcp_bq_dataset` in --config)
        #[arg(long)]
        dataset: Option<String>,

        /// JSON config file holding the project and dataset
        #[arg(long, default_value = "config.json")]
        config: PathBuf,

        /// Keep existing tables instead of replacing them
        #[arg(long)]
        if_not_exists: bool,

        /// Write the script to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print an authorization URL and the PKCE verifier to use with it
    Authorize {
        /// Space separated scopes
        #[arg(long, default_value = "activity heartrate sleep weight cardio_fitness")]
        scope: String,

        /// Client id (falls back to the credentials file)
        #[arg(long)]
        client_id: Option<String>,
    },

    /// Exchange an authorization code and store the token
    Exchange {
        /// Authorization code
        #[arg(long, conflicts_with = "callback_url", required_unless_present = "callback_url")]
        code: Option<String>,

        /// Full redirect URL, the code is parsed out of it
        #[arg(long)]
        callback_url: Option<String>,

        /// PKCE verifier printed by `authorize`
        #[arg(long)]
        verifier: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging.level = "debug".to_owned();
    }
    logging.init()?;

    let config = ExtractConfig::from_env()?;
    debug!("Configuration: {config}");
    initialize_shared_client(config.http_timeout_secs, config.http_connect_timeout_secs);

    match cli.command {
        Command::Extract {
            user,
            date,
            endpoints,
            retries,
        } => commands::extract::extract(config, user, &date, endpoints, retries).await?,
        Command::RunRequest { message } => commands::extract::run_request(&config, &message).await?,
        Command::Transform { path } => commands::transform::transform(&config, &path).await?,
        Command::Schema {
            project,
            dataset,
            config: config_file,
            if_not_exists,
            output,
        } => commands::schema::schema(project, dataset, &config_file, if_not_exists, output)?,
        Command::Authorize { scope, client_id } => {
            commands::authorize::authorize(&config, &scope, client_id).await?;
        }
        Command::Exchange {
            code,
            callback_url,
            verifier,
        } => commands::authorize::exchange(&config, code, callback_url, &verifier).await?,
    }

    Ok(())
}
