// ABOUTME: Library entry point for the Fitbit extraction and transform pipeline
// ABOUTME: Extracts vendor API responses per owner and date, then maps them onto warehouse tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Fitbit Extract
//!
//! Two phases joined by stored raw responses and a message channel.
//!
//! ## Extract
//!
//! A [`caller::FitbitCaller`] holds one owner's token, fetches every
//! registered endpoint for one date in registration order, refreshes the
//! token on 401, aborts on 403, and stores each 200 response under
//! `{endpoint}/{YYYYMMDD}/{instance}_{owner}.{format}`.
//!
//! ## Transform
//!
//! A [`transform::FitbitEtl`] reads one stored file, recovers the owner,
//! date, and endpoint from its path, maps the payload through the static
//! field metadata tables, loads the row sets, records the file in the
//! processing log, and publishes any follow-up endpoint calls it discovered
//! (per-activity TCX exports, for instance).
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fitbit_extract::config::ExtractConfig;
//! use fitbit_extract::pipeline::transform_file;
//!
//! #[tokio::main]
//! async fn main() -> fitbit_extract::ExtractResult<()> {
//!     let config = ExtractConfig::from_env()?;
//!     let outcome = transform_file(
//!         &config,
//!         "local_data/data/get_sleep_by_date/20230118/get_sleep_by_date_ABC123.json",
//!     )
//!     .await?;
//!     println!("{:?}", outcome.rows_loaded);
//!     Ok(())
//! }
//! ```

/// OAuth tokens, token store, and PKCE helpers
pub mod auth;

/// Extraction state machine
pub mod caller;

/// Environment and config file settings
pub mod config;

/// Endpoint catalog, call specs, and registry
pub mod endpoints;

/// Shared HTTP client
pub mod http_client;

/// Logging configuration and pipeline events
pub mod logging;

/// Follow-up messages and run requests
pub mod messaging;

/// Local wiring used by the CLI
pub mod pipeline;

/// Vendor HTTP requester
pub mod requester;

/// Warehouse DDL generation
pub mod schema;

/// Response sink and data loader
pub mod storage;

/// Transform engine, handlers, mapper, and TCX walker
pub mod transform;

pub use fitbit_core::{
    constants, errors, metadata, ErrorCode, ExtractError, ExtractResult, FieldMetadataTable,
    FieldSpec, WarehouseType,
};
