// ABOUTME: Transform engine processing one stored response into warehouse rows
// ABOUTME: Path parsing, extraction, per-endpoint handling, loading, processing log, follow-up scheduling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Transform
//!
//! One call to [`FitbitEtl::process`] handles one stored file. A failure stops
//! that file only; row sets already loaded stay loaded and reprocessing the
//! file is the recovery path.

/// Processing context parsed from stored paths
pub mod context;
/// Per-endpoint payload handlers
pub mod handlers;
/// Metadata-driven field mapper
pub mod mapper;
/// TCX activity export walker
pub mod tcx;

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use fitbit_core::constants::{columns, tables};
use fitbit_core::{ExtractError, ExtractResult};
use serde_json::Value;
use tracing::debug;

pub use context::ProcessingContext;
pub use handlers::{has_handler, transform, TableRows, TransformOutput};
pub use mapper::{convert_to_number, flatten, map_record, MappingOptions};

use crate::logging::PipelineLogger;
use crate::messaging::{schedule_follow_ups, Messenger};
use crate::storage::{DataLoader, Row};

/// Summary of one processed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Context parsed from the path
    pub context: ProcessingContext,
    /// Rows loaded per table, in load order, excluding the processing log
    pub rows_loaded: Vec<(&'static str, usize)>,
    /// Follow-up endpoints discovered
    pub follow_ups: usize,
    /// Channel identifier of the follow-up message, if one was sent
    pub message_id: Option<String>,
}

/// Transform engine bound to a loader and a messenger
pub struct FitbitEtl {
    loader: Arc<dyn DataLoader>,
    messenger: Arc<dyn Messenger>,
    processed_at: Option<NaiveDateTime>,
}

impl FitbitEtl {
    /// Engine stamping rows with the current UTC time
    #[must_use]
    pub fn new(loader: Arc<dyn DataLoader>, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            loader,
            messenger,
            processed_at: None,
        }
    }

    /// Fix the `processed_date` stamp
    #[must_use]
    pub const fn with_processed_at(mut self, processed_at: NaiveDateTime) -> Self {
        self.processed_at = Some(processed_at);
        self
    }

    /// Process one stored response
    ///
    /// # Errors
    ///
    /// - path parse errors and `UnknownEndpoint` from the file name
    /// - `NoTransformHandler` before anything is read
    /// - loader, handler, and messenger errors as they occur
    pub async fn process(&self, path: &str) -> ExtractResult<ProcessOutcome> {
        let processed_at = self.processed_at.unwrap_or_else(|| Utc::now().naive_utc());
        let context = ProcessingContext::from_path(path, processed_at)?;
        if !has_handler(context.endpoint) {
            return Err(ExtractError::NoTransformHandler {
                endpoint: context.endpoint.name().to_owned(),
            });
        }

        let payload = self.loader.extract(path).await?;
        let output = transform(&context, &payload)?;
        debug!(
            api.endpoint = context.endpoint.name(),
            rows = output.row_count(),
            "Payload transformed"
        );

        let mut rows_loaded = Vec::with_capacity(output.tables.len());
        for TableRows { table, rows } in &output.tables {
            self.loader.load(rows, table).await?;
            PipelineLogger::log_rows_loaded(table, rows.len());
            rows_loaded.push((*table, rows.len()));
        }

        self.log_processing(&context).await?;

        let follow_ups = output.follow_ups.len();
        let message_id = schedule_follow_ups(
            self.messenger.as_ref(),
            output.follow_ups,
            &context.owner_id,
            &context.date_string(),
        )
        .await?;

        Ok(ProcessOutcome {
            context,
            rows_loaded,
            follow_ups,
            message_id,
        })
    }

    async fn log_processing(&self, context: &ProcessingContext) -> ExtractResult<()> {
        let mut row = Row::new();
        row.insert(columns::DATE.to_owned(), Value::from(context.date_string()));
        row.insert(columns::USER_ID.to_owned(), Value::from(context.owner_id.as_str()));
        row.insert(
            columns::PROCESSED_DATE.to_owned(),
            Value::from(context.processed_date_string()),
        );
        row.insert(columns::API_ENDPOINT.to_owned(), Value::from(context.endpoint.name()));
        row.insert(
            columns::FILE_PROCESSED.to_owned(),
            Value::from(context.source_path.as_str()),
        );
        self.loader.load(&[row], tables::FILES_PROCESSED).await
    }
}
