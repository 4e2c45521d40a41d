// ABOUTME: Data loader seam reading stored responses and loading warehouse rows
// ABOUTME: Local implementation dispatches on file extension and appends NDJSON per table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fitbit_core::{ExtractError, ExtractResult};
use serde_json::{Map, Value};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// One output row, column name to value, in column order
pub type Row = Map<String, Value>;

/// Stored response contents
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Parsed JSON document
    Json(Value),
    /// Raw XML text (TCX exports)
    Xml(String),
}

impl Payload {
    /// Decode stored text according to its file extension
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for anything other than `json`, `xml`, or
    /// `tcx`, and `Serialization` when JSON does not parse
    pub fn from_text(extension: &str, text: String) -> ExtractResult<Self> {
        match extension {
            "json" => Ok(Self::Json(serde_json::from_str(&text)?)),
            "xml" | "tcx" => Ok(Self::Xml(text)),
            other => Err(ExtractError::UnsupportedFormat {
                extension: other.to_owned(),
            }),
        }
    }
}

/// Extension of a stored path, without the dot; empty when there is none
#[must_use]
pub fn extension_of(path: &str) -> &str {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
}

/// Reads stored responses and loads transformed rows
#[async_trait]
pub trait DataLoader: Send + Sync {
    /// Read and decode one stored response
    async fn extract(&self, path: &str) -> ExtractResult<Payload>;

    /// Load a row set into a warehouse table; empty sets are a no-op
    async fn load(&self, rows: &[Row], table: &str) -> ExtractResult<()>;
}

/// Reads local files and appends rows to `{warehouse_dir}/{table}.jsonl`
#[derive(Debug, Clone)]
pub struct LocalDataLoader {
    warehouse_dir: PathBuf,
}

impl LocalDataLoader {
    /// Loader writing below `warehouse_dir`
    #[must_use]
    pub fn new(warehouse_dir: impl Into<PathBuf>) -> Self {
        Self {
            warehouse_dir: warehouse_dir.into(),
        }
    }

    /// NDJSON file for one table
    #[must_use]
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.warehouse_dir.join(format!("{table}.jsonl"))
    }
}

#[async_trait]
impl DataLoader for LocalDataLoader {
    async fn extract(&self, path: &str) -> ExtractResult<Payload> {
        let extension = extension_of(path);
        if !matches!(extension, "json" | "xml" | "tcx") {
            return Err(ExtractError::UnsupportedFormat {
                extension: extension.to_owned(),
            });
        }
        let text = fs::read_to_string(path).await?;
        Payload::from_text(extension, text)
    }

    async fn load(&self, rows: &[Row], table: &str) -> ExtractResult<()> {
        if rows.is_empty() {
            return Ok(());
        }

        fs::create_dir_all(&self.warehouse_dir).await?;
        let mut buffer = String::new();
        for row in rows {
            buffer.push_str(&serde_json::to_string(row)?);
            buffer.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.table_path(table))
            .await?;
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
