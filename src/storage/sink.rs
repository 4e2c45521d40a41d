// ABOUTME: Response sink seam and local filesystem implementation
// ABOUTME: Stores raw vendor bodies under {folder}/{name}.{format}
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fitbit_core::ExtractResult;
use tokio::fs;

/// Durable store for raw responses
#[async_trait]
pub trait ResponseSink: Send + Sync {
    /// Persist `body` under `{folder}/{name}.{format}`
    async fn save(&self, body: &str, folder: &str, name: &str, format: &str) -> ExtractResult<()>;
}

/// Writes responses below a local root directory
#[derive(Debug, Clone)]
pub struct LocalResponseSink {
    root: PathBuf,
}

impl LocalResponseSink {
    /// Sink rooted at `root`; directories are created on demand
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path a response would be written to
    #[must_use]
    pub fn path_for(&self, folder: &str, name: &str, format: &str) -> PathBuf {
        self.root.join(folder).join(format!("{name}.{format}"))
    }
}

#[async_trait]
impl ResponseSink for LocalResponseSink {
    async fn save(&self, body: &str, folder: &str, name: &str, format: &str) -> ExtractResult<()> {
        let directory = self.root.join(folder);
        fs::create_dir_all(&directory).await?;
        fs::write(self.path_for(folder, name, format), body).await?;
        Ok(())
    }
}
