// ABOUTME: Token store seam and its local JSON file implementation
// ABOUTME: Loads unvalidated tokens, persists refreshed ones, and refreshes via the token endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fitbit_core::{ExtractError, ExtractResult};
use tokio::fs;
use tracing::debug;

use super::oauth::refresh_access_token;
use super::token::{AppCredentials, Token, TokenRecord};
use crate::http_client::shared_client;

/// Supplies and persists the OAuth token for one owner
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the stored token; the result is never marked valid
    async fn load(&self) -> ExtractResult<Token>;

    /// Persist a token
    async fn save(&self, token: &Token) -> ExtractResult<()>;

    /// Produce a replacement token from the token's refresh token
    async fn refresh(&self, token: &Token) -> ExtractResult<Token>;
}

/// Token store backed by local JSON files
#[derive(Debug, Clone)]
pub struct LocalTokenStore {
    token_path: PathBuf,
    credentials_path: PathBuf,
    token_url: String,
}

impl LocalTokenStore {
    /// Create a store reading and writing the given files
    #[must_use]
    pub fn new(
        token_path: impl Into<PathBuf>,
        credentials_path: impl Into<PathBuf>,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            token_path: token_path.into(),
            credentials_path: credentials_path.into(),
            token_url: token_url.into(),
        }
    }

    /// Location of the token record
    #[must_use]
    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    /// Load the app credentials file
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the file is missing, unparsable, or blank
    pub async fn load_credentials(&self) -> ExtractResult<AppCredentials> {
        let raw = fs::read_to_string(&self.credentials_path).await.map_err(|e| {
            ExtractError::config(format!(
                "No app credentials found at {}: {e}",
                self.credentials_path.display()
            ))
        })?;
        let credentials: AppCredentials = serde_json::from_str(&raw).map_err(|e| {
            ExtractError::config(format!(
                "Invalid app credentials in {}: {e}",
                self.credentials_path.display()
            ))
        })?;
        credentials.validate()?;
        Ok(credentials)
    }
}

#[async_trait]
impl TokenStore for LocalTokenStore {
    async fn load(&self) -> ExtractResult<Token> {
        let raw = fs::read_to_string(&self.token_path).await.map_err(|e| {
            ExtractError::storage(format!(
                "Could not read token at {}: {e}",
                self.token_path.display()
            ))
        })?;
        let record: TokenRecord = serde_json::from_str(&raw)?;
        debug!(user.id = %record.user_id, "Loaded token record");
        Ok(record.into())
    }

    async fn save(&self, token: &Token) -> ExtractResult<()> {
        if let Some(parent) = self.token_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let body = serde_json::to_string_pretty(&TokenRecord::from(token))?;
        fs::write(&self.token_path, body).await?;
        debug!(user.id = %token.owner_id(), path = %self.token_path.display(), "Saved token record");
        Ok(())
    }

    async fn refresh(&self, token: &Token) -> ExtractResult<Token> {
        let credentials = self.load_credentials().await?;
        refresh_access_token(shared_client(), &self.token_url, &credentials, token).await
    }
}
