// ABOUTME: Environment-based configuration for extraction and transform runs
// ABOUTME: Typed settings with defaults for API URLs, storage roots, retries, and timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use fitbit_core::constants::{defaults, endpoints, env_config};
use fitbit_core::{ExtractError, ExtractResult};
use tracing::info;

/// Runtime settings read from the process environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Base URL of the vendor Web API
    pub api_base_url: String,
    /// OAuth2 token endpoint
    pub token_url: String,
    /// OAuth2 authorization endpoint
    pub authorization_url: String,
    /// Root directory raw responses are written under
    pub data_dir: PathBuf,
    /// Directory the local loader appends warehouse rows to
    pub warehouse_dir: PathBuf,
    /// Token record location
    pub token_path: PathBuf,
    /// App credentials location
    pub credentials_path: PathBuf,
    /// Retries per endpoint after the first attempt
    pub request_retries: u32,
    /// Per-call wall-clock timeout
    pub http_timeout_secs: u64,
    /// Connection establishment timeout
    pub http_connect_timeout_secs: u64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            api_base_url: endpoints::FITBIT_API_BASE.to_owned(),
            token_url: endpoints::FITBIT_TOKEN_URL.to_owned(),
            authorization_url: endpoints::FITBIT_AUTHORIZATION_URL.to_owned(),
            data_dir: PathBuf::from(defaults::DATA_DIR),
            warehouse_dir: PathBuf::from(defaults::WAREHOUSE_DIR),
            token_path: PathBuf::from(defaults::TOKEN_PATH),
            credentials_path: PathBuf::from(defaults::CREDENTIALS_PATH),
            request_retries: defaults::REQUEST_RETRIES,
            http_timeout_secs: defaults::HTTP_TIMEOUT_SECS,
            http_connect_timeout_secs: defaults::HTTP_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ExtractConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a `Config` error naming the variable when a numeric value does
    /// not parse
    pub fn from_env() -> ExtractResult<Self> {
        let config = Self {
            api_base_url: env_var_or(env_config::API_BASE_URL, endpoints::FITBIT_API_BASE),
            token_url: env_var_or(env_config::TOKEN_URL, endpoints::FITBIT_TOKEN_URL),
            authorization_url: env_var_or(
                env_config::AUTHORIZATION_URL,
                endpoints::FITBIT_AUTHORIZATION_URL,
            ),
            data_dir: PathBuf::from(env_var_or(env_config::DATA_DIR, defaults::DATA_DIR)),
            warehouse_dir: PathBuf::from(env_var_or(
                env_config::WAREHOUSE_DIR,
                defaults::WAREHOUSE_DIR,
            )),
            token_path: PathBuf::from(env_var_or(env_config::TOKEN_PATH, defaults::TOKEN_PATH)),
            credentials_path: PathBuf::from(env_var_or(
                env_config::CREDENTIALS_PATH,
                defaults::CREDENTIALS_PATH,
            )),
            request_retries: env_parse_or(env_config::REQUEST_RETRIES, defaults::REQUEST_RETRIES)?,
            http_timeout_secs: env_parse_or(
                env_config::HTTP_TIMEOUT_SECS,
                defaults::HTTP_TIMEOUT_SECS,
            )?,
            http_connect_timeout_secs: env_parse_or(
                env_config::HTTP_CONNECT_TIMEOUT_SECS,
                defaults::HTTP_CONNECT_TIMEOUT_SECS,
            )?,
        };

        info!(
            api.base_url = %config.api_base_url,
            storage.data_dir = %config.data_dir.display(),
            api.retries = config.request_retries,
            "Configuration loaded from environment"
        );
        Ok(config)
    }
}

impl fmt::Display for ExtractConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "api={} data_dir={} warehouse_dir={} retries={} timeout={}s",
            self.api_base_url,
            self.data_dir.display(),
            self.warehouse_dir.display(),
            self.request_retries,
            self.http_timeout_secs
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_parse_or<T>(key: &str, default: T) -> ExtractResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ExtractError::config(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}
