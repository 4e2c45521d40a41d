// ABOUTME: Extraction state machine fetching every registered endpoint for one date
// ABOUTME: Shared token refresh, bounded per-endpoint retries, 401 re-auth, and 403 abort
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Caller
//!
//! Drives one extraction run: one owner, one date, the registered endpoints
//! in registration order. Every await is sequential; an endpoint's attempts
//! finish before the next endpoint starts.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use fitbit_core::constants::{endpoints, formats::FOLDER_DATE_FORMAT};
use fitbit_core::{ExtractError, ExtractResult};

use crate::auth::{Token, TokenStore};
use crate::endpoints::{EndpointRegistry, EndpointSpec, RegisteredEndpoint};
use crate::logging::PipelineLogger;
use crate::requester::Requester;
use crate::storage::ResponseSink;

const STATUS_OK: u16 = 200;
const STATUS_UNAUTHORIZED: u16 = 401;
const STATUS_FORBIDDEN: u16 = 403;

/// Where one fetched response was stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResponse {
    /// Endpoint catalog name
    pub endpoint: String,
    /// `{endpoint}/{YYYYMMDD}`
    pub folder: String,
    /// `{instance}_{owner}`
    pub name: String,
    /// Stored file extension
    pub format: String,
    /// Attempts spent on this endpoint, including the successful one
    pub attempts: u32,
}

/// Fetches registered endpoints with a shared token
pub struct FitbitCaller {
    token: Token,
    token_store: Arc<dyn TokenStore>,
    requester: Arc<dyn Requester>,
    sink: Arc<dyn ResponseSink>,
    registry: EndpointRegistry,
    api_base: String,
}

impl FitbitCaller {
    /// Caller holding `token` and writing through the given collaborators
    #[must_use]
    pub fn new(
        token: Token,
        token_store: Arc<dyn TokenStore>,
        requester: Arc<dyn Requester>,
        sink: Arc<dyn ResponseSink>,
    ) -> Self {
        Self {
            token,
            token_store,
            requester,
            sink,
            registry: EndpointRegistry::new(),
            api_base: endpoints::FITBIT_API_BASE.to_owned(),
        }
    }

    /// Override the vendor API base URL
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Token currently held
    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }

    /// Registered endpoints
    #[must_use]
    pub const fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Register one endpoint
    ///
    /// # Errors
    ///
    /// Returns `UnknownEndpoint` if the name is not in the catalog
    pub fn register_endpoint(&mut self, spec: EndpointSpec) -> ExtractResult<()> {
        self.registry.register(spec)
    }

    /// Register several endpoints; nothing is registered if any name is unknown
    ///
    /// # Errors
    ///
    /// Returns `UnknownEndpoint` for the first unknown name
    pub fn register_multiple_endpoints<I>(&mut self, specs: I) -> ExtractResult<()>
    where
        I: IntoIterator<Item = EndpointSpec>,
    {
        self.registry.register_many(specs)
    }

    /// Replace the held token with a refreshed one and persist it
    ///
    /// # Errors
    ///
    /// Propagates token store refresh and save failures
    pub async fn refresh_access_token(&mut self, reason: &str) -> ExtractResult<()> {
        let refreshed = self.token_store.refresh(&self.token).await?;
        self.token_store.save(&refreshed).await?;
        PipelineLogger::log_token_refresh(refreshed.owner_id(), reason);
        self.token = refreshed;
        Ok(())
    }

    /// Fetch every registered endpoint for `date`
    ///
    /// Each endpoint gets `retries + 1` attempts. A 401 refreshes the token
    /// and uses up that attempt; a 403 aborts the run.
    ///
    /// # Errors
    ///
    /// - `NoEndpointsRegistered` / `InvalidRetryCount` before any request
    /// - URL build errors from the catalog
    /// - `Forbidden` on the first 403
    /// - `RetryExhausted` when an endpoint never returns 200
    /// - token, transport, and sink failures as they occur
    pub async fn make_registered_requests_for_date(
        &mut self,
        date: NaiveDate,
        retries: i32,
    ) -> ExtractResult<Vec<StoredResponse>> {
        if self.registry.is_empty() {
            return Err(ExtractError::NoEndpointsRegistered);
        }
        let retries = u32::try_from(retries).map_err(|_| ExtractError::InvalidRetryCount { retries })?;

        if !self.token.is_valid() {
            self.refresh_access_token("token not yet validated").await?;
        }

        let endpoints: Vec<RegisteredEndpoint> = self.registry.iter().cloned().collect();
        let mut stored = Vec::with_capacity(endpoints.len());
        for endpoint in &endpoints {
            let result = self.fetch_endpoint(endpoint, date, retries).await;
            match result {
                Ok(response) => stored.push(response),
                Err(error) => {
                    PipelineLogger::log_run_aborted(
                        endpoint.kind().name(),
                        &format!("{:?}", error.code()),
                        &error.to_string(),
                    );
                    return Err(error);
                }
            }
        }
        Ok(stored)
    }

    async fn fetch_endpoint(
        &mut self,
        endpoint: &RegisteredEndpoint,
        date: NaiveDate,
        retries: u32,
    ) -> ExtractResult<StoredResponse> {
        let spec = endpoint.spec();
        let name = endpoint.kind().name();
        let built = endpoint
            .kind()
            .build(&self.api_base, self.token.owner_id(), date, &spec.url_parameters)?;

        let folder = format!("{name}/{}", date.format(FOLDER_DATE_FORMAT));
        let file_name = format!("{}_{}", built.instance_name, self.token.owner_id());
        let max_attempts = retries + 1;
        let mut last_status = 0;

        for attempt in 1..=max_attempts {
            let headers = self.request_headers(spec)?;
            let response = self
                .requester
                .request(spec.method, &built.url, &headers, &spec.body)
                .await?;
            last_status = response.status;
            PipelineLogger::log_request_attempt(name, attempt, max_attempts, response.status);

            match response.status {
                STATUS_FORBIDDEN => {
                    return Err(ExtractError::Forbidden {
                        endpoint: name.to_owned(),
                    })
                }
                STATUS_UNAUTHORIZED => {
                    self.refresh_access_token("vendor returned 401").await?;
                }
                STATUS_OK => {
                    self.sink
                        .save(&response.body, &folder, &file_name, &spec.response_format)
                        .await?;
                    PipelineLogger::log_response_stored(
                        name,
                        &folder,
                        &file_name,
                        &spec.response_format,
                    );
                    return Ok(StoredResponse {
                        endpoint: name.to_owned(),
                        folder,
                        name: file_name,
                        format: spec.response_format.clone(),
                        attempts: attempt,
                    });
                }
                _ => {}
            }
        }

        Err(ExtractError::RetryExhausted {
            endpoint: name.to_owned(),
            retries,
            last_status,
        })
    }

    /// Authorization header first, then spec headers (spec headers win)
    ///
    /// Names are lower-cased so a spec header replaces the default whatever
    /// its casing.
    fn request_headers(&self, spec: &EndpointSpec) -> ExtractResult<BTreeMap<String, String>> {
        let mut headers = BTreeMap::new();
        headers.insert("authorization".to_owned(), self.token.authorization_header()?);
        headers.extend(
            spec.headers
                .iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value.clone())),
        );
        Ok(headers)
    }
}
