// ABOUTME: HTTP requester seam performing one vendor API call per invocation
// ABOUTME: Returns body and status untouched; status interpretation belongs to the caller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use async_trait::async_trait;
use fitbit_core::{ExtractError, ExtractResult};
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::debug;

use crate::endpoints::HttpMethod;
use crate::http_client::shared_client;

/// Raw outcome of one HTTP call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Response body as text
    pub body: String,
    /// HTTP status code
    pub status: u16,
}

impl ApiResponse {
    /// Build from parts
    #[must_use]
    pub fn new(body: impl Into<String>, status: u16) -> Self {
        Self {
            body: body.into(),
            status,
        }
    }
}

/// Performs one HTTP call
#[async_trait]
pub trait Requester: Send + Sync {
    /// Issue the call and return body and status
    ///
    /// Non-2xx statuses are not errors here.
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: &Map<String, Value>,
    ) -> ExtractResult<ApiResponse>;
}

/// Requester backed by the shared `reqwest` client
#[derive(Debug, Clone)]
pub struct WebApiRequester {
    client: Client,
}

impl Default for WebApiRequester {
    fn default() -> Self {
        Self {
            client: shared_client().clone(),
        }
    }
}

impl WebApiRequester {
    /// Requester using the process-wide client
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requester using a specific client
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Requester for WebApiRequester {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: &Map<String, Value>,
    ) -> ExtractResult<ApiResponse> {
        let mut builder = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url).json(body),
            other => {
                return Err(ExtractError::invalid_parameter(
                    url,
                    "method",
                    format!("{other} is not supported by the requester"),
                ))
            }
        };
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!(http.method = %method, http.url = %url, "Sending vendor request");
        let response = builder
            .send()
            .await
            .map_err(|e| ExtractError::transport(format!("request to {url} failed: {e}")))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ExtractError::transport(format!("reading body from {url} failed: {e}")))?;

        Ok(ApiResponse::new(text, status))
    }
}
