// ABOUTME: Process-wide HTTP client with configured request and connect timeouts
// ABOUTME: Initialised once from configuration and reused by the requester and token store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::OnceLock;
use std::time::Duration;

use fitbit_core::constants::defaults;
use reqwest::{Client, ClientBuilder};

/// Configured timeout values for the shared client
static CLIENT_TIMEOUTS: OnceLock<(u64, u64)> = OnceLock::new();

/// Global shared HTTP client with configured timeouts
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Record the timeouts the shared client is built with
///
/// Must run before the first call to [`shared_client`]; later calls are ignored.
pub fn initialize_shared_client(timeout_secs: u64, connect_timeout_secs: u64) {
    let _ = CLIENT_TIMEOUTS.set((timeout_secs, connect_timeout_secs));
}

/// Shared client for vendor API and token endpoint calls
///
/// Every call carries the same fixed wall-clock timeout; there is no other
/// cancellation path.
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        let (timeout, connect_timeout) = CLIENT_TIMEOUTS.get().copied().unwrap_or((
            defaults::HTTP_TIMEOUT_SECS,
            defaults::HTTP_CONNECT_TIMEOUT_SECS,
        ));

        ClientBuilder::new()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(connect_timeout))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}
