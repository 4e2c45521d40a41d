// ABOUTME: Entry points wiring local collaborators into extraction and transform runs
// ABOUTME: Used by the CLI; each function handles one owner and date, or one stored file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use fitbit_core::{ExtractError, ExtractResult};
use tracing::info;

use crate::auth::oauth::exchange_authorization_code;
use crate::auth::{LocalTokenStore, Token, TokenStore};
use crate::caller::{FitbitCaller, StoredResponse};
use crate::config::ExtractConfig;
use crate::http_client::shared_client;
use crate::messaging::{LocalMessenger, RunRequest};
use crate::requester::WebApiRequester;
use crate::storage::{LocalDataLoader, LocalResponseSink};
use crate::transform::{FitbitEtl, ProcessOutcome};

/// Token store for the configured files
#[must_use]
pub fn local_token_store(config: &ExtractConfig) -> LocalTokenStore {
    LocalTokenStore::new(
        &config.token_path,
        &config.credentials_path,
        config.token_url.clone(),
    )
}

/// Fetch the requested endpoints for one owner and date into the data dir
///
/// # Errors
///
/// Returns `InvalidParameter` when the stored token belongs to another
/// owner, plus every caller error
pub async fn extract_for_date(
    config: &ExtractConfig,
    request: &RunRequest,
) -> ExtractResult<Vec<StoredResponse>> {
    let store = Arc::new(local_token_store(config));
    let token = store.load().await?;
    if token.owner_id() != request.user_id {
        return Err(ExtractError::invalid_parameter(
            "extract",
            "user_id",
            format!(
                "stored token belongs to {}, not {}",
                token.owner_id(),
                request.user_id
            ),
        ));
    }

    let mut caller = FitbitCaller::new(
        token,
        store,
        Arc::new(WebApiRequester::new()),
        Arc::new(LocalResponseSink::new(&config.data_dir)),
    )
    .with_api_base(config.api_base_url.clone());
    caller.register_multiple_endpoints(request.endpoints.resolve())?;

    let retries = i32::try_from(config.request_retries).unwrap_or(i32::MAX);
    let stored = caller
        .make_registered_requests_for_date(request.date, retries)
        .await?;
    info!(
        user.id = %request.user_id,
        run.date = %request.date,
        responses = stored.len(),
        "Extraction finished"
    );
    Ok(stored)
}

/// Transform one stored response into the warehouse dir
///
/// Follow-up endpoints are logged rather than published.
///
/// # Errors
///
/// Propagates every transform error
pub async fn transform_file(config: &ExtractConfig, path: &str) -> ExtractResult<ProcessOutcome> {
    let etl = FitbitEtl::new(
        Arc::new(LocalDataLoader::new(&config.warehouse_dir)),
        Arc::new(LocalMessenger),
    );
    etl.process(path).await
}

/// Exchange an authorization code and persist the resulting token
///
/// # Errors
///
/// Returns `Config` when credentials are missing, plus token endpoint and
/// storage errors
pub async fn authorize_with_code(
    config: &ExtractConfig,
    code: &str,
    code_verifier: &str,
) -> ExtractResult<Token> {
    let store = local_token_store(config);
    let credentials = store.load_credentials().await?;
    let token = exchange_authorization_code(
        shared_client(),
        &config.token_url,
        &credentials,
        code,
        code_verifier,
    )
    .await?;
    store.save(&token).await?;
    Ok(token)
}
