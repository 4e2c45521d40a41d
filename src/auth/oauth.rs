// ABOUTME: OAuth2 token endpoint client for refresh and authorization code exchange
// ABOUTME: Form POST with HTTP basic auth, producing a validated Token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use fitbit_core::{ExtractError, ExtractResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use super::token::{AppCredentials, Token};

/// Token endpoint response body
#[derive(Debug, Deserialize)]
pub struct TokenEndpointResponse {
    /// New access token
    pub access_token: String,
    /// New refresh token (the previous one is revoked)
    pub refresh_token: String,
    /// Granted scopes
    pub scope: String,
    /// Vendor user id
    pub user_id: String,
}

impl From<TokenEndpointResponse> for Token {
    fn from(response: TokenEndpointResponse) -> Self {
        Self::new(
            response.refresh_token,
            response.access_token,
            response.scope,
            response.user_id,
        )
        .into_valid()
    }
}

async fn post_token_form(
    client: &Client,
    token_url: &str,
    credentials: &AppCredentials,
    params: &[(&str, &str)],
) -> ExtractResult<Token> {
    let response = client
        .post(token_url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(params)
        .send()
        .await
        .map_err(|e| ExtractError::transport(format!("token request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(http.status = status.as_u16(), "Token endpoint returned error: {body}");
        return Err(ExtractError::token_request(format!(
            "token endpoint returned {status}"
        )));
    }

    let parsed: TokenEndpointResponse = response
        .json()
        .await
        .map_err(|e| ExtractError::token_request(format!("unparsable token response: {e}")))?;
    Ok(parsed.into())
}

/// Exchange a refresh token for a new validated token
///
/// # Errors
///
/// Returns `Transport` on network failure and `TokenRequest` on a non-2xx
/// status or an unparsable body
pub async fn refresh_access_token(
    client: &Client,
    token_url: &str,
    credentials: &AppCredentials,
    token: &Token,
) -> ExtractResult<Token> {
    info!(user.id = %token.owner_id(), "Refreshing access token");
    let params = [
        ("grant_type", "refresh_token"),
        ("refresh_token", token.refresh_token()),
        ("client_id", credentials.client_id.as_str()),
    ];
    post_token_form(client, token_url, credentials, &params).await
}

/// Exchange an authorization code plus PKCE verifier for a token
///
/// # Errors
///
/// Returns `Config` for blank credentials, otherwise the same failures as
/// [`refresh_access_token`]
pub async fn exchange_authorization_code(
    client: &Client,
    token_url: &str,
    credentials: &AppCredentials,
    code: &str,
    code_verifier: &str,
) -> ExtractResult<Token> {
    credentials.validate()?;
    let params = [
        ("client_id", credentials.client_id.as_str()),
        ("code", code),
        ("code_verifier", code_verifier),
        ("grant_type", "authorization_code"),
    ];
    post_token_form(client, token_url, credentials, &params).await
}
