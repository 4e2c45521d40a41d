// ABOUTME: Local authorization commands for fitbit-extract
// ABOUTME: Prints a PKCE authorization URL and exchanges the returned code for a stored token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{anyhow, Result};
use fitbit_extract::auth::pkce::{authorization_url, generate_code_verifier, parse_callback_code};
use fitbit_extract::config::ExtractConfig;
use fitbit_extract::pipeline::{authorize_with_code, local_token_store};
use tracing::info;

/// Print the URL to open and the verifier to keep for `exchange`
pub async fn authorize(config: &ExtractConfig, scope: &str, client_id: Option<String>) -> Result<()> {
    let client_id = match client_id {
        Some(client_id) => client_id,
        None => local_token_store(config).load_credentials().await?.client_id,
    };
    let verifier = generate_code_verifier();
    let url = authorization_url(&config.authorization_url, &client_id, scope, &verifier)?;

    println!("Open this URL and approve access:\n{url}\n");
    println!("Code verifier (pass to `exchange --verifier`):\n{verifier}");
    Ok(())
}

/// Exchange the code and save the token
pub async fn exchange(
    config: &ExtractConfig,
    code: Option<String>,
    callback_url: Option<String>,
    verifier: &str,
) -> Result<()> {
    let code = match (code, callback_url) {
        (Some(code), _) => code,
        (None, Some(url)) => parse_callback_code(&url)?,
        (None, None) => return Err(anyhow!("Provide --code or --callback-url")),
    };
    let token = authorize_with_code(config, &code, verifier).await?;
    info!(user.id = %token.owner_id(), path = %config.token_path.display(), "Token stored");
    println!("Token stored for user {}", token.owner_id());
    Ok(())
}
