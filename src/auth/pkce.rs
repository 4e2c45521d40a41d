// ABOUTME: PKCE helpers for the one-off local authorization flow
// ABOUTME: Code verifier and challenge generation, authorization URL, and callback parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::OnceLock;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use fitbit_core::constants::oauth::{CODE_VERIFIER_MAX_LEN, CODE_VERIFIER_MIN_LEN, POSSIBLE_SCOPES};
use fitbit_core::{ExtractError, ExtractResult};
use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;
use sha2::{Digest, Sha256};
use url::Url;

/// Only challenge method the vendor accepts
pub const CODE_CHALLENGE_METHOD: &str = "S256";

/// Random alphanumeric verifier between 43 and 128 characters
#[must_use]
pub fn generate_code_verifier() -> String {
    let mut rng = rand::thread_rng();
    let length = rng.gen_range(CODE_VERIFIER_MIN_LEN..=CODE_VERIFIER_MAX_LEN);
    (0..length)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// S256 challenge: URL-safe base64 of the verifier's SHA-256, unpadded
#[must_use]
pub fn code_challenge(code_verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(code_verifier.as_bytes()))
}

/// URL the user opens to grant access
///
/// `scope` is a space separated list.
///
/// # Errors
///
/// Returns `InvalidParameter` when a scope is not one the vendor offers, or
/// `Config` when the authorization URL does not parse
pub fn authorization_url(
    authorization_base: &str,
    client_id: &str,
    scope: &str,
    code_verifier: &str,
) -> ExtractResult<String> {
    if let Some(unknown) = scope
        .split_whitespace()
        .find(|requested| !POSSIBLE_SCOPES.contains(requested))
    {
        return Err(ExtractError::invalid_parameter(
            "authorize",
            "scope",
            format!("{unknown} is not one of: {}", POSSIBLE_SCOPES.join(", ")),
        ));
    }

    let challenge = code_challenge(code_verifier);
    let url = Url::parse_with_params(
        authorization_base,
        &[
            ("client_id", client_id),
            ("scope", scope),
            ("code_challenge", challenge.as_str()),
            ("code_challenge_method", CODE_CHALLENGE_METHOD),
            ("response_type", "code"),
        ],
    )
    .map_err(|e| ExtractError::config(format!("Invalid authorization URL: {e}")))?;
    Ok(url.into())
}

fn callback_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)^.*=(.*?)#_=_").ok())
        .as_ref()
}

/// Authorization code from the redirect URL (`...?code=<code>#_=_`)
///
/// # Errors
///
/// Returns `InvalidParameter` if the URL does not carry a code
pub fn parse_callback_code(returned_url: &str) -> ExtractResult<String> {
    callback_pattern()
        .and_then(|pattern| pattern.captures(returned_url))
        .and_then(|captures| captures.get(1))
        .map(|code| code.as_str().to_owned())
        .ok_or_else(|| {
            ExtractError::invalid_parameter(
                "authorize",
                "callback_url",
                "Could not parse token from provided url",
            )
        })
}
