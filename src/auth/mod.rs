// ABOUTME: OAuth token lifecycle for vendor API access
// ABOUTME: Token value, token store seam, token endpoint client, and PKCE helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Token endpoint client (refresh and code exchange)
pub mod oauth;
/// PKCE helpers for local authorization
pub mod pkce;
/// Token store trait and local file implementation
pub mod store;
/// Token and credential values
pub mod token;

pub use store::{LocalTokenStore, TokenStore};
pub use token::{AppCredentials, Token, TokenRecord};
