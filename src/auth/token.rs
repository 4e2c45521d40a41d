// ABOUTME: Immutable OAuth token value and app credentials
// ABOUTME: Refresh produces a new token; persisted records never carry trusted validity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use fitbit_core::{ExtractError, ExtractResult};
use serde::{Deserialize, Serialize};

/// OAuth token held by the caller for one run
///
/// Fields are read-only. A refresh yields a replacement value; nothing
/// mutates a token in place.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    refresh_token: String,
    access_token: String,
    scope: String,
    owner_id: String,
    is_valid: bool,
}

impl Token {
    /// Build a token that still has to be validated by a refresh
    #[must_use]
    pub fn new(
        refresh_token: impl Into<String>,
        access_token: impl Into<String>,
        scope: impl Into<String>,
        owner_id: impl Into<String>,
    ) -> Self {
        Self {
            refresh_token: refresh_token.into(),
            access_token: access_token.into(),
            scope: scope.into(),
            owner_id: owner_id.into(),
            is_valid: false,
        }
    }

    /// Same token, marked as freshly issued by the token endpoint
    #[must_use]
    pub fn into_valid(self) -> Self {
        Self {
            is_valid: true,
            ..self
        }
    }

    /// Refresh token used to obtain the next access token
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Bearer access token
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Space separated granted scopes
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Vendor user id the token belongs to
    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Whether this process has validated the access token
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// `Authorization` header value
    ///
    /// # Errors
    ///
    /// Returns `InvalidToken` if the token has not been validated in this process
    pub fn authorization_header(&self) -> ExtractResult<String> {
        if self.is_valid {
            Ok(format!("Bearer {}", self.access_token))
        } else {
            Err(ExtractError::InvalidToken)
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("refresh_token", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("owner_id", &self.owner_id)
            .field("is_valid", &self.is_valid)
            .finish()
    }
}

/// Persisted token shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenRecord {
    /// Refresh token
    pub refresh_token: String,
    /// Access token
    pub access_token: String,
    /// Granted scopes
    pub scope: String,
    /// Vendor user id
    pub user_id: String,
    /// Validity at save time; informational only
    #[serde(default)]
    pub access_token_valid: bool,
}

impl From<&Token> for TokenRecord {
    fn from(token: &Token) -> Self {
        Self {
            refresh_token: token.refresh_token.clone(),
            access_token: token.access_token.clone(),
            scope: token.scope.clone(),
            user_id: token.owner_id.clone(),
            access_token_valid: token.is_valid,
        }
    }
}

impl From<TokenRecord> for Token {
    /// Stored validity is never trusted across process boundaries
    fn from(record: TokenRecord) -> Self {
        Self::new(
            record.refresh_token,
            record.access_token,
            record.scope,
            record.user_id,
        )
    }
}

/// Registered application credentials
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppCredentials {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
}

impl AppCredentials {
    /// Reject blank client id or secret
    ///
    /// # Errors
    ///
    /// Returns a `Config` error naming the blank field
    pub fn validate(&self) -> ExtractResult<()> {
        if self.client_id.trim().is_empty() {
            return Err(ExtractError::config("Client id must be filled in"));
        }
        if self.client_secret.trim().is_empty() {
            return Err(ExtractError::config("Client secret must be filled in"));
        }
        Ok(())
    }
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_requires_validated_token() {
        let token = Token::new("r", "a", "activity", "ABC123");
        assert!(matches!(
            token.authorization_header(),
            Err(ExtractError::InvalidToken)
        ));

        let token = token.into_valid();
        assert_eq!(token.authorization_header().ok().as_deref(), Some("Bearer a"));
    }

    #[test]
    fn test_record_round_trip_drops_validity() {
        let token = Token::new("r", "a", "sleep", "ABC123").into_valid();
        let record = TokenRecord::from(&token);
        assert!(record.access_token_valid);

        let restored = Token::from(record);
        assert!(!restored.is_valid());
        assert_eq!(restored.owner_id(), "ABC123");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = AppCredentials {
            client_id: "id".into(),
            client_secret: "very-secret".into(),
        };
        assert!(!format!("{creds:?}").contains("very-secret"));
    }
}
