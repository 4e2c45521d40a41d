// ABOUTME: Error taxonomy for extraction and transform with stable error codes
// ABOUTME: Registration, precondition, authorization, retry, and transform failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error Handling
//!
//! Every failure surfaced by the pipeline is an [`ExtractError`]. Variants are
//! grouped the same way the operator sees them:
//!
//! - registration and URL building (caller-correctable, never retried)
//! - run preconditions (fatal before any request is sent)
//! - authorization and retry exhaustion (fatal for the whole run)
//! - transform-time failures (fatal for one stored file only)
//!
//! Lower layers never swallow errors; the invoking process decides how to
//! report them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error codes used in logs and operator alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication & Authorization (1000-1999)
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied = 1004,

    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3003,

    // Resource Management (4000-4999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,

    // External Services (5000-5999)
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    #[serde(rename = "EXTERNAL_RETRIES_EXHAUSTED")]
    ExternalRetriesExhausted = 5004,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Transform (7000-7999)
    #[serde(rename = "MALFORMED_PAYLOAD")]
    MalformedPayload = 7000,
    #[serde(rename = "UNSUPPORTED_FORMAT")]
    UnsupportedFormat = 7001,

    // Internal Errors (9000-9999)
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9002,
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Short description used as the log message prefix
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthInvalid => "The access token could not be used or refreshed",
            Self::PermissionDenied => "The token is not authorized for this request",
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing",
            Self::InvalidFormat => "The data format is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ExternalServiceError => "The vendor API request failed",
            Self::ExternalRetriesExhausted => "The vendor API kept failing after all retries",
            Self::ConfigError => "Configuration error encountered",
            Self::MalformedPayload => "The stored payload does not have the expected shape",
            Self::UnsupportedFormat => "The stored file format is not supported",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Unified error type for extraction and transform
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// Endpoint name is not part of the supported catalog
    #[error("{name} not in available endpoint list")]
    UnknownEndpoint {
        /// Name that failed catalog lookup
        name: String,
    },

    /// An endpoint parameter has an unsupported value or name
    #[error("invalid parameter '{parameter}' for {endpoint}: {reason}")]
    InvalidParameter {
        /// Endpoint being built
        endpoint: String,
        /// Offending parameter
        parameter: String,
        /// Why it was rejected
        reason: String,
    },

    /// A parameter the endpoint cannot be built without is absent
    #[error("{parameter} was not provided as a parameter for {endpoint}")]
    MissingParameter {
        /// Endpoint being built
        endpoint: String,
        /// Missing parameter
        parameter: String,
    },

    /// Dispatch was attempted with an empty registered set
    #[error("No endpoints have been registered")]
    NoEndpointsRegistered,

    /// Retry count below zero
    #[error("Retries cannot be less than 0 (got {retries})")]
    InvalidRetryCount {
        /// Rejected retry count
        retries: i32,
    },

    /// Vendor answered 403; the token scope cannot serve this endpoint
    #[error("Request is forbidden please check user scope ({endpoint})")]
    Forbidden {
        /// Endpoint that was refused
        endpoint: String,
    },

    /// Every attempt for an endpoint failed
    #[error("Request failed after {retries} retries ({endpoint}, last status {last_status})")]
    RetryExhausted {
        /// Endpoint that kept failing
        endpoint: String,
        /// Configured retry count
        retries: u32,
        /// HTTP status of the final attempt
        last_status: u16,
    },

    /// Payload is missing a key its handler requires
    #[error("{endpoint} payload is malformed: {reason}")]
    MalformedPayload {
        /// Endpoint whose payload is being transformed
        endpoint: String,
        /// What was missing or wrong
        reason: String,
    },

    /// Per-instance endpoint transformed without an instance id
    #[error("Instance id is required for {endpoint} but was not found in the stored file name")]
    MissingInstanceId {
        /// Endpoint that needs an instance id
        endpoint: String,
    },

    /// Stored file extension is not understood by the loader
    #[error("file type {extension} is not supported")]
    UnsupportedFormat {
        /// Offending extension (may be empty)
        extension: String,
    },

    /// Stored path does not follow the naming convention
    #[error("Could not parse '{path}': {reason}")]
    PathParse {
        /// Path being parsed
        path: String,
        /// What the expected shape is
        reason: String,
    },

    /// Endpoint exists in the catalog but has no transform handler
    #[error("{endpoint} is not in the available endpoint parsers")]
    NoTransformHandler {
        /// Endpoint without a handler
        endpoint: String,
    },

    /// Token cannot be used to authorize a request
    #[error("Access token is invalid")]
    InvalidToken,

    /// Token refresh or authorization code exchange failed
    #[error("token request failed: {message}")]
    TokenRequest {
        /// Failure detail
        message: String,
    },

    /// HTTP transport failure (connection, timeout, body read)
    #[error("transport error: {message}")]
    Transport {
        /// Failure detail
        message: String,
    },

    /// Local or remote storage failure
    #[error("storage error: {message}")]
    Storage {
        /// Failure detail
        message: String,
    },

    /// JSON (de)serialization failure
    #[error("serialization error: {message}")]
    Serialization {
        /// Failure detail
        message: String,
    },

    /// XML parse failure
    #[error("xml error: {message}")]
    Xml {
        /// Failure detail
        message: String,
    },

    /// Configuration missing or invalid
    #[error("configuration error: {message}")]
    Config {
        /// Failure detail
        message: String,
    },

    /// Incoming run request could not be decoded
    #[error("invalid run request: {message}")]
    InvalidMessage {
        /// Failure detail
        message: String,
    },
}

/// Result type alias for convenience
pub type ExtractResult<T> = Result<T, ExtractError>;

impl ExtractError {
    /// Stable code for this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownEndpoint { .. } | Self::NoTransformHandler { .. } => {
                ErrorCode::ResourceNotFound
            }
            Self::InvalidParameter { .. } | Self::InvalidMessage { .. } => ErrorCode::InvalidInput,
            Self::MissingParameter { .. } | Self::MissingInstanceId { .. } => {
                ErrorCode::MissingRequiredField
            }
            Self::NoEndpointsRegistered | Self::InvalidRetryCount { .. } => {
                ErrorCode::ValueOutOfRange
            }
            Self::Forbidden { .. } => ErrorCode::PermissionDenied,
            Self::RetryExhausted { .. } => ErrorCode::ExternalRetriesExhausted,
            Self::MalformedPayload { .. } | Self::Xml { .. } => ErrorCode::MalformedPayload,
            Self::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            Self::PathParse { .. } => ErrorCode::InvalidFormat,
            Self::InvalidToken | Self::TokenRequest { .. } => ErrorCode::AuthInvalid,
            Self::Transport { .. } => ErrorCode::ExternalServiceError,
            Self::Storage { .. } => ErrorCode::StorageError,
            Self::Serialization { .. } => ErrorCode::SerializationError,
            Self::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Whether re-running the same unit of work unchanged could succeed
    ///
    /// Only infrastructure failures qualify; every taxonomy error is fatal.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Storage { .. })
    }

    /// Unknown catalog name
    #[must_use]
    pub fn unknown_endpoint(name: impl Into<String>) -> Self {
        Self::UnknownEndpoint { name: name.into() }
    }

    /// Rejected endpoint parameter
    #[must_use]
    pub fn invalid_parameter(
        endpoint: impl Into<String>,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            endpoint: endpoint.into(),
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Required endpoint parameter absent
    #[must_use]
    pub fn missing_parameter(endpoint: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::MissingParameter {
            endpoint: endpoint.into(),
            parameter: parameter.into(),
        }
    }

    /// Payload missing a required top-level key
    #[must_use]
    pub fn missing_key(endpoint: impl Into<String>, key: &str) -> Self {
        Self::MalformedPayload {
            endpoint: endpoint.into(),
            reason: format!("expected '{key}' to be in the payload"),
        }
    }

    /// Payload shape is wrong in some other way
    #[must_use]
    pub fn malformed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Storage failure
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Transport failure
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Configuration failure
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// XML failure
    #[must_use]
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml {
            message: message.into(),
        }
    }

    /// Token endpoint failure
    #[must_use]
    pub fn token_request(message: impl Into<String>) -> Self {
        Self::TokenRequest {
            message: message.into(),
        }
    }

    /// Run request decoding failure
    #[must_use]
    pub fn invalid_message(message: impl Into<String>) -> Self {
        Self::InvalidMessage {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: error.to_string(),
        }
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(error: std::io::Error) -> Self {
        Self::Storage {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_codes() {
        assert_eq!(
            ExtractError::unknown_endpoint("x").code(),
            ErrorCode::ResourceNotFound
        );
        assert_eq!(
            ExtractError::Forbidden {
                endpoint: "e".into()
            }
            .code(),
            ErrorCode::PermissionDenied
        );
        assert_eq!(
            ExtractError::NoEndpointsRegistered.code(),
            ErrorCode::ValueOutOfRange
        );
    }

    #[test]
    fn test_retry_exhausted_message_names_retry_count() {
        let error = ExtractError::RetryExhausted {
            endpoint: "get_heart_rate_by_date".into(),
            retries: 6,
            last_status: 502,
        };
        assert!(error.to_string().contains("Request failed after 6 retries"));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_fatal_classes_are_not_retryable() {
        assert!(!ExtractError::Forbidden {
            endpoint: "e".into()
        }
        .is_retryable());
        assert!(!ExtractError::missing_key("get_sleep_by_date", "sleep").is_retryable());
    }
}
