// ABOUTME: Follow-up and run-request message formats exchanged through the message channel
// ABOUTME: Endpoint batches with the ["all"] sentinel, base64 push payload decoding, and date resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Duration, NaiveDate};
use fitbit_core::constants::formats::DATE_FORMAT;
use fitbit_core::{ExtractError, ExtractResult};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::endpoints::{default_endpoints, EndpointSpec};

/// Sentinel entry meaning "register the default catalog"
pub const ALL_ENDPOINTS_SENTINEL: &str = "all";

/// Date keyword resolving to the day before the run
pub const CURRENT_DATE_KEYWORD: &str = "current";

/// Endpoints carried by a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointBatch {
    /// `["all"]`: the default catalog
    All,
    /// Explicit endpoint calls
    Specs(Vec<EndpointSpec>),
}

impl EndpointBatch {
    /// Endpoint calls to register, expanding the sentinel
    #[must_use]
    pub fn resolve(&self) -> Vec<EndpointSpec> {
        match self {
            Self::All => default_endpoints(),
            Self::Specs(specs) => specs.clone(),
        }
    }

    /// Whether the batch names no endpoints
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Specs(specs) if specs.is_empty())
    }
}

impl Serialize for EndpointBatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(ALL_ENDPOINTS_SENTINEL)?;
                seq.end()
            }
            Self::Specs(specs) => specs.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BatchEntry {
    Name(String),
    Spec(EndpointSpec),
}

impl<'de> Deserialize<'de> for EndpointBatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<BatchEntry>::deserialize(deserializer)?;
        let sentinel_count = entries
            .iter()
            .filter(|entry| matches!(entry, BatchEntry::Name(name) if name == ALL_ENDPOINTS_SENTINEL))
            .count();

        match (sentinel_count, entries.len()) {
            (0, _) => Ok(Self::Specs(
                entries
                    .into_iter()
                    .map(|entry| match entry {
                        BatchEntry::Name(name) => EndpointSpec::new(name),
                        BatchEntry::Spec(spec) => spec,
                    })
                    .collect(),
            )),
            (1, 1) => Ok(Self::All),
            _ => Err(de::Error::custom(
                "\"all\" must be the only entry when it is used",
            )),
        }
    }
}

/// Message published after a transform discovers follow-up endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpMessage {
    /// Owner the endpoints should be fetched for
    pub user_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Endpoints to fetch
    pub endpoints: EndpointBatch,
}

impl FollowUpMessage {
    /// UTF-8 JSON encoding published to the channel
    ///
    /// # Errors
    ///
    /// Returns a `Serialization` error if encoding fails
    pub fn to_bytes(&self) -> ExtractResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Endpoint calls to register, expanding `["all"]`
    #[must_use]
    pub fn resolve_endpoints(&self) -> Vec<EndpointSpec> {
        self.endpoints.resolve()
    }
}

/// Package a batch for publishing; `None` when there is nothing to send
#[must_use]
pub fn prepare_message(
    endpoints: EndpointBatch,
    user_id: &str,
    date: &str,
) -> Option<FollowUpMessage> {
    if endpoints.is_empty() {
        return None;
    }
    Some(FollowUpMessage {
        user_id: user_id.to_owned(),
        date: date.to_owned(),
        endpoints,
    })
}

/// Decoded request to run one extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Owner to extract for
    pub user_id: String,
    /// Resolved run date
    pub date: NaiveDate,
    /// Endpoints to register
    pub endpoints: EndpointBatch,
}

impl RunRequest {
    /// Decode a base64 payload holding a JSON run request
    ///
    /// `today` anchors the `"current"` keyword, which means the day before.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMessage` when the payload is not base64 UTF-8 JSON, a
    /// required key is missing, `endpoints` is not a list, or the date is
    /// neither `current` nor `YYYY-MM-DD`
    pub fn decode(encoded: &str, today: NaiveDate) -> ExtractResult<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ExtractError::invalid_message(format!("message is not base64: {e}")))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| ExtractError::invalid_message(format!("message is not UTF-8: {e}")))?;
        let value: Value = serde_json::from_str(&text).map_err(|e| {
            ExtractError::invalid_message(format!("Could not parse message {text} into an object: {e}"))
        })?;
        Self::from_value(&value, today)
    }

    /// Decode the `message.data` field of a push delivery envelope
    ///
    /// # Errors
    ///
    /// Returns `InvalidMessage` when the envelope has no string
    /// `message.data`, plus everything [`RunRequest::decode`] returns
    pub fn from_push_envelope(envelope: &Value, today: NaiveDate) -> ExtractResult<Self> {
        let data = envelope
            .get("message")
            .and_then(|message| message.get("data"))
            .and_then(Value::as_str)
            .ok_or_else(|| ExtractError::invalid_message("envelope has no message.data"))?;
        Self::decode(data, today)
    }

    /// Validate an already-parsed run request object
    ///
    /// # Errors
    ///
    /// See [`RunRequest::decode`]
    pub fn from_value(value: &Value, today: NaiveDate) -> ExtractResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ExtractError::invalid_message("message body must be a JSON object"))?;
        for key in ["date", "user_id", "endpoints"] {
            if !object.contains_key(key) {
                return Err(ExtractError::invalid_message(format!(
                    "{key} was not provided in message body"
                )));
            }
        }

        let endpoints = &object["endpoints"];
        if !endpoints.is_array() {
            return Err(ExtractError::invalid_message(
                "Endpoints should be passed as a list even for a single value",
            ));
        }
        let endpoints = EndpointBatch::deserialize(endpoints)
            .map_err(|e| ExtractError::invalid_message(format!("invalid endpoints: {e}")))?;

        let user_id = object["user_id"]
            .as_str()
            .ok_or_else(|| ExtractError::invalid_message("user_id must be a string"))?
            .to_owned();
        let date = object["date"]
            .as_str()
            .ok_or_else(|| ExtractError::invalid_message("date must be a string"))?;

        Ok(Self {
            user_id,
            date: resolve_run_date(date, today)?,
            endpoints,
        })
    }
}

/// `current` means the day before `today`; anything else must be `YYYY-MM-DD`
///
/// # Errors
///
/// Returns `InvalidMessage` for an unparsable date
pub fn resolve_run_date(raw: &str, today: NaiveDate) -> ExtractResult<NaiveDate> {
    if raw == CURRENT_DATE_KEYWORD {
        return today
            .checked_sub_signed(Duration::days(1))
            .ok_or_else(|| ExtractError::invalid_message("date is out of range"));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| ExtractError::invalid_message(format!("date '{raw}' is not YYYY-MM-DD: {e}")))
}
