// ABOUTME: Shared fakes for integration tests
// ABOUTME: Scripted requester, in-memory token store, sink, loader, and messenger that record calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use fitbit_extract::auth::{Token, TokenStore};
use fitbit_extract::endpoints::HttpMethod;
use fitbit_extract::messaging::{FollowUpMessage, Messenger};
use fitbit_extract::requester::{ApiResponse, Requester};
use fitbit_extract::storage::{DataLoader, Payload, ResponseSink, Row};
use fitbit_extract::{ExtractError, ExtractResult};
use serde_json::{Map, Value};

pub const TEST_USER: &str = "TESTUSER";

/// Token as loaded from storage: never valid
pub fn stored_token() -> Token {
    Token::new("refresh-0", "access-0", "activity heartrate", TEST_USER)
}

/// Token that has already been refreshed
pub fn valid_token() -> Token {
    stored_token().into_valid()
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Map<String, Value>,
}

/// Replays statuses in order; 500 once the script runs out
#[derive(Default)]
pub struct ScriptedRequester {
    script: Mutex<VecDeque<(u16, String)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedRequester {
    pub fn new(script: &[(u16, &str)]) -> Self {
        Self {
            script: Mutex::new(
                script
                    .iter()
                    .map(|(status, body)| (*status, (*body).to_owned()))
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Requester for ScriptedRequester {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: &Map<String, Value>,
    ) -> ExtractResult<ApiResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_owned(),
            headers: headers.clone(),
            body: body.clone(),
        });
        let (status, body) = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((500, String::new()));
        Ok(ApiResponse::new(body, status))
    }
}

/// Refresh hands out `access-{n}` tokens and counts calls
#[derive(Default)]
pub struct FakeTokenStore {
    refreshes: Mutex<u32>,
    saved: Mutex<Vec<String>>,
    fail_refresh: bool,
}

impl FakeTokenStore {
    pub fn failing() -> Self {
        Self {
            fail_refresh: true,
            ..Self::default()
        }
    }

    pub fn refresh_count(&self) -> u32 {
        *self.refreshes.lock().unwrap()
    }

    /// Access tokens saved, in order
    pub fn saved(&self) -> Vec<String> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenStore for FakeTokenStore {
    async fn load(&self) -> ExtractResult<Token> {
        Ok(stored_token())
    }

    async fn save(&self, token: &Token) -> ExtractResult<()> {
        self.saved
            .lock()
            .unwrap()
            .push(token.access_token().to_owned());
        Ok(())
    }

    async fn refresh(&self, token: &Token) -> ExtractResult<Token> {
        if self.fail_refresh {
            return Err(ExtractError::token_request("refresh rejected"));
        }
        let mut count = self.refreshes.lock().unwrap();
        *count += 1;
        Ok(Token::new(
            format!("refresh-{count}"),
            format!("access-{count}"),
            token.scope(),
            token.owner_id(),
        )
        .into_valid())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedResponse {
    pub body: String,
    pub folder: String,
    pub name: String,
    pub format: String,
}

#[derive(Default)]
pub struct RecordingSink {
    saved: Mutex<Vec<SavedResponse>>,
}

impl RecordingSink {
    pub fn saved(&self) -> Vec<SavedResponse> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResponseSink for RecordingSink {
    async fn save(&self, body: &str, folder: &str, name: &str, format: &str) -> ExtractResult<()> {
        self.saved.lock().unwrap().push(SavedResponse {
            body: body.to_owned(),
            folder: folder.to_owned(),
            name: name.to_owned(),
            format: format.to_owned(),
        });
        Ok(())
    }
}

/// Serves payloads by path and records every load call, empty ones included
#[derive(Default)]
pub struct RecordingLoader {
    payloads: Mutex<HashMap<String, Payload>>,
    loads: Mutex<Vec<(String, Vec<Row>)>>,
    extracts: Mutex<u32>,
}

impl RecordingLoader {
    pub fn with_payload(path: &str, payload: Payload) -> Self {
        let loader = Self::default();
        loader
            .payloads
            .lock()
            .unwrap()
            .insert(path.to_owned(), payload);
        loader
    }

    pub fn with_json(path: &str, json: Value) -> Self {
        Self::with_payload(path, Payload::Json(json))
    }

    pub fn loads(&self) -> Vec<(String, Vec<Row>)> {
        self.loads.lock().unwrap().clone()
    }

    /// Rows loaded into one table across every call
    pub fn rows_for(&self, table: &str) -> Vec<Row> {
        self.loads()
            .into_iter()
            .filter(|(name, _)| name == table)
            .flat_map(|(_, rows)| rows)
            .collect()
    }

    pub fn extract_count(&self) -> u32 {
        *self.extracts.lock().unwrap()
    }
}

#[async_trait]
impl DataLoader for RecordingLoader {
    async fn extract(&self, path: &str) -> ExtractResult<Payload> {
        *self.extracts.lock().unwrap() += 1;
        self.payloads
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ExtractError::storage(format!("no payload at {path}")))
    }

    async fn load(&self, rows: &[Row], table: &str) -> ExtractResult<()> {
        self.loads
            .lock()
            .unwrap()
            .push((table.to_owned(), rows.to_vec()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<FollowUpMessage>>,
}

impl RecordingMessenger {
    pub fn sent(&self) -> Vec<FollowUpMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, message: &FollowUpMessage) -> ExtractResult<String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(message.clone());
        Ok(format!("message-{}", sent.len()))
    }
}

/// Unwrap a JSON object literal
pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}
