// ABOUTME: Message channel seam and the follow-up scheduler used after each transform
// ABOUTME: Local logging messenger and an in-process tokio channel messenger
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use fitbit_core::{ExtractError, ExtractResult};
use tokio::sync::mpsc;
use tracing::info;

use super::message::{prepare_message, EndpointBatch, FollowUpMessage};
use crate::endpoints::EndpointSpec;
use crate::logging::PipelineLogger;

/// Publishes follow-up messages
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Publish one message and return its channel identifier
    async fn send(&self, message: &FollowUpMessage) -> ExtractResult<String>;
}

/// Logs messages instead of publishing them
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalMessenger;

#[async_trait]
impl Messenger for LocalMessenger {
    async fn send(&self, message: &FollowUpMessage) -> ExtractResult<String> {
        let body = serde_json::to_string(message)?;
        info!(message.user_id = %message.user_id, message.body = %body, "Sending message");
        Ok("success".to_owned())
    }
}

/// Publishes onto a tokio channel, for in-process extraction workers
#[derive(Debug)]
pub struct ChannelMessenger {
    sender: mpsc::Sender<FollowUpMessage>,
    sent: AtomicU64,
}

impl ChannelMessenger {
    /// Messenger and the receiving end of its channel
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<FollowUpMessage>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (
            Self {
                sender,
                sent: AtomicU64::new(0),
            },
            receiver,
        )
    }
}

#[async_trait]
impl Messenger for ChannelMessenger {
    async fn send(&self, message: &FollowUpMessage) -> ExtractResult<String> {
        self.sender
            .send(message.clone())
            .await
            .map_err(|_| ExtractError::transport("follow-up channel is closed"))?;
        let id = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(id.to_string())
    }
}

/// Publish discovered follow-up endpoints as one message
///
/// Returns `None` without publishing when nothing was discovered.
///
/// # Errors
///
/// Propagates messenger failures
pub async fn schedule_follow_ups(
    messenger: &dyn Messenger,
    follow_ups: Vec<EndpointSpec>,
    user_id: &str,
    date: &str,
) -> ExtractResult<Option<String>> {
    let count = follow_ups.len();
    let Some(message) = prepare_message(EndpointBatch::Specs(follow_ups), user_id, date) else {
        return Ok(None);
    };
    let id = messenger.send(&message).await?;
    PipelineLogger::log_follow_ups(user_id, date, count);
    Ok(Some(id))
}
