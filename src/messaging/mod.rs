// ABOUTME: Message channel formats and publishers linking transform back to extraction
// ABOUTME: Follow-up scheduling after transforms and run-request decoding before extraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Message formats and run-request decoding
pub mod message;
/// Messenger trait, implementations, and the follow-up scheduler
pub mod messenger;

pub use message::{
    prepare_message, resolve_run_date, EndpointBatch, FollowUpMessage, RunRequest,
    ALL_ENDPOINTS_SENTINEL, CURRENT_DATE_KEYWORD,
};
pub use messenger::{schedule_follow_ups, ChannelMessenger, LocalMessenger, Messenger};
