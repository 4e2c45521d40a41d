// ABOUTME: Storage seams between extraction, transform, and the warehouse
// ABOUTME: Raw response sink plus the data loader that reads responses and loads rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Data loader trait and local NDJSON implementation
pub mod loader;
/// Response sink trait and local filesystem implementation
pub mod sink;

pub use loader::{extension_of, DataLoader, LocalDataLoader, Payload, Row};
pub use sink::{LocalResponseSink, ResponseSink};
