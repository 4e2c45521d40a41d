// ABOUTME: Core types and constants for the Fitbit extract and transform pipeline
// ABOUTME: Foundation crate with error handling, constants, and warehouse field metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Fitbit Core
//!
//! Foundation crate providing shared types for the extraction and transform
//! phases. It is designed to change infrequently so the rest of the workspace
//! benefits from incremental compilation.
//!
//! ## Modules
//!
//! - **errors**: `ExtractError` taxonomy and stable `ErrorCode`s
//! - **constants**: vendor URLs, date formats, scopes, and table names
//! - **metadata**: declarative field tables shared by the transform engine and
//!   the warehouse schema tooling

/// Error taxonomy with stable error codes
pub mod errors;

/// Vendor URLs, formats, scopes, and table names
pub mod constants;

/// Field metadata tables (source path to warehouse column)
pub mod metadata;

pub use errors::{ErrorCode, ExtractError, ExtractResult};
pub use metadata::{FieldMetadataTable, FieldSpec, WarehouseType};
