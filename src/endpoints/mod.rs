// ABOUTME: Endpoint catalog, call specifications, and the per-run registry
// ABOUTME: Maps logical endpoint names to vendor URLs and stored-file instance names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Endpoints
//!
//! - **catalog**: the closed set of supported endpoints and their URL builders
//! - **spec**: the serializable description of one endpoint call
//! - **registry**: the ordered set of calls for one extraction run

/// Supported endpoints and URL builders
pub mod catalog;
/// Endpoint registry for one run
pub mod registry;
/// Endpoint call specification
pub mod spec;

pub use catalog::{BuiltRequest, EndpointKind, HEART_RATE_PERIODS};
pub use registry::{EndpointRegistry, RegisteredEndpoint};
pub use spec::{default_endpoints, EndpointSpec, HttpMethod};
