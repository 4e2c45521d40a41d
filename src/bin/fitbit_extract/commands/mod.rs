// ABOUTME: Command modules for fitbit-extract
// ABOUTME: Extraction, transform, schema, and authorization commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod authorize;
pub mod extract;
pub mod schema;
pub mod transform;
