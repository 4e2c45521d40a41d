// ABOUTME: Ordered set of endpoint specs registered for one extraction run
// ABOUTME: Rejects unknown names; batch registration is all-or-nothing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use fitbit_core::ExtractResult;

use super::catalog::EndpointKind;
use super::spec::EndpointSpec;

/// Spec paired with its resolved catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredEndpoint {
    kind: EndpointKind,
    spec: EndpointSpec,
}

impl RegisteredEndpoint {
    /// Resolved catalog entry
    #[must_use]
    pub const fn kind(&self) -> EndpointKind {
        self.kind
    }

    /// Registered spec
    #[must_use]
    pub const fn spec(&self) -> &EndpointSpec {
        &self.spec
    }
}

/// Registered endpoints in dispatch order
///
/// Registering the same name twice keeps both entries; the endpoint is then
/// fetched twice in one run.
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    entries: Vec<RegisteredEndpoint>,
}

impl EndpointRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one spec
    ///
    /// # Errors
    ///
    /// Returns `UnknownEndpoint` if the spec's name is not in the catalog
    pub fn register(&mut self, spec: EndpointSpec) -> ExtractResult<()> {
        let kind = EndpointKind::from_name(&spec.name)?;
        self.entries.push(RegisteredEndpoint { kind, spec });
        Ok(())
    }

    /// Append several specs in order
    ///
    /// Every name is resolved before anything is appended, so a failure
    /// leaves the registry untouched.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEndpoint` for the first unknown name
    pub fn register_many<I>(&mut self, specs: I) -> ExtractResult<()>
    where
        I: IntoIterator<Item = EndpointSpec>,
    {
        let resolved = specs
            .into_iter()
            .map(|spec| EndpointKind::from_name(&spec.name).map(|kind| RegisteredEndpoint { kind, spec }))
            .collect::<ExtractResult<Vec<_>>>()?;
        self.entries.extend(resolved);
        Ok(())
    }

    /// Registered endpoints in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredEndpoint> {
        self.entries.iter()
    }

    /// Number of registered endpoints
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
