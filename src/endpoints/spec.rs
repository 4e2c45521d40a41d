// ABOUTME: Endpoint call specification as registered, scheduled, and published
// ABOUTME: Serializes as {name, method, response_format, url_kwargs, body, headers} with defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use std::fmt;

use fitbit_core::constants::defaults;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::catalog::EndpointKind;

/// HTTP method of an endpoint call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Upper-case method name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_response_format() -> String {
    defaults::RESPONSE_FORMAT.to_owned()
}

/// One logical endpoint call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSpec {
    /// Catalog name
    pub name: String,
    /// HTTP method
    #[serde(default)]
    pub method: HttpMethod,
    /// Extension of the stored response
    #[serde(default = "default_response_format")]
    pub response_format: String,
    /// URL builder parameters, in insertion order
    #[serde(default, rename = "url_kwargs")]
    pub url_parameters: Map<String, Value>,
    /// JSON request body
    #[serde(default)]
    pub body: Map<String, Value>,
    /// Extra request headers; these win over the authorization header
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl EndpointSpec {
    /// GET spec with a JSON response and no parameters
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: HttpMethod::default(),
            response_format: default_response_format(),
            url_parameters: Map::new(),
            body: Map::new(),
            headers: BTreeMap::new(),
        }
    }

    /// Spec for a catalog entry
    #[must_use]
    pub fn for_kind(kind: EndpointKind) -> Self {
        Self::new(kind.name())
    }

    /// Set the HTTP method
    #[must_use]
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the stored response extension
    #[must_use]
    pub fn with_response_format(mut self, format: impl Into<String>) -> Self {
        self.response_format = format.into();
        self
    }

    /// Add a URL builder parameter
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.url_parameters.insert(key.into(), value.into());
        self
    }

    /// Add a request header
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a body field
    #[must_use]
    pub fn with_body_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }
}

/// Endpoints registered when a run asks for `["all"]`
#[must_use]
pub fn default_endpoints() -> Vec<EndpointSpec> {
    [
        EndpointKind::HeartRate,
        EndpointKind::BodyWeight,
        EndpointKind::ActivitySummary,
        EndpointKind::CardioScore,
        EndpointKind::Sleep,
    ]
    .into_iter()
    .map(EndpointSpec::for_kind)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_omitted_fields_take_defaults() {
        let spec: EndpointSpec =
            serde_json::from_value(json!({"name": "get_sleep_by_date"})).unwrap_or_else(|e| {
                unreachable!("minimal spec should parse: {e}")
            });
        assert_eq!(spec, EndpointSpec::new("get_sleep_by_date"));
        assert_eq!(spec.response_format, "json");
        assert_eq!(spec.method, HttpMethod::Get);
    }

    #[test]
    fn test_wire_shape_uses_url_kwargs() {
        let spec = EndpointSpec::for_kind(EndpointKind::ActivityTcx)
            .with_response_format("tcx")
            .with_parameter("log_id", 42);
        let wire = serde_json::to_value(&spec).unwrap_or_default();
        assert_eq!(
            wire,
            json!({
                "name": "get_activity_tcx_by_id",
                "method": "GET",
                "response_format": "tcx",
                "url_kwargs": {"log_id": 42},
                "body": {},
                "headers": {}
            })
        );
    }
}
