// ABOUTME: Closed catalog of supported vendor endpoints with per-kind URL builders
// ABOUTME: Name lookup, parameter validation, and stable instance names for stored files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use chrono::NaiveDate;
use fitbit_core::constants::formats::DATE_FORMAT;
use fitbit_core::{ExtractError, ExtractResult};
use serde_json::{Map, Value};

/// Heart rate periods the vendor accepts
pub const HEART_RATE_PERIODS: &[&str] = &["1d", "7d", "30d", "1w", "1m"];

/// Supported vendor endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    /// Daily heart rate with zones
    HeartRate,
    /// Logged body weight
    BodyWeight,
    /// Daily activity summary with logged activities and goals
    ActivitySummary,
    /// TCX export of one logged activity
    ActivityTcx,
    /// JSON detail of one logged activity
    ActivityDetails,
    /// Heart rate variability
    HeartRateVariability,
    /// Cardio fitness score
    CardioScore,
    /// Sleep sessions with stage detail
    Sleep,
}

/// URL and file instance name produced for one endpoint call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltRequest {
    /// Fully-qualified request URL
    pub url: String,
    /// Endpoint name, or `{identifier}_{endpoint}` for per-instance endpoints
    pub instance_name: String,
}

impl EndpointKind {
    /// Every supported endpoint
    pub const ALL: [Self; 8] = [
        Self::HeartRate,
        Self::BodyWeight,
        Self::ActivitySummary,
        Self::ActivityTcx,
        Self::ActivityDetails,
        Self::HeartRateVariability,
        Self::CardioScore,
        Self::Sleep,
    ];

    /// Catalog name used in registrations, messages, and stored paths
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HeartRate => "get_heart_rate_by_date",
            Self::BodyWeight => "get_body_weight_by_date",
            Self::ActivitySummary => "get_activity_summary_by_date",
            Self::ActivityTcx => "get_activity_tcx_by_id",
            Self::ActivityDetails => "get_activity_details_by_id",
            Self::HeartRateVariability => "get_heart_rate_variability_by_date",
            Self::CardioScore => "get_cardio_score_by_date",
            Self::Sleep => "get_sleep_by_date",
        }
    }

    /// Resolve a catalog name
    ///
    /// # Errors
    ///
    /// Returns `UnknownEndpoint` if the name is not in the catalog
    pub fn from_name(name: &str) -> ExtractResult<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ExtractError::unknown_endpoint(name))
    }

    /// Whether stored files carry a leading numeric identifier
    #[must_use]
    pub const fn is_per_instance(self) -> bool {
        matches!(self, Self::ActivityTcx | Self::ActivityDetails)
    }

    const fn accepted_parameters(self) -> &'static [&'static str] {
        match self {
            Self::HeartRate => &["period"],
            Self::ActivityTcx => &["log_id", "partialtcx"],
            Self::ActivityDetails => &["log_id"],
            Self::BodyWeight
            | Self::ActivitySummary
            | Self::HeartRateVariability
            | Self::CardioScore
            | Self::Sleep => &[],
        }
    }

    /// Build the request URL and instance name for one owner and date
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an unknown parameter name or an
    /// unsupported value, and `MissingParameter` when a required identifier
    /// is absent
    pub fn build(
        self,
        api_base: &str,
        owner_id: &str,
        date: NaiveDate,
        parameters: &Map<String, Value>,
    ) -> ExtractResult<BuiltRequest> {
        self.reject_unknown_parameters(parameters)?;

        let base = api_base.trim_end_matches('/');
        let owner = urlencoding::encode(owner_id);
        let day = date.format(DATE_FORMAT);
        let name = self.name();

        let (url, instance_name) = match self {
            Self::HeartRate => {
                let period = self.text_parameter(parameters, "period")?;
                let period = period.as_deref().unwrap_or("1d");
                if !HEART_RATE_PERIODS.contains(&period) {
                    return Err(ExtractError::invalid_parameter(
                        name,
                        "period",
                        format!(
                            "Period is not one of the supported values ({})",
                            HEART_RATE_PERIODS.join(", ")
                        ),
                    ));
                }
                (
                    format!("{base}/1/user/{owner}/activities/heart/date/{day}/{period}.json"),
                    name.to_owned(),
                )
            }
            Self::BodyWeight => (
                format!("{base}/1/user/{owner}/body/log/weight/date/{day}.json"),
                name.to_owned(),
            ),
            Self::ActivitySummary => (
                format!("{base}/1/user/{owner}/activities/date/{day}.json"),
                name.to_owned(),
            ),
            Self::ActivityTcx => {
                let log_id = self.required_parameter(parameters, "log_id")?;
                let partial = self.flag_parameter(parameters, "partialtcx", true)?;
                (
                    format!(
                        "{base}/1/user/{owner}/activities/{log_id}.tcx?includePartialTCX={partial}"
                    ),
                    format!("{log_id}_{name}"),
                )
            }
            Self::ActivityDetails => {
                let log_id = self.required_parameter(parameters, "log_id")?;
                (
                    format!("{base}/1/user/{owner}/activities/{log_id}.json"),
                    format!("{log_id}_{name}"),
                )
            }
            Self::HeartRateVariability => (
                format!("{base}/1/user/{owner}/hrv/date/{day}/all.json"),
                name.to_owned(),
            ),
            Self::CardioScore => (
                format!("{base}/1/user/{owner}/cardioscore/date/{day}.json"),
                name.to_owned(),
            ),
            Self::Sleep => (
                format!("{base}/1.2/user/{owner}/sleep/date/{day}.json"),
                name.to_owned(),
            ),
        };

        Ok(BuiltRequest { url, instance_name })
    }

    fn reject_unknown_parameters(self, parameters: &Map<String, Value>) -> ExtractResult<()> {
        let accepted = self.accepted_parameters();
        match parameters.keys().find(|key| !accepted.contains(&key.as_str())) {
            Some(unknown) => Err(ExtractError::invalid_parameter(
                self.name(),
                unknown.as_str(),
                "not a recognised parameter for this endpoint",
            )),
            None => Ok(()),
        }
    }

    fn text_parameter(
        self,
        parameters: &Map<String, Value>,
        key: &str,
    ) -> ExtractResult<Option<String>> {
        match parameters.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(Value::Number(number)) => Ok(Some(number.to_string())),
            Some(other) => Err(ExtractError::invalid_parameter(
                self.name(),
                key,
                format!("expected a string or number, got {other}"),
            )),
        }
    }

    fn required_parameter(self, parameters: &Map<String, Value>, key: &str) -> ExtractResult<String> {
        self.text_parameter(parameters, key)?
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ExtractError::missing_parameter(self.name(), key))
    }

    fn flag_parameter(
        self,
        parameters: &Map<String, Value>,
        key: &str,
        default: bool,
    ) -> ExtractResult<bool> {
        match parameters.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(Value::String(text)) if text.eq_ignore_ascii_case("true") => Ok(true),
            Some(Value::String(text)) if text.eq_ignore_ascii_case("false") => Ok(false),
            Some(other) => Err(ExtractError::invalid_parameter(
                self.name(),
                key,
                format!("expected a boolean, got {other}"),
            )),
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_resolve_back_to_kinds() {
        for kind in EndpointKind::ALL {
            assert_eq!(EndpointKind::from_name(kind.name()).ok(), Some(kind));
        }
        assert!(matches!(
            EndpointKind::from_name("get_steps_by_date"),
            Err(ExtractError::UnknownEndpoint { .. })
        ));
    }

    #[test]
    fn test_only_log_keyed_endpoints_are_per_instance() {
        let per_instance: Vec<_> = EndpointKind::ALL
            .into_iter()
            .filter(|kind| kind.is_per_instance())
            .collect();
        assert_eq!(
            per_instance,
            vec![EndpointKind::ActivityTcx, EndpointKind::ActivityDetails]
        );
    }
}
