// ABOUTME: Per-endpoint transform handlers turning stored payloads into warehouse row sets
// ABOUTME: Validates required top-level keys, maps sub-objects, and collects follow-up endpoint calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use fitbit_core::constants::{columns, tables};
use fitbit_core::metadata::{
    ACTIVITY, CARDIOSCORE, GOALS, HEART_RATE, SLEEP, SLEEP_DETAIL, SUMMARY, WEIGHT,
};
use fitbit_core::{ExtractError, ExtractResult};
use serde_json::{Map, Value};

use super::context::ProcessingContext;
use super::mapper::{map_record, MappingOptions};
use super::tcx::transform_tcx;
use crate::endpoints::{EndpointKind, EndpointSpec};
use crate::storage::{Payload, Row};

const ACTIVITY_TIME_FIELDS: &[&str] = &["startTime"];
const ACTIVITY_DATETIME_FIELDS: &[&str] = &["lastModified"];
const SLEEP_DETAIL_DATETIME_FIELDS: &[&str] = &["dateTime"];

/// Rows bound for one warehouse table
#[derive(Debug, Clone, PartialEq)]
pub struct TableRows {
    /// Warehouse table name
    pub table: &'static str,
    /// Mapped rows, possibly empty
    pub rows: Vec<Row>,
}

impl TableRows {
    fn new(table: &'static str, rows: Vec<Row>) -> Self {
        Self { table, rows }
    }
}

/// Everything one handler produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformOutput {
    /// Row sets in load order
    pub tables: Vec<TableRows>,
    /// Endpoint calls discovered while handling the payload
    pub follow_ups: Vec<EndpointSpec>,
}

impl TransformOutput {
    /// Total rows across every table
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(|table| table.rows.len()).sum()
    }
}

/// Whether `endpoint` has a transform handler
#[must_use]
pub const fn has_handler(endpoint: EndpointKind) -> bool {
    !matches!(
        endpoint,
        EndpointKind::ActivityDetails | EndpointKind::HeartRateVariability
    )
}

/// Dispatch a payload to its endpoint handler
///
/// # Errors
///
/// - `NoTransformHandler` for endpoints that are extracted but not transformed
/// - `MalformedPayload` when the payload kind or a required key is wrong
/// - `MissingInstanceId` and `Xml` from the TCX walker
pub fn transform(context: &ProcessingContext, payload: &Payload) -> ExtractResult<TransformOutput> {
    let endpoint = context.endpoint;
    match endpoint {
        EndpointKind::ActivityTcx => {
            let Payload::Xml(xml) = payload else {
                return Err(ExtractError::malformed(endpoint.name(), "expected an XML document"));
            };
            let rows = transform_tcx(context, xml)?;
            Ok(TransformOutput {
                tables: vec![TableRows::new(tables::ACTIVITY_DETAIL, rows)],
                follow_ups: Vec::new(),
            })
        }
        EndpointKind::HeartRate => transform_heart_rate(context, json_object(endpoint, payload)?),
        EndpointKind::BodyWeight => transform_body_weight(context, json_object(endpoint, payload)?),
        EndpointKind::ActivitySummary => transform_summary(context, json_object(endpoint, payload)?),
        EndpointKind::Sleep => transform_sleep(context, json_object(endpoint, payload)?),
        EndpointKind::CardioScore => transform_cardio_score(context, json_object(endpoint, payload)?),
        EndpointKind::ActivityDetails | EndpointKind::HeartRateVariability => {
            Err(ExtractError::NoTransformHandler {
                endpoint: endpoint.name().to_owned(),
            })
        }
    }
}

fn json_object(endpoint: EndpointKind, payload: &Payload) -> ExtractResult<&Map<String, Value>> {
    match payload {
        Payload::Json(Value::Object(object)) => Ok(object),
        Payload::Json(_) => Err(ExtractError::malformed(
            endpoint.name(),
            "expected a JSON object at the top level",
        )),
        Payload::Xml(_) => Err(ExtractError::malformed(endpoint.name(), "expected a JSON document")),
    }
}

fn required<'a>(
    endpoint: EndpointKind,
    object: &'a Map<String, Value>,
    key: &str,
) -> ExtractResult<&'a Value> {
    object
        .get(key)
        .ok_or_else(|| ExtractError::missing_key(endpoint.name(), key))
}

fn required_array<'a>(
    endpoint: EndpointKind,
    object: &'a Map<String, Value>,
    key: &str,
) -> ExtractResult<&'a [Value]> {
    required(endpoint, object, key)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ExtractError::malformed(endpoint.name(), format!("expected '{key}' to be a list")))
}

fn record(endpoint: EndpointKind, value: &Value, key: &str) -> ExtractResult<Map<String, Value>> {
    value.as_object().cloned().ok_or_else(|| {
        ExtractError::malformed(
            endpoint.name(),
            format!("expected '{key}' to contain objects"),
        )
    })
}

fn records(endpoint: EndpointKind, values: &[Value], key: &str) -> ExtractResult<Vec<Map<String, Value>>> {
    values.iter().map(|value| record(endpoint, value, key)).collect()
}

fn transform_summary(
    context: &ProcessingContext,
    payload: &Map<String, Value>,
) -> ExtractResult<TransformOutput> {
    let endpoint = context.endpoint;
    let activities = required_array(endpoint, payload, "activities")?;
    let goals = required(endpoint, payload, "goals")?;
    let summary = required(endpoint, payload, "summary")?;

    let activity_options = MappingOptions::default()
        .with_time_fields(ACTIVITY_TIME_FIELDS)
        .with_datetime_fields(ACTIVITY_DATETIME_FIELDS);

    let mut follow_ups = Vec::with_capacity(activities.len());
    let mut activity_rows = Vec::with_capacity(activities.len());
    for activity in records(endpoint, activities, "activities")? {
        let log_id = activity
            .get("logId")
            .cloned()
            .ok_or_else(|| ExtractError::missing_key(endpoint.name(), "activities[].logId"))?;
        follow_ups.push(
            EndpointSpec::for_kind(EndpointKind::ActivityTcx)
                .with_response_format("tcx")
                .with_parameter(columns::LOG_ID, log_id),
        );
        activity_rows.push(map_record(activity, &ACTIVITY, activity_options, context));
    }

    let goals_row = map_record(
        record(endpoint, goals, "goals")?,
        &GOALS,
        MappingOptions::default(),
        context,
    );

    let mut summary = record(endpoint, summary, "summary")?;
    let distances: Vec<(String, Value)> = summary
        .get("distances")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let activity = entry.get("activity")?.as_str()?;
                    let distance = entry.get("distance")?.clone();
                    Some((format!("{activity}_distance"), distance))
                })
                .collect()
        })
        .unwrap_or_default();
    summary.extend(distances);
    let summary_row = map_record(summary, &SUMMARY, MappingOptions::default(), context);

    Ok(TransformOutput {
        tables: vec![
            TableRows::new(tables::ACTIVITY, activity_rows),
            TableRows::new(tables::GOALS, vec![goals_row]),
            TableRows::new(tables::SUMMARY, vec![summary_row]),
        ],
        follow_ups,
    })
}

fn transform_body_weight(
    context: &ProcessingContext,
    payload: &Map<String, Value>,
) -> ExtractResult<TransformOutput> {
    let endpoint = context.endpoint;
    let entries = required_array(endpoint, payload, "weight")?;

    // An empty list means nothing was logged; the vendor lists the latest log first.
    let Some(first) = entries.first() else {
        return Ok(TransformOutput::default());
    };
    let row = map_record(
        record(endpoint, first, "weight")?,
        &WEIGHT,
        MappingOptions::default(),
        context,
    );
    Ok(TransformOutput {
        tables: vec![TableRows::new(tables::WEIGHT, vec![row])],
        follow_ups: Vec::new(),
    })
}

/// Lower-cased, underscored zone name, e.g. "Fat Burn" becomes `fat_burn`
fn zone_prefix(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

fn transform_heart_rate(
    context: &ProcessingContext,
    payload: &Map<String, Value>,
) -> ExtractResult<TransformOutput> {
    let endpoint = context.endpoint;
    let days = required_array(endpoint, payload, "activities-heart")?;

    let mut rows = Vec::with_capacity(days.len());
    for mut day in records(endpoint, days, "activities-heart")? {
        let zones: Vec<Value> = day
            .get("value")
            .and_then(|value| value.get("heartRateZones"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        for zone in &zones {
            let Some(name) = zone.get("name").and_then(Value::as_str) else {
                continue;
            };
            let prefix = zone_prefix(name);
            if let Some(calories) = zone.get("caloriesOut") {
                day.insert(format!("{prefix}_calories"), calories.clone());
            }
            if let Some(minutes) = zone.get("minutes") {
                day.insert(format!("{prefix}_minutes"), minutes.clone());
            }
        }
        rows.push(map_record(day, &HEART_RATE, MappingOptions::default(), context));
    }

    Ok(TransformOutput {
        tables: vec![TableRows::new(tables::HEART_RATE, rows)],
        follow_ups: Vec::new(),
    })
}

fn transform_sleep(
    context: &ProcessingContext,
    payload: &Map<String, Value>,
) -> ExtractResult<TransformOutput> {
    let endpoint = context.endpoint;
    let sessions = required_array(endpoint, payload, "sleep")?;
    let detail_options =
        MappingOptions::without_augmentation().with_datetime_fields(SLEEP_DETAIL_DATETIME_FIELDS);

    let mut session_rows = Vec::with_capacity(sessions.len());
    let mut detail_rows = Vec::new();
    for session in records(endpoint, sessions, "sleep")? {
        let log_id = session
            .get("logId")
            .cloned()
            .ok_or_else(|| ExtractError::missing_key(endpoint.name(), "sleep[].logId"))?;

        // Full stages first, then the short wake periods.
        let levels = session.get("levels");
        let stages = ["data", "shortData"]
            .into_iter()
            .filter_map(|key| levels.and_then(|levels| levels.get(key)).and_then(Value::as_array))
            .flatten();
        for stage in stages {
            let mut row = map_record(
                record(endpoint, stage, "sleep[].levels")?,
                &SLEEP_DETAIL,
                detail_options,
                context,
            );
            row.insert(columns::LOG_ID.to_owned(), log_id.clone());
            detail_rows.push(row);
        }

        session_rows.push(map_record(session, &SLEEP, MappingOptions::default(), context));
    }

    Ok(TransformOutput {
        tables: vec![
            TableRows::new(tables::SLEEP, session_rows),
            TableRows::new(tables::SLEEP_DETAIL, detail_rows),
        ],
        follow_ups: Vec::new(),
    })
}

fn transform_cardio_score(
    context: &ProcessingContext,
    payload: &Map<String, Value>,
) -> ExtractResult<TransformOutput> {
    let endpoint = context.endpoint;
    let days = required_array(endpoint, payload, "cardioScore")?;
    let rows = records(endpoint, days, "cardioScore")?
        .into_iter()
        .map(|day| map_record(day, &CARDIOSCORE, MappingOptions::default(), context))
        .collect();

    Ok(TransformOutput {
        tables: vec![TableRows::new(tables::CARDIOSCORE, rows)],
        follow_ups: Vec::new(),
    })
}
