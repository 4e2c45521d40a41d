// ABOUTME: Metadata-driven field mapper shared by every transform handler
// ABOUTME: Datetime and time cleanup, order-preserving flatten, allow-list projection, augmentation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Field mapping
//!
//! Stateless functions. Missing optional fields never raise; a field the
//! source does not carry is simply absent from the output row.

use fitbit_core::constants::columns;
use fitbit_core::FieldMetadataTable;
use serde_json::{Map, Number, Value};

use super::context::ProcessingContext;
use crate::storage::Row;

/// Length of a `YYYY-MM-DDTHH:MM:SS` prefix
const DATETIME_PREFIX_LEN: usize = 19;

/// Pre-normalization and augmentation switches for one mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingOptions {
    /// Top-level fields normalized to `YYYY-MM-DD HH:MM:SS`
    pub datetime_fields: &'static [&'static str],
    /// Top-level fields normalized from `HH:MM` to `HH:MM:SS`
    pub time_fields: &'static [&'static str],
    /// Add `date` when projection did not produce one
    pub append_date: bool,
    /// Add `user_id`
    pub append_user_id: bool,
    /// Add `processed_date`
    pub append_processed_date: bool,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            datetime_fields: &[],
            time_fields: &[],
            append_date: true,
            append_user_id: true,
            append_processed_date: true,
        }
    }
}

impl MappingOptions {
    /// Leaf rows keyed by a parent identifier: no augmentation
    #[must_use]
    pub fn without_augmentation() -> Self {
        Self {
            append_date: false,
            append_user_id: false,
            append_processed_date: false,
            ..Self::default()
        }
    }

    /// Set the datetime cleanup list
    #[must_use]
    pub const fn with_datetime_fields(mut self, fields: &'static [&'static str]) -> Self {
        self.datetime_fields = fields;
        self
    }

    /// Set the time cleanup list
    #[must_use]
    pub const fn with_time_fields(mut self, fields: &'static [&'static str]) -> Self {
        self.time_fields = fields;
        self
    }
}

/// Flatten nested objects into dotted keys, keeping source order
///
/// Arrays and scalars are left as they are.
#[must_use]
pub fn flatten(record: &Map<String, Value>) -> Map<String, Value> {
    let mut flat = Map::new();
    flatten_into("", record, &mut flat);
    flat
}

fn flatten_into(prefix: &str, record: &Map<String, Value>, flat: &mut Map<String, Value>) {
    for (key, value) in record {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(&path, nested, flat),
            other => {
                flat.insert(path, other.clone());
            }
        }
    }
}

/// Truncate to 19 characters and swap the `T` separator for a space
#[must_use]
pub fn clean_datetime_value(raw: &str) -> String {
    raw.chars()
        .take(DATETIME_PREFIX_LEN)
        .collect::<String>()
        .replace('T', " ")
}

/// Apply [`clean_datetime_value`] to each listed string field that is present
pub fn clean_datetime(fields: &[&str], record: &mut Map<String, Value>) {
    for field in fields {
        if let Some(Value::String(raw)) = record.get_mut(*field) {
            *raw = clean_datetime_value(raw);
        }
    }
}

/// Append `:00` to each listed string field that is present
pub fn clean_time(fields: &[&str], record: &mut Map<String, Value>) {
    for field in fields {
        if let Some(Value::String(raw)) = record.get_mut(*field) {
            raw.push_str(":00");
        }
    }
}

/// Integer if it parses as one, else float, else the original string
#[must_use]
pub fn convert_to_number(text: &str) -> Value {
    let trimmed = text.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Value::from(integer);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or_else(|| Value::String(text.to_owned()), Value::Number)
}

/// Keep only allow-listed flattened keys, renamed to their target column
#[must_use]
pub fn project(flat: Map<String, Value>, table: &FieldMetadataTable) -> Row {
    flat.into_iter()
        .filter_map(|(key, value)| table.target_for(&key).map(|target| (target.to_owned(), value)))
        .collect()
}

/// Clean, flatten, project, and augment one source record
#[must_use]
pub fn map_record(
    mut record: Map<String, Value>,
    table: &FieldMetadataTable,
    options: MappingOptions,
    context: &ProcessingContext,
) -> Row {
    clean_datetime(options.datetime_fields, &mut record);
    clean_time(options.time_fields, &mut record);

    let mut row = project(flatten(&record), table);

    if options.append_date && !row.contains_key(columns::DATE) {
        row.insert(columns::DATE.to_owned(), Value::from(context.date_string()));
    }
    if options.append_user_id {
        row.insert(columns::USER_ID.to_owned(), Value::from(context.owner_id.clone()));
    }
    if options.append_processed_date {
        row.insert(
            columns::PROCESSED_DATE.to_owned(),
            Value::from(context.processed_date_string()),
        );
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_flatten_nested_and_idempotent() {
        let nested = object(json!({"a": "1", "b": {"c": "2"}, "d": {"e": {"f": "3"}}}));
        let flat = flatten(&nested);
        assert_eq!(Value::Object(flat.clone()), json!({"a": "1", "b.c": "2", "d.e.f": "3"}));
        assert_eq!(flatten(&flat), flat);
    }

    #[test]
    fn test_flatten_leaves_arrays_alone() {
        let nested = object(json!({"zones": [{"name": "Peak"}], "value": {"x": [1, 2]}}));
        assert_eq!(
            Value::Object(flatten(&nested)),
            json!({"zones": [{"name": "Peak"}], "value.x": [1, 2]})
        );
    }

    #[test]
    fn test_flatten_keeps_source_order() {
        let nested = object(json!({"z": 1, "a": {"m": 2, "b": 3}, "c": 4}));
        let keys: Vec<_> = flatten(&nested).keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a.m", "a.b", "c"]);
    }

    #[test]
    fn test_datetime_variants_normalize() {
        assert_eq!(clean_datetime_value("2023-01-18T07:04:03.000Z"), "2023-01-18 07:04:03");
        assert_eq!(clean_datetime_value("2023-01-18T07:04:03.000+11:00"), "2023-01-18 07:04:03");
        assert_eq!(clean_datetime_value("2023-01-18T07:04:03"), "2023-01-18 07:04:03");
    }

    #[test]
    fn test_clean_time_only_touches_present_strings() {
        let mut record = object(json!({"startTime": "07:30", "other": 5}));
        clean_time(&["startTime", "missing", "other"], &mut record);
        assert_eq!(Value::Object(record), json!({"startTime": "07:30:00", "other": 5}));
    }

    #[test]
    fn test_convert_to_number() {
        assert_eq!(convert_to_number("1"), json!(1));
        assert_eq!(convert_to_number("1.0"), json!(1.0));
        assert!(convert_to_number("1.0").is_f64());
        assert_eq!(convert_to_number("hello"), json!("hello"));
        assert_eq!(convert_to_number("-33.89690887928009"), json!(-33.896_908_879_280_09));
    }
}
