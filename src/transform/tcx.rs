// ABOUTME: TCX activity export walker producing one row per trackpoint
// ABOUTME: Builds a namespace-free element tree with quick-xml, then merges activity, lap, and point fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::str;

use fitbit_core::constants::columns;
use fitbit_core::metadata::ACTIVITY_DETAIL;
use fitbit_core::{ExtractError, ExtractResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use super::context::ProcessingContext;
use super::mapper::{convert_to_number, map_record, MappingOptions};
use crate::storage::Row;

const ACTIVITY: &str = "Activity";
const LAP: &str = "Lap";
const TRACK: &str = "Track";
const TRACKPOINT: &str = "Trackpoint";
const POSITION: &str = "Position";
const HEART_RATE_BPM: &str = "HeartRateBpm";

const POINT_DATETIME_FIELDS: &[&str] = &["Time"];

/// One parsed element with namespace prefixes stripped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Local tag name
    pub name: String,
    /// Attributes in document order, namespace declarations excluded
    pub attributes: Vec<(String, String)>,
    /// Concatenated text content, trimmed
    pub text: String,
    /// Child elements in document order
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Element and all of its descendants named `name`, in document order
    #[must_use]
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Self> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a Self>) {
        if self.name == name {
            found.push(self);
        }
        for child in &self.children {
            child.collect_named(name, found);
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Parse a whole document into its root element
///
/// # Errors
///
/// Returns an `Xml` error for malformed markup, undecodable names, or a
/// document without a root element
pub fn parse_document(xml: &str) -> ExtractResult<XmlElement> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(element_from(&start)?),
            Ok(Event::Empty(start)) => {
                let element = element_from(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ExtractError::xml("closing tag without an open element"))?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::Text(text)) => {
                let content = text.unescape().map_err(|e| ExtractError::xml(e.to_string()))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&content);
                }
            }
            Ok(Event::CData(data)) => {
                let bytes = data.into_inner();
                let content = str::from_utf8(&bytes).map_err(|e| ExtractError::xml(e.to_string()))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(content);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ExtractError::xml(format!(
                    "error at position {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }

    if !stack.is_empty() {
        return Err(ExtractError::xml("document ended with unclosed elements"));
    }
    root.ok_or_else(|| ExtractError::xml("document has no root element"))
}

fn element_from(start: &BytesStart<'_>) -> ExtractResult<XmlElement> {
    let name = decode(start.local_name().as_ref())?;
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| ExtractError::xml(e.to_string()))?;
        let key = attribute.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let value = attribute
            .unescape_value()
            .map_err(|e| ExtractError::xml(e.to_string()))?;
        attributes.push((decode(attribute.key.local_name().as_ref())?, value.into_owned()));
    }
    Ok(XmlElement {
        name,
        attributes,
        ..XmlElement::default()
    })
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn decode(bytes: &[u8]) -> ExtractResult<String> {
    str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| ExtractError::xml(e.to_string()))
}

/// Walk a TCX export into `activity_detail` rows
///
/// # Errors
///
/// Returns `MissingInstanceId` when the context has no activity log id, and
/// `Xml` when the document cannot be parsed
pub fn transform_tcx(context: &ProcessingContext, xml: &str) -> ExtractResult<Vec<Row>> {
    let log_id = context.require_instance_id()?;
    let root = parse_document(xml)?;
    let options = MappingOptions::default().with_datetime_fields(POINT_DATETIME_FIELDS);

    let mut rows = Vec::new();
    for activity in root.descendants_named(ACTIVITY) {
        let mut activity_fields: Map<String, Value> = activity
            .attributes
            .iter()
            .map(|(key, value)| (key.clone(), Value::from(value.as_str())))
            .collect();
        activity_fields.insert(columns::LOG_ID.to_owned(), Value::from(log_id));

        for (lap_number, lap) in activity.descendants_named(LAP).into_iter().enumerate() {
            let lap_fields = lap_fields(lap, log_id, lap_number);

            for (point_order, point) in lap.descendants_named(TRACKPOINT).into_iter().enumerate() {
                // Later maps win: point over lap over activity.
                let mut merged = activity_fields.clone();
                merged.extend(lap_fields.clone());
                merged.extend(point_fields(point, point_order));
                rows.push(map_record(merged, &ACTIVITY_DETAIL, options, context));
            }
        }
    }
    Ok(rows)
}

fn lap_fields(lap: &XmlElement, log_id: u64, lap_number: usize) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(columns::LOG_ID.to_owned(), Value::from(log_id));
    fields.insert(columns::LAP_NUMBER.to_owned(), Value::from(lap_number));
    for child in &lap.children {
        if child.name != TRACK && child.is_leaf() {
            fields.insert(child.name.clone(), convert_to_number(&child.text));
        }
    }
    fields
}

fn point_fields(point: &XmlElement, point_order: usize) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(columns::POINT_ORDER.to_owned(), Value::from(point_order));
    for child in &point.children {
        match child.name.as_str() {
            POSITION => {
                for coordinate in &child.children {
                    fields.insert(coordinate.name.clone(), convert_to_number(&coordinate.text));
                }
            }
            HEART_RATE_BPM => {
                if let Some(value) = child.children.first() {
                    fields.insert(child.name.clone(), convert_to_number(&value.text));
                }
            }
            _ if child.is_leaf() => {
                fields.insert(child.name.clone(), convert_to_number(&child.text));
            }
            _ => {}
        }
    }
    fields
}
