// ABOUTME: Per-file processing context recovered from the stored response path
// ABOUTME: Parses {endpoint}/{YYYYMMDD}/[{id}_]{endpoint}_{owner}.{format}
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::Path;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use fitbit_core::constants::formats::{DATETIME_FORMAT, DATE_FORMAT, FOLDER_DATE_FORMAT};
use fitbit_core::{ExtractError, ExtractResult};
use regex::Regex;

use crate::endpoints::EndpointKind;

const FILENAME_HINT: &str =
    "Could not parse endpoint and user from filename, should be of format [endpoint]_[user id].format";
const DATE_HINT: &str =
    "Could not parse date from path, should be of format /[date]/[filename].format with date as YYYYMMDD";

/// Everything a transform handler needs to know about one stored file
///
/// Built once per `process` call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingContext {
    /// Vendor user id the data belongs to
    pub owner_id: String,
    /// Endpoint that produced the file
    pub endpoint: EndpointKind,
    /// Calendar date the data was requested for
    pub date: NaiveDate,
    /// Leading numeric identifier of per-instance files
    pub instance_id: Option<u64>,
    /// Path the file was read from
    pub source_path: String,
    /// Timestamp written to `processed_date`
    pub processed_at: NaiveDateTime,
}

fn filename_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"(?i)^(?:([0-9]+)_)?(get_[a-z0-9_]+)_([^_./\\]+)\.([a-z0-9]+)$").ok()
        })
        .as_ref()
}

impl ProcessingContext {
    /// Parse the stored path
    ///
    /// # Errors
    ///
    /// - `PathParse` when the file name or the date folder does not match the
    ///   naming convention, or a daily endpoint's file carries an id prefix
    /// - `UnknownEndpoint` when the endpoint segment is not in the catalog
    pub fn from_path(path: &str, processed_at: NaiveDateTime) -> ExtractResult<Self> {
        let as_path = Path::new(path);
        let file_name = as_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| path_error(path, FILENAME_HINT))?;

        let captures = filename_pattern()
            .and_then(|pattern| pattern.captures(file_name))
            .ok_or_else(|| path_error(path, FILENAME_HINT))?;

        let endpoint_name = captures.get(2).map_or("", |m| m.as_str());
        let owner_id = captures.get(3).map_or("", |m| m.as_str());
        let endpoint = EndpointKind::from_name(endpoint_name)?;

        let instance_id = captures
            .get(1)
            .map(|m| m.as_str().parse::<u64>())
            .transpose()
            .map_err(|e| path_error(path, &format!("instance id does not fit: {e}")))?;
        if instance_id.is_some() && !endpoint.is_per_instance() {
            return Err(path_error(
                path,
                &format!("{} files carry no instance id prefix", endpoint.name()),
            ));
        }

        let date = as_path
            .parent()
            .and_then(Path::file_name)
            .and_then(|segment| segment.to_str())
            .filter(|segment| segment.len() == 8 && segment.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|segment| NaiveDate::parse_from_str(segment, FOLDER_DATE_FORMAT).ok())
            .ok_or_else(|| path_error(path, DATE_HINT))?;

        Ok(Self {
            owner_id: owner_id.to_owned(),
            endpoint,
            date,
            instance_id,
            source_path: path.to_owned(),
            processed_at,
        })
    }

    /// Run date as `YYYY-MM-DD`
    #[must_use]
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Processing timestamp as `YYYY-MM-DD HH:MM:SS`
    #[must_use]
    pub fn processed_date_string(&self) -> String {
        self.processed_at.format(DATETIME_FORMAT).to_string()
    }

    /// Instance id, required by per-instance endpoints
    ///
    /// # Errors
    ///
    /// Returns `MissingInstanceId` when the file name carried no identifier
    pub fn require_instance_id(&self) -> ExtractResult<u64> {
        self.instance_id.ok_or_else(|| ExtractError::MissingInstanceId {
            endpoint: self.endpoint.name().to_owned(),
        })
    }
}

fn path_error(path: &str, reason: &str) -> ExtractError {
    ExtractError::PathParse {
        path: path.to_owned(),
        reason: reason.to_owned(),
    }
}
