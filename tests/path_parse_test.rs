// ABOUTME: Tests for recovering the processing context from stored response paths
// ABOUTME: Owner, endpoint, date, and instance id parsing plus malformed path rejection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use fitbit_extract::endpoints::EndpointKind;
use fitbit_extract::transform::ProcessingContext;
use fitbit_extract::ExtractError;

fn processed_at() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2023-02-03 12:31:38", "%Y-%m-%d %H:%M:%S").unwrap()
}

fn parse_reason(path: &str) -> String {
    match ProcessingContext::from_path(path, processed_at()) {
        Err(ExtractError::PathParse { reason, .. }) => reason,
        other => panic!("expected a path parse failure for {path}, got {other:?}"),
    }
}

#[test]
fn test_daily_file_path() -> Result<()> {
    let context = ProcessingContext::from_path(
        "get_sleep_by_date/20230118/get_sleep_by_date_ABC123.json",
        processed_at(),
    )?;

    assert_eq!(context.owner_id, "ABC123");
    assert_eq!(context.endpoint, EndpointKind::Sleep);
    assert_eq!(context.date, NaiveDate::from_ymd_opt(2023, 1, 18).unwrap());
    assert_eq!(context.instance_id, None);
    assert_eq!(context.date_string(), "2023-01-18");
    assert_eq!(context.processed_date_string(), "2023-02-03 12:31:38");
    Ok(())
}

#[test]
fn test_bucket_prefix_is_ignored() -> Result<()> {
    let context = ProcessingContext::from_path(
        "/var/data/get_cardio_score_by_date/20221231/get_cardio_score_by_date_XYZ.json",
        processed_at(),
    )?;
    assert_eq!(context.endpoint, EndpointKind::CardioScore);
    assert_eq!(context.date, NaiveDate::from_ymd_opt(2022, 12, 31).unwrap());
    Ok(())
}

#[test]
fn test_per_instance_path_carries_identifier() -> Result<()> {
    let context = ProcessingContext::from_path(
        "get_activity_tcx_by_id/20230118/52838125071_get_activity_tcx_by_id_ABC123.tcx",
        processed_at(),
    )?;

    assert_eq!(context.endpoint, EndpointKind::ActivityTcx);
    assert_eq!(context.instance_id, Some(52_838_125_071));
    assert_eq!(context.require_instance_id()?, 52_838_125_071);
    assert_eq!(context.owner_id, "ABC123");
    Ok(())
}

#[test]
fn test_file_name_without_endpoint_pattern() {
    let reason = parse_reason("get_sleep_by_date/20230118/sleep.json");
    assert!(reason.contains("[endpoint]_[user id].format"));

    let reason = parse_reason("get_sleep_by_date/20230118/get_sleep_by_date_ABC123");
    assert!(reason.contains("[endpoint]_[user id].format"));
}

#[test]
fn test_bad_date_folder() {
    for path in [
        "get_sleep_by_date/2023-01-18/get_sleep_by_date_ABC123.json",
        "get_sleep_by_date/20231318/get_sleep_by_date_ABC123.json",
        "get_sleep_by_date_ABC123.json",
    ] {
        assert!(parse_reason(path).contains("YYYYMMDD"), "{path}");
    }
}

#[test]
fn test_unknown_endpoint_name() {
    let err = ProcessingContext::from_path(
        "get_fake_endpoint/20230118/get_fake_endpoint_ABC123.json",
        processed_at(),
    )
    .unwrap_err();
    assert!(matches!(err, ExtractError::UnknownEndpoint { ref name } if name == "get_fake_endpoint"));
    assert_eq!(err.to_string(), "get_fake_endpoint not in available endpoint list");
}

#[test]
fn test_daily_endpoint_has_no_instance_id() {
    let context = ProcessingContext::from_path(
        "get_body_weight_by_date/20230118/get_body_weight_by_date_ABC123.json",
        processed_at(),
    )
    .unwrap();
    assert!(matches!(
        context.require_instance_id(),
        Err(ExtractError::MissingInstanceId { .. })
    ));
}

#[test]
fn test_instance_prefix_on_daily_endpoint_is_rejected() {
    let reason = parse_reason("get_sleep_by_date/20230118/123_get_sleep_by_date_ABC.json");
    assert_eq!(reason, "get_sleep_by_date files carry no instance id prefix");
}
