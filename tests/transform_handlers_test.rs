// ABOUTME: Integration tests for the transform engine and per-endpoint handlers
// ABOUTME: Row mapping per table, processing log, follow-up scheduling, and payload validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDateTime;
use fitbit_extract::messaging::EndpointBatch;
use fitbit_extract::storage::Payload;
use fitbit_extract::transform::FitbitEtl;
use fitbit_extract::{ErrorCode, ExtractError};
use helpers::{RecordingLoader, RecordingMessenger};
use serde_json::{json, Value};

const PROCESSED_AT: &str = "2023-02-03 12:31:38";

fn etl(loader: Arc<RecordingLoader>, messenger: Arc<RecordingMessenger>) -> FitbitEtl {
    let processed_at = NaiveDateTime::parse_from_str(PROCESSED_AT, "%Y-%m-%d %H:%M:%S").unwrap();
    FitbitEtl::new(loader, messenger).with_processed_at(processed_at)
}

fn path(endpoint: &str) -> String {
    format!("{endpoint}/20230118/{endpoint}_TESTUSER.json")
}

async fn process(endpoint: &str, payload: Value) -> (Arc<RecordingLoader>, Arc<RecordingMessenger>) {
    let path = path(endpoint);
    let loader = Arc::new(RecordingLoader::with_json(&path, payload));
    let messenger = Arc::new(RecordingMessenger::default());
    etl(loader.clone(), messenger.clone())
        .process(&path)
        .await
        .unwrap();
    (loader, messenger)
}

async fn process_err(endpoint: &str, payload: Value) -> ExtractError {
    let path = path(endpoint);
    let loader = Arc::new(RecordingLoader::with_json(&path, payload));
    etl(loader, Arc::new(RecordingMessenger::default()))
        .process(&path)
        .await
        .unwrap_err()
}

#[tokio::test]
async fn test_cardio_score_row_and_processing_log() -> Result<()> {
    let payload = json!({"cardioScore": [{"dateTime": "2023-01-18", "value": {"vo2Max": "44-48"}}]});
    let (loader, messenger) = process("get_cardio_score_by_date", payload).await;

    let loads = loader.loads();
    assert_eq!(loads.len(), 2);
    assert_eq!(loads[0].0, "cardioscore");
    assert_eq!(
        Value::Object(loads[0].1[0].clone()),
        json!({
            "date": "2023-01-18",
            "vo2_max": "44-48",
            "user_id": "TESTUSER",
            "processed_date": PROCESSED_AT
        })
    );

    assert_eq!(loads[1].0, "files_processed");
    assert_eq!(
        Value::Object(loads[1].1[0].clone()),
        json!({
            "date": "2023-01-18",
            "user_id": "TESTUSER",
            "processed_date": PROCESSED_AT,
            "api_endpoint": "get_cardio_score_by_date",
            "file_processed": path("get_cardio_score_by_date")
        })
    );
    assert!(messenger.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_heart_rate_zones_become_columns() -> Result<()> {
    let payload = json!({
        "activities-heart": [{
            "dateTime": "2023-01-18",
            "value": {
                "customHeartRateZones": [],
                "heartRateZones": [
                    {"caloriesOut": 2315.26512, "max": 113, "min": 30, "minutes": 1398, "name": "Out of Range"},
                    {"caloriesOut": 320.97, "max": 137, "min": 113, "minutes": 34, "name": "Fat Burn"},
                    {"caloriesOut": 86.69808, "max": 168, "min": 137, "minutes": 8, "name": "Cardio"},
                    {"caloriesOut": 0, "max": 220, "min": 168, "minutes": 0, "name": "Peak"}
                ],
                "restingHeartRate": 64
            }
        }],
        "activities-heart-intraday": {"dataset": []}
    });
    let (loader, _) = process("get_heart_rate_by_date", payload).await;

    let rows = loader.rows_for("heart_rate");
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["date"], json!("2023-01-18"));
    assert_eq!(row["resting_heart_rate"], json!(64));
    assert_eq!(row["fat_burn_calories"], json!(320.97));
    assert_eq!(row["fat_burn_minutes"], json!(34));
    assert_eq!(row["out_of_range_minutes"], json!(1398));
    assert_eq!(row["cardio_minutes"], json!(8));
    assert_eq!(row["peak_calories"], json!(0));
    assert_eq!(row["user_id"], json!("TESTUSER"));
    assert!(!row.contains_key("value.heartRateZones"));
    Ok(())
}

#[tokio::test]
async fn test_heart_rate_day_without_zones_still_maps() -> Result<()> {
    let payload = json!({"activities-heart": [{"dateTime": "2023-01-18", "value": {}}]});
    let (loader, _) = process("get_heart_rate_by_date", payload).await;
    let rows = loader.rows_for("heart_rate");
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].contains_key("fat_burn_minutes"));
    Ok(())
}

#[tokio::test]
async fn test_body_weight_keeps_first_entry_only() -> Result<()> {
    let payload = json!({"weight": [
        {"bmi": 25.93, "date": "2023-01-17", "logId": 1_673_999_999_000_u64, "source": "API", "time": "23:59:59", "weight": 77.6},
        {"bmi": 26.1, "date": "2023-01-17", "logId": 1_673_900_000_000_u64, "source": "API", "time": "08:00:00", "weight": 78.1}
    ]});
    let (loader, _) = process("get_body_weight_by_date", payload).await;

    let rows = loader.rows_for("weight");
    assert_eq!(rows.len(), 1);
    assert_eq!(
        Value::Object(rows[0].clone()),
        json!({
            "bmi": 25.93,
            "date": "2023-01-17",
            "log_id": 1_673_999_999_000_u64,
            "weight": 77.6,
            "user_id": "TESTUSER",
            "processed_date": PROCESSED_AT
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_body_weight_empty_list_loads_nothing() -> Result<()> {
    let (loader, _) = process("get_body_weight_by_date", json!({"weight": []})).await;
    assert!(loader.rows_for("weight").is_empty());
    assert_eq!(loader.rows_for("files_processed").len(), 1);
    Ok(())
}

fn summary_payload() -> Value {
    json!({
        "activities": [{
            "activityId": 90013,
            "activityParentId": 90013,
            "activityParentName": "Walk",
            "calories": 371,
            "description": "Walking less than 2 mph, strolling very slowly",
            "duration": 2_229_000,
            "hasActiveZoneMinutes": true,
            "hasStartTime": true,
            "isFavorite": false,
            "lastModified": "2023-01-17T21:14:42.000Z",
            "logId": 53_177_087_392_u64,
            "name": "Walk",
            "startDate": "2023-01-18",
            "startTime": "07:06",
            "steps": 4031
        }],
        "goals": {"activeMinutes": 30, "caloriesOut": 2675, "distance": 8.05, "floors": 10, "steps": 10000},
        "summary": {
            "activeScore": -1,
            "caloriesOut": 2722,
            "distances": [
                {"activity": "total", "distance": 6.46},
                {"activity": "loggedActivities", "distance": 3.70049},
                {"activity": "veryActive", "distance": 4.55}
            ],
            "heartRateZones": [{"name": "Peak", "minutes": 0}],
            "restingHeartRate": 64,
            "steps": 7883
        }
    })
}

#[tokio::test]
async fn test_summary_loads_three_tables_and_schedules_tcx() -> Result<()> {
    let (loader, messenger) = process("get_activity_summary_by_date", summary_payload()).await;

    let tables: Vec<String> = loader.loads().into_iter().map(|(table, _)| table).collect();
    assert_eq!(tables, vec!["activity", "goals", "summary", "files_processed"]);

    let activity = &loader.rows_for("activity")[0];
    assert_eq!(activity["log_id"], json!(53_177_087_392_u64));
    assert_eq!(activity["start_time"], json!("07:06:00"));
    assert_eq!(activity["last_modified"], json!("2023-01-17 21:14:42"));
    assert_eq!(activity["has_start_time"], json!(true));
    assert_eq!(activity["date"], json!("2023-01-18"));

    let goals = &loader.rows_for("goals")[0];
    assert_eq!(goals["calories_out"], json!(2675));
    assert_eq!(goals["distance"], json!(8.05));

    let summary = &loader.rows_for("summary")[0];
    assert_eq!(summary["total_distance"], json!(6.46));
    assert_eq!(summary["logged_activities_distance"], json!(3.70049));
    assert_eq!(summary["very_active_distance"], json!(4.55));
    assert_eq!(summary["active_score"], json!(-1));
    assert!(!summary.contains_key("distances"));

    let sent = messenger.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].user_id, "TESTUSER");
    assert_eq!(sent[0].date, "2023-01-18");
    let EndpointBatch::Specs(specs) = &sent[0].endpoints else {
        panic!("expected explicit endpoints");
    };
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].name, "get_activity_tcx_by_id");
    assert_eq!(specs[0].response_format, "tcx");
    assert_eq!(specs[0].url_parameters["log_id"], json!(53_177_087_392_u64));
    Ok(())
}

#[tokio::test]
async fn test_summary_without_activities_sends_no_message() -> Result<()> {
    let mut payload = summary_payload();
    payload["activities"] = json!([]);
    let (loader, messenger) = process("get_activity_summary_by_date", payload).await;
    assert!(loader.rows_for("activity").is_empty());
    assert!(messenger.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_summary_missing_keys_are_named() -> Result<()> {
    for key in ["activities", "goals", "summary"] {
        let mut payload = summary_payload();
        payload.as_object_mut().unwrap().remove(key);
        let err = process_err("get_activity_summary_by_date", payload).await;
        assert_eq!(err.code(), ErrorCode::MalformedPayload);
        assert!(err.to_string().contains(key), "{err} should name {key}");
    }
    Ok(())
}

#[tokio::test]
async fn test_sleep_sessions_and_stage_details() -> Result<()> {
    let payload = json!({
        "sleep": [{
            "dateOfSleep": "2023-01-18",
            "duration": 27_600_000,
            "efficiency": 88,
            "endTime": "2023-01-18T06:25:00.000",
            "isMainSleep": true,
            "levels": {
                "data": [
                    {"dateTime": "2023-01-17T22:45:00.000", "level": "wake", "seconds": 990},
                    {"dateTime": "2023-01-17T23:01:30.000", "level": "light", "seconds": 1200}
                ],
                "shortData": [
                    {"dateTime": "2023-01-17T23:04:30.000", "level": "wake", "seconds": 30}
                ],
                "summary": {"deep": {"count": 4, "minutes": 70}}
            },
            "logId": 39_842_924_697_u64,
            "logType": "auto_detected",
            "startTime": "2023-01-17T22:45:00.000",
            "type": "stages"
        }],
        "summary": {"totalMinutesAsleep": 385}
    });
    let (loader, _) = process("get_sleep_by_date", payload).await;

    let sessions = loader.rows_for("sleep");
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["date"], json!("2023-01-18"));
    assert_eq!(sessions[0]["end_time"], json!("2023-01-18T06:25:00.000"));
    assert_eq!(sessions[0]["log_id"], json!(39_842_924_697_u64));

    let details = loader.rows_for("sleep_detail");
    assert_eq!(details.len(), 3);
    assert_eq!(
        Value::Object(details[0].clone()),
        json!({"date_time": "2023-01-17 22:45:00", "level": "wake", "seconds": 990, "log_id": 39_842_924_697_u64})
    );
    assert_eq!(details[2]["date_time"], json!("2023-01-17 23:04:30"));
    assert!(details.iter().all(|row| !row.contains_key("user_id")));
    Ok(())
}

#[tokio::test]
async fn test_required_top_level_keys() -> Result<()> {
    for (endpoint, key) in [
        ("get_cardio_score_by_date", "cardioScore"),
        ("get_body_weight_by_date", "weight"),
        ("get_heart_rate_by_date", "activities-heart"),
        ("get_sleep_by_date", "sleep"),
    ] {
        let err = process_err(endpoint, json!({})).await;
        assert_eq!(err.code(), ErrorCode::MalformedPayload, "{endpoint}");
        assert!(err.to_string().contains(key), "{err} should name {key}");
    }
    Ok(())
}

#[tokio::test]
async fn test_non_object_payload_is_malformed() -> Result<()> {
    let err = process_err("get_sleep_by_date", json!([1, 2, 3])).await;
    assert_eq!(err.code(), ErrorCode::MalformedPayload);
    Ok(())
}

#[tokio::test]
async fn test_extract_only_endpoint_is_rejected_before_reading() -> Result<()> {
    let path = "get_heart_rate_variability_by_date/20230118/get_heart_rate_variability_by_date_TESTUSER.json";
    let loader = Arc::new(RecordingLoader::with_payload(path, Payload::Json(json!({}))));
    let err = etl(loader.clone(), Arc::new(RecordingMessenger::default()))
        .process(path)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::NoTransformHandler { .. }));
    assert_eq!(loader.extract_count(), 0);
    assert!(loader.loads().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_failed_file_does_not_log_processing() -> Result<()> {
    let path = path("get_sleep_by_date");
    let loader = Arc::new(RecordingLoader::with_json(&path, json!({"sleep": [{"dateOfSleep": "2023-01-18"}]})));
    let err = etl(loader.clone(), Arc::new(RecordingMessenger::default()))
        .process(&path)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::MalformedPayload);
    assert!(loader.rows_for("files_processed").is_empty());
    Ok(())
}
