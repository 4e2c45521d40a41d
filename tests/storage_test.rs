// ABOUTME: Tests for the local response sink and the NDJSON warehouse loader
// ABOUTME: Storage layout, extension dispatch, appends, and empty row sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::fs;

use anyhow::Result;
use fitbit_extract::storage::{
    DataLoader, LocalDataLoader, LocalResponseSink, Payload, ResponseSink, Row,
};
use fitbit_extract::{ErrorCode, ExtractError};
use helpers::object;
use serde_json::{json, Value};
use tempfile::TempDir;

fn row(value: Value) -> Row {
    object(value)
}

#[tokio::test]
async fn test_sink_writes_folder_name_format() -> Result<()> {
    let dir = TempDir::new()?;
    let sink = LocalResponseSink::new(dir.path());

    sink.save(
        "{\"sleep\":[]}",
        "get_sleep_by_date/20230118",
        "get_sleep_by_date_ABC",
        "json",
    )
    .await?;

    let expected = dir
        .path()
        .join("get_sleep_by_date/20230118/get_sleep_by_date_ABC.json");
    assert_eq!(
        sink.path_for("get_sleep_by_date/20230118", "get_sleep_by_date_ABC", "json"),
        expected
    );
    assert_eq!(fs::read_to_string(expected)?, "{\"sleep\":[]}");
    Ok(())
}

#[tokio::test]
async fn test_sink_overwrites_existing_response() -> Result<()> {
    let dir = TempDir::new()?;
    let sink = LocalResponseSink::new(dir.path());
    sink.save("first", "f", "n", "json").await?;
    sink.save("second", "f", "n", "json").await?;
    assert_eq!(fs::read_to_string(dir.path().join("f/n.json"))?, "second");
    Ok(())
}

#[tokio::test]
async fn test_loader_reads_by_extension() -> Result<()> {
    let dir = TempDir::new()?;
    let json_path = dir.path().join("a.json");
    let tcx_path = dir.path().join("b.tcx");
    fs::write(&json_path, "{\"weight\": []}")?;
    fs::write(&tcx_path, "<TrainingCenterDatabase/>")?;

    let loader = LocalDataLoader::new(dir.path().join("warehouse"));
    assert_eq!(
        loader.extract(json_path.to_str().unwrap()).await?,
        Payload::Json(json!({"weight": []}))
    );
    assert_eq!(
        loader.extract(tcx_path.to_str().unwrap()).await?,
        Payload::Xml("<TrainingCenterDatabase/>".to_owned())
    );
    Ok(())
}

#[tokio::test]
async fn test_loader_rejects_unknown_extensions() -> Result<()> {
    let dir = TempDir::new()?;
    let loader = LocalDataLoader::new(dir.path());

    for (path, extension) in [("data.csv", "csv"), ("data", "")] {
        let err = loader.extract(path).await.unwrap_err();
        assert!(
            matches!(err, ExtractError::UnsupportedFormat { extension: ref ext } if ext == extension)
        );
        assert_eq!(err.code(), ErrorCode::UnsupportedFormat);
    }
    Ok(())
}

#[tokio::test]
async fn test_loader_appends_ndjson_rows() -> Result<()> {
    let dir = TempDir::new()?;
    let loader = LocalDataLoader::new(dir.path().join("warehouse"));

    loader
        .load(&[row(json!({"weight": 80.5, "date": "2023-01-18"}))], "weight")
        .await?;
    loader
        .load(&[row(json!({"weight": 80.1, "date": "2023-01-19"}))], "weight")
        .await?;

    let contents = fs::read_to_string(loader.table_path("weight"))?;
    let lines: Vec<Value> = contents
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(
        lines,
        vec![
            json!({"weight": 80.5, "date": "2023-01-18"}),
            json!({"weight": 80.1, "date": "2023-01-19"}),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_loading_no_rows_touches_nothing() -> Result<()> {
    let dir = TempDir::new()?;
    let warehouse = dir.path().join("warehouse");
    let loader = LocalDataLoader::new(&warehouse);

    loader.load(&[], "sleep").await?;
    assert!(!warehouse.exists());
    Ok(())
}

#[tokio::test]
async fn test_broken_json_is_a_serialization_error() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"weight\": [")?;

    let err = LocalDataLoader::new(dir.path())
        .extract(path.to_str().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::Serialization { .. }));
    Ok(())
}
