// ABOUTME: Schema command for fitbit-extract
// ABOUTME: Prints or writes the warehouse DDL script built from the field metadata tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fitbit_extract::config::read_config_parameter;
use fitbit_extract::schema::{generate_ddl, SchemaTarget, TableCreateMode};
use tracing::info;

const PROJECT_KEY: &str = "gcp_project";
const DATASET_KEY: &str = "gcp_bq_dataset";

/// Generate DDL for every warehouse table
pub fn schema(
    project: Option<String>,
    dataset: Option<String>,
    config_file: &Path,
    if_not_exists: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let project = match project {
        Some(project) => project,
        None => read_config_parameter(config_file, PROJECT_KEY)?,
    };
    let dataset = match dataset {
        Some(dataset) => dataset,
        None => read_config_parameter(config_file, DATASET_KEY)?,
    };

    let mode = if if_not_exists {
        TableCreateMode::IfNotExists
    } else {
        TableCreateMode::Replace
    };
    let script = generate_ddl(&SchemaTarget::new(project, dataset)?.with_mode(mode));

    match output {
        Some(path) => {
            fs::write(&path, script)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Schema script written");
        }
        None => print!("{script}"),
    }
    Ok(())
}
