// ABOUTME: Warehouse DDL generation from the same field metadata tables the transform uses
// ABOUTME: Emits a dataset statement and one CREATE TABLE per table inside a BEGIN/END script
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use fitbit_core::metadata::ALL_TABLES;
use fitbit_core::{ExtractError, ExtractResult, FieldMetadataTable};

/// How existing tables are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableCreateMode {
    /// `CREATE OR REPLACE TABLE`
    #[default]
    Replace,
    /// `CREATE TABLE IF NOT EXISTS`
    IfNotExists,
}

impl TableCreateMode {
    const fn replace_clause(self) -> &'static str {
        match self {
            Self::Replace => " OR REPLACE",
            Self::IfNotExists => "",
        }
    }

    const fn exists_clause(self) -> &'static str {
        match self {
            Self::Replace => "",
            Self::IfNotExists => " IF NOT EXISTS",
        }
    }
}

/// Target project and dataset for generated statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaTarget {
    /// Warehouse project id
    pub project: String,
    /// Dataset holding the tables
    pub dataset: String,
    /// Table creation mode
    pub mode: TableCreateMode,
}

impl SchemaTarget {
    /// Target with the default `OR REPLACE` mode
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when either name is empty
    pub fn new(project: impl Into<String>, dataset: impl Into<String>) -> ExtractResult<Self> {
        let project = project.into();
        let dataset = dataset.into();
        if project.trim().is_empty() {
            return Err(ExtractError::config("Please fill in project with a value"));
        }
        if dataset.trim().is_empty() {
            return Err(ExtractError::config("Please fill in dataset with a value"));
        }
        Ok(Self {
            project,
            dataset,
            mode: TableCreateMode::default(),
        })
    }

    /// Change the table creation mode
    #[must_use]
    pub const fn with_mode(mut self, mode: TableCreateMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Three-line banner comment, upper-cased
#[must_use]
pub fn create_heading(name: &str, suffix: &str) -> String {
    let name = name.to_uppercase();
    let suffix = suffix.to_uppercase();
    let padding = "-".repeat(name.len() + 9 + suffix.len());
    format!("{padding}\n--  {name} {suffix}  --\n{padding}\n")
}

/// `CREATE SCHEMA` statement with its heading
#[must_use]
pub fn create_dataset_query(target: &SchemaTarget) -> String {
    let mut query = create_heading(&target.dataset, "dataset");
    query.push_str(&format!(
        "\tCREATE SCHEMA IF NOT EXISTS `{}.{}`;\n\n",
        target.project, target.dataset
    ));
    query
}

/// `CREATE TABLE` statement with its heading, columns in metadata order
#[must_use]
pub fn create_table_query(target: &SchemaTarget, table: &FieldMetadataTable) -> String {
    let mut query = create_heading(table.name, "table");
    query.push_str(&format!(
        "\tCREATE{} TABLE{} `{}.{}.{}`(\n",
        target.mode.replace_clause(),
        target.mode.exists_clause(),
        target.project,
        target.dataset,
        table.name
    ));
    for field in table.fields {
        query.push_str(&format!("\t\t{} {},\n", field.target, field.target_type));
    }
    query.push_str("\t);\n\n");
    query
}

/// Full script for `tables`
#[must_use]
pub fn generate_ddl_for(target: &SchemaTarget, tables: &[FieldMetadataTable]) -> String {
    let mut script = create_heading("create bigquery", "objects");
    script.push_str("BEGIN \n");
    script.push_str(&create_dataset_query(target));
    for table in tables {
        script.push_str(&create_table_query(target, table));
    }
    script.push_str("END \n");
    script
}

/// Full script for every warehouse table
#[must_use]
pub fn generate_ddl(target: &SchemaTarget) -> String {
    generate_ddl_for(target, ALL_TABLES)
}
