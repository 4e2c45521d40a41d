// ABOUTME: Static field metadata tables mapping vendor source paths to warehouse columns
// ABOUTME: Shared by the transform projection and the warehouse DDL generator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Field Metadata
//!
//! Each output table has one declarative allow-list. A flattened source key
//! that is not listed is dropped during projection. The same tables feed the
//! schema generator, so the columns a transform can emit and the columns the
//! warehouse declares never drift apart.

use std::fmt;

use self::WarehouseType::{Bool, Date, Float64, Int64, String as Str, Time, Timestamp};
use crate::constants::tables;

/// Warehouse column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarehouseType {
    /// Free text
    String,
    /// Calendar date
    Date,
    /// Date and time without zone
    Timestamp,
    /// Time of day
    Time,
    /// 64-bit integer
    Int64,
    /// 64-bit float
    Float64,
    /// Boolean
    Bool,
}

impl WarehouseType {
    /// Column type keyword used in DDL statements
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Date => "DATE",
            Self::Timestamp => "TIMESTAMP",
            Self::Time => "TIME",
            Self::Int64 => "INT64",
            Self::Float64 => "FLOAT64",
            Self::Bool => "BOOL",
        }
    }
}

impl fmt::Display for WarehouseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One allow-listed source field and the column it lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Dotted path in the flattened source record
    pub source: &'static str,
    /// Output column name
    pub target: &'static str,
    /// Output column type
    pub target_type: WarehouseType,
}

const fn field(source: &'static str, target: &'static str, target_type: WarehouseType) -> FieldSpec {
    FieldSpec {
        source,
        target,
        target_type,
    }
}

/// Declarative allow-list for one output table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMetadataTable {
    /// Warehouse table name
    pub name: &'static str,
    /// Fields in column order
    pub fields: &'static [FieldSpec],
}

impl FieldMetadataTable {
    /// Column a flattened source key projects to, if it is allow-listed
    #[must_use]
    pub fn target_for(&self, source: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|spec| spec.source == source)
            .map(|spec| spec.target)
    }

    /// Whether the table declares an output column with this name
    #[must_use]
    pub fn has_column(&self, target: &str) -> bool {
        self.fields.iter().any(|spec| spec.target == target)
    }
}

/// Activities logged in the daily summary
pub const ACTIVITY: FieldMetadataTable = FieldMetadataTable {
    name: tables::ACTIVITY,
    fields: &[
        field("user_id", "user_id", Str),
        field("date", "date", Date),
        field("processed_date", "processed_date", Timestamp),
        field("logId", "log_id", Int64),
        field("activityId", "activity_id", Int64),
        field("activityParentId", "activity_parent_id", Int64),
        field("activityParentName", "activity_parent_name", Str),
        field("name", "name", Str),
        field("description", "description", Str),
        field("calories", "calories", Int64),
        field("duration", "duration", Int64),
        field("steps", "steps", Int64),
        field("hasActiveZoneMinutes", "has_active_zone_minutes", Bool),
        field("hasStartTime", "has_start_time", Bool),
        field("isFavorite", "is_favorite", Bool),
        field("lastModified", "last_modified", Timestamp),
        field("startDate", "start_date", Date),
        field("startTime", "start_time", Time),
    ],
};

/// Daily goals
pub const GOALS: FieldMetadataTable = FieldMetadataTable {
    name: tables::GOALS,
    fields: &[
        field("user_id", "user_id", Str),
        field("date", "date", Date),
        field("processed_date", "processed_date", Timestamp),
        field("activeMinutes", "active_minutes", Int64),
        field("caloriesOut", "calories_out", Int64),
        field("distance", "distance", Float64),
        field("floors", "floors", Int64),
        field("steps", "steps", Int64),
    ],
};

/// Daily activity summary, including the synthetic `{activity}_distance` fields
pub const SUMMARY: FieldMetadataTable = FieldMetadataTable {
    name: tables::SUMMARY,
    fields: &[
        field("user_id", "user_id", Str),
        field("date", "date", Date),
        field("processed_date", "processed_date", Timestamp),
        field("activeScore", "active_score", Int64),
        field("steps", "steps", Int64),
        field("floors", "floors", Int64),
        field("elevation", "elevation", Float64),
        field("restingHeartRate", "resting_heart_rate", Str),
        field("caloriesOut", "calories_out", Int64),
        field("marginalCalories", "marginal_calories", Int64),
        field("activityCalories", "activity_calories", Int64),
        field("caloriesBMR", "calories_bmr", Int64),
        field("sedentaryMinutes", "sedentary_minutes", Int64),
        field("lightlyActiveMinutes", "lightly_active_minutes", Int64),
        field("fairlyActiveMinutes", "fairly_active_minutes", Int64),
        field("veryActiveMinutes", "very_active_minutes", Int64),
        field("total_distance", "total_distance", Float64),
        field("tracker_distance", "tracker_distance", Float64),
        field("loggedActivities_distance", "logged_activities_distance", Float64),
        field("veryActive_distance", "very_active_distance", Float64),
        field("moderatelyActive_distance", "moderately_active_distance", Float64),
        field("lightlyActive_distance", "lightly_active_distance", Float64),
        field("sedentaryActive_distance", "sedentary_active_distance", Float64),
        field("Run_distance", "run_distance", Float64),
    ],
};

/// First logged body weight of the day
pub const WEIGHT: FieldMetadataTable = FieldMetadataTable {
    name: tables::WEIGHT,
    fields: &[
        field("user_id", "user_id", Str),
        field("date", "date", Date),
        field("processed_date", "processed_date", Timestamp),
        field("logId", "log_id", Int64),
        field("bmi", "bmi", Float64),
        field("weight", "weight", Float64),
    ],
};

/// Sleep sessions
pub const SLEEP: FieldMetadataTable = FieldMetadataTable {
    name: tables::SLEEP,
    fields: &[
        field("user_id", "user_id", Str),
        field("dateOfSleep", "date", Date),
        field("processed_date", "processed_date", Timestamp),
        field("logId", "log_id", Int64),
        field("efficiency", "efficiency", Str),
        field("startTime", "start_time", Timestamp),
        field("endTime", "end_time", Timestamp),
        field("duration", "duration", Int64),
        field("minutesAfterWakeup", "minutes_after_wakeup", Int64),
        field("minutesAsleep", "minutes_asleep", Int64),
        field("minutesAwake", "minutes_awake", Int64),
        field("minutesToFallAsleep", "minutes_to_fall_asleep", Int64),
        field("timeInBed", "time_in_bed", Int64),
        field("infoCode", "info_code", Int64),
        field("isMainSleep", "is_main_sleep", Bool),
        field("logType", "log_type", Str),
        field("type", "type", Str),
    ],
};

/// Sleep stage entries, keyed by the parent session's log id
pub const SLEEP_DETAIL: FieldMetadataTable = FieldMetadataTable {
    name: tables::SLEEP_DETAIL,
    fields: &[
        field("logId", "log_id", Int64),
        field("dateTime", "date_time", Timestamp),
        field("level", "level", Str),
        field("seconds", "seconds", Int64),
    ],
};

/// Cardio fitness score
pub const CARDIOSCORE: FieldMetadataTable = FieldMetadataTable {
    name: tables::CARDIOSCORE,
    fields: &[
        field("user_id", "user_id", Str),
        field("dateTime", "date", Date),
        field("processed_date", "processed_date", Timestamp),
        field("value.vo2Max", "vo2_max", Str),
    ],
};

/// Daily heart rate with per-zone calories and minutes
pub const HEART_RATE: FieldMetadataTable = FieldMetadataTable {
    name: tables::HEART_RATE,
    fields: &[
        field("dateTime", "date", Date),
        field("user_id", "user_id", Str),
        field("processed_date", "processed_date", Timestamp),
        field("value.restingHeartRate", "resting_heart_rate", Int64),
        field("out_of_range_calories", "out_of_range_calories", Float64),
        field("out_of_range_minutes", "out_of_range_minutes", Int64),
        field("fat_burn_calories", "fat_burn_calories", Float64),
        field("fat_burn_minutes", "fat_burn_minutes", Int64),
        field("cardio_calories", "cardio_calories", Float64),
        field("cardio_minutes", "cardio_minutes", Int64),
        field("peak_calories", "peak_calories", Float64),
        field("peak_minutes", "peak_minutes", Int64),
    ],
};

/// One row per TCX trackpoint with lap and activity fields merged in
pub const ACTIVITY_DETAIL: FieldMetadataTable = FieldMetadataTable {
    name: tables::ACTIVITY_DETAIL,
    fields: &[
        field("date", "date", Date),
        field("user_id", "user_id", Str),
        field("log_id", "log_id", Int64),
        field("processed_date", "processed_date", Timestamp),
        field("Time", "date_time", Timestamp),
        field("point_order", "point_order", Int64),
        field("Sport", "sport", Str),
        field("lap_number", "lap_number", Int64),
        field("TotalTimeSeconds", "total_time_seconds", Float64),
        field("DistanceMeters", "distance_meters", Float64),
        field("Calories", "calories", Int64),
        field("Intensity", "intensity", Str),
        field("TriggerMethod", "trigger_method", Str),
        field("LatitudeDegrees", "latitude", Float64),
        field("LongitudeDegrees", "longitude", Float64),
        field("AltitudeMeters", "altitude_meters", Float64),
        field("HeartRateBpm", "heart_rate_bpm", Int64),
    ],
};

/// Processing log, one row per transformed file
pub const FILES_PROCESSED: FieldMetadataTable = FieldMetadataTable {
    name: tables::FILES_PROCESSED,
    fields: &[
        field("date", "date", Date),
        field("user_id", "user_id", Str),
        field("processed_date", "processed_date", Timestamp),
        field("api_endpoint", "api_endpoint", Str),
        field("file_processed", "file_processed", Str),
    ],
};

/// Every output table, in DDL generation order
pub const ALL_TABLES: &[FieldMetadataTable] = &[
    ACTIVITY,
    GOALS,
    SUMMARY,
    HEART_RATE,
    WEIGHT,
    FILES_PROCESSED,
    CARDIOSCORE,
    SLEEP,
    SLEEP_DETAIL,
    ACTIVITY_DETAIL,
];

/// Look up a table by warehouse name
#[must_use]
pub fn table_metadata(name: &str) -> Option<&'static FieldMetadataTable> {
    ALL_TABLES.iter().find(|table| table.name == name)
}
