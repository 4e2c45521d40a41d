// ABOUTME: Vendor API endpoints, date formats, table names, and environment variable names
// ABOUTME: Static values shared by the extraction and transform phases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Hardcoded values only. Environment lookups live in the root crate's
//! `config` module and use the variable names declared in [`env_config`].

/// Vendor API endpoints
pub mod endpoints {
    /// Base URL of the Fitbit Web API
    pub const FITBIT_API_BASE: &str = "https://api.fitbit.com";
    /// OAuth2 token endpoint (refresh and code exchange)
    pub const FITBIT_TOKEN_URL: &str = "https://api.fitbit.com/oauth2/token";
    /// OAuth2 authorization endpoint
    pub const FITBIT_AUTHORIZATION_URL: &str = "https://www.fitbit.com/oauth2/authorize";
}

/// Date and time formats
pub mod formats {
    /// Date segment of stored response folders
    pub const FOLDER_DATE_FORMAT: &str = "%Y%m%d";
    /// Date format sent to the vendor and written to rows
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
    /// Canonical timestamp format of cleaned datetime fields
    pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// OAuth scopes accepted by the vendor
pub mod oauth {
    /// Every scope the authorization URL builder accepts
    pub const POSSIBLE_SCOPES: &[&str] = &[
        "activity",
        "cardio_fitness",
        "electrocardiogram",
        "heartrate",
        "location",
        "nutrition",
        "oxygen_saturation",
        "profile",
        "respiratory_rate",
        "settings",
        "sleep",
        "social",
        "temperature",
        "weight",
    ];

    /// Minimum PKCE code verifier length
    pub const CODE_VERIFIER_MIN_LEN: usize = 43;
    /// Maximum PKCE code verifier length
    pub const CODE_VERIFIER_MAX_LEN: usize = 128;
}

/// Warehouse table names
pub mod tables {
    /// Logged activities
    pub const ACTIVITY: &str = "activity";
    /// Daily activity goals
    pub const GOALS: &str = "goals";
    /// Daily activity summary
    pub const SUMMARY: &str = "summary";
    /// Heart rate zones per day
    pub const HEART_RATE: &str = "heart_rate";
    /// Body weight logs
    pub const WEIGHT: &str = "weight";
    /// Audit trail of transformed files
    pub const FILES_PROCESSED: &str = "files_processed";
    /// Cardio fitness score
    pub const CARDIOSCORE: &str = "cardioscore";
    /// Sleep log summaries
    pub const SLEEP: &str = "sleep";
    /// Sleep stage intervals
    pub const SLEEP_DETAIL: &str = "sleep_detail";
    /// TCX trackpoints of one activity
    pub const ACTIVITY_DETAIL: &str = "activity_detail";
}

/// Row columns written by augmentation
pub mod columns {
    /// Run date the data was requested for
    pub const DATE: &str = "date";
    /// Vendor user id owning the row
    pub const USER_ID: &str = "user_id";
    /// Timestamp of the transform run
    pub const PROCESSED_DATE: &str = "processed_date";
    /// Vendor log identifier
    pub const LOG_ID: &str = "log_id";
    /// Zero-based lap index within an activity
    pub const LAP_NUMBER: &str = "lap_number";
    /// Trackpoint position within its lap
    pub const POINT_ORDER: &str = "point_order";
    /// Endpoint that produced a processed file
    pub const API_ENDPOINT: &str = "api_endpoint";
    /// Path of a processed file
    pub const FILE_PROCESSED: &str = "file_processed";
}

/// Environment variable names read by `ExtractConfig::from_env`
pub mod env_config {
    /// Overrides the Web API base URL
    pub const API_BASE_URL: &str = "FITBIT_API_BASE_URL";
    /// Overrides the OAuth2 token endpoint
    pub const TOKEN_URL: &str = "FITBIT_TOKEN_URL";
    /// Overrides the OAuth2 authorization endpoint
    pub const AUTHORIZATION_URL: &str = "FITBIT_AUTHORIZATION_URL";
    /// Root folder of stored raw responses
    pub const DATA_DIR: &str = "FITBIT_DATA_DIR";
    /// Folder holding the NDJSON warehouse tables
    pub const WAREHOUSE_DIR: &str = "FITBIT_WAREHOUSE_DIR";
    /// Location of the persisted token record
    pub const TOKEN_PATH: &str = "FITBIT_TOKEN_PATH";
    /// Location of the app client credentials
    pub const CREDENTIALS_PATH: &str = "FITBIT_CREDENTIALS_PATH";
    /// Retry budget for throttled or failed requests
    pub const REQUEST_RETRIES: &str = "FITBIT_REQUEST_RETRIES";
    /// Whole-request HTTP timeout in seconds
    pub const HTTP_TIMEOUT_SECS: &str = "FITBIT_HTTP_TIMEOUT_SECS";
    /// HTTP connect timeout in seconds
    pub const HTTP_CONNECT_TIMEOUT_SECS: &str = "FITBIT_HTTP_CONNECT_TIMEOUT_SECS";
}

/// Defaults applied when the environment is silent
pub mod defaults {
    /// Raw response root
    pub const DATA_DIR: &str = "local_data/data";
    /// Warehouse folder
    pub const WAREHOUSE_DIR: &str = "local_data/warehouse";
    /// Token record file
    pub const TOKEN_PATH: &str = "local_data/token.json";
    /// Client credentials file
    pub const CREDENTIALS_PATH: &str = "local_data/credentials.json";
    /// Retries after the first attempt
    pub const REQUEST_RETRIES: u32 = 5;
    /// Whole-request timeout
    pub const HTTP_TIMEOUT_SECS: u64 = 600;
    /// Connect timeout
    pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Only format the extraction phase ever requests unless a spec overrides it
    pub const RESPONSE_FORMAT: &str = "json";
}
