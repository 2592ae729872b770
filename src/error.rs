//! Error types for wpr
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, bad date, unknown task)
//! - 3: Blocked by policy (editing a past week, re-completing a task)
//! - 4: Operation failed (I/O error, corrupted database)

use std::path::PathBuf;
use thiserror::Error;

use crate::date::CalendarDate;

/// Exit codes for wpr CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const POLICY_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Local, recoverable failure while parsing a date or a task record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("date is locked")]
    Locked,

    #[error("expected {expected} at offset {offset}")]
    Unexpected { expected: &'static str, offset: usize },

    #[error("no such calendar day: {0}")]
    NoSuchDay(String),

    #[error("unknown task status '{0}' (expected A or C)")]
    BadStatus(char),

    #[error("trailing input after date: '{0}'")]
    TrailingInput(String),
}

/// Main error type for wpr operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot parse the date of '{input}': {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: ParseError,
    },

    #[error("Future dates are not supported: {0}")]
    FutureDate(CalendarDate),

    #[error("Wrong task id number: {0}")]
    TaskNotFound(usize),

    #[error("Invalid group name: {0}")]
    InvalidGroup(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Policy blocks (exit code 3)
    #[error("Cannot edit the week started on {0}: only the current week is editable")]
    NotEditable(CalendarDate),

    #[error("Cannot complete already completed task (id = {0})")]
    TaskAlreadyCompleted(usize),

    #[error("The week started on {0} already has tasks")]
    WeekNotEmpty(CalendarDate),

    // Operation failures (exit code 4)
    #[error("Checksum mismatch in {path}: stored {stored}, computed {computed}")]
    ChecksumMismatch {
        path: PathBuf,
        stored: u32,
        computed: u32,
    },

    #[error("Unreadable checksum file {0}")]
    UnreadableChecksum(PathBuf),

    #[error("Task file is not valid UTF-8: {0}")]
    InvalidEncoding(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidArgument(_)
            | Error::InvalidDate { .. }
            | Error::FutureDate(_)
            | Error::TaskNotFound(_)
            | Error::InvalidGroup(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            // Policy blocks
            Error::NotEditable(_) | Error::TaskAlreadyCompleted(_) | Error::WeekNotEmpty(_) => {
                exit_codes::POLICY_BLOCKED
            }

            // Operation failures
            Error::ChecksumMismatch { .. }
            | Error::UnreadableChecksum(_)
            | Error::InvalidEncoding(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for the JSON error envelope
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::InvalidDate { input, source } => Some(serde_json::json!({
                "input": input,
                "reason": source.to_string(),
            })),
            Error::FutureDate(date) => Some(serde_json::json!({ "date": date.to_string() })),
            Error::TaskNotFound(id) | Error::TaskAlreadyCompleted(id) => {
                Some(serde_json::json!({ "id": id }))
            }
            Error::NotEditable(monday) | Error::WeekNotEmpty(monday) => {
                Some(serde_json::json!({ "week_start": monday.to_string() }))
            }
            Error::ChecksumMismatch {
                path,
                stored,
                computed,
            } => Some(serde_json::json!({
                "path": path.to_string_lossy(),
                "stored": stored,
                "computed": computed,
            })),
            Error::UnreadableChecksum(path) | Error::InvalidEncoding(path) => {
                Some(serde_json::json!({ "path": path.to_string_lossy() }))
            }
            Error::InvalidConfig(message) => Some(serde_json::json!({ "message": message })),
            Error::InvalidGroup(name) => {
                Some(serde_json::json!({ "group": name }))
            }
            _ => None,
        }
    }
}

/// Result type alias for wpr operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let today = CalendarDate::now();
        assert_eq!(Error::TaskNotFound(3).exit_code(), exit_codes::USER_ERROR);
        assert_eq!(Error::FutureDate(today).exit_code(), exit_codes::USER_ERROR);
        assert_eq!(Error::NotEditable(today).exit_code(), exit_codes::POLICY_BLOCKED);
        assert_eq!(
            Error::TaskAlreadyCompleted(1).exit_code(),
            exit_codes::POLICY_BLOCKED
        );
        assert_eq!(
            Error::UnreadableChecksum(PathBuf::from("x.checksum")).exit_code(),
            exit_codes::OPERATION_FAILED
        );
    }

    #[test]
    fn invalid_date_details_keep_the_reason() {
        let err = Error::InvalidDate {
            input: "2021-02-30".to_string(),
            source: ParseError::NoSuchDay("2021-02-30".to_string()),
        };
        let details = err.details().unwrap();
        assert_eq!(details["input"], "2021-02-30");
        assert!(details["reason"].as_str().unwrap().contains("no such calendar day"));
    }
}
