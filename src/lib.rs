//! wpr - Weekly Plans and Reports
//!
//! This library provides the core functionality for the wpr CLI tool:
//! a per-week todo list and memo kept as plain files, guarded by a checksum.
//!
//! # Core Concepts
//!
//! - **Calendar dates**: civil days that can be locked against re-reading
//! - **Tasks**: one line each, `YYYY-MM-DD:<A|C>:<description>`
//! - **Weeks**: Monday-started; only the current week is editable
//! - **Groups**: independent sets of weeks under one database root
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `date`: Calendar dates and weekdays
//! - `task`: Todo task records and their line format
//! - `checksum`: CRC-32 over a week's files
//! - `storage`: Week file naming and atomic file operations
//! - `weekly`: The weekly store and its editor
//! - `database`: Database root and group resolution
//! - `output`: Human and JSON output rendering

pub mod checksum;
pub mod cli;
pub mod config;
pub mod database;
pub mod date;
pub mod error;
pub mod output;
pub mod storage;
pub mod task;
pub mod weekly;

pub use error::{Error, Result};
