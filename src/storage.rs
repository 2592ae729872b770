//! Storage layer for wpr
//!
//! Every week lives in its group directory as three sibling files sharing the
//! week's Monday as basename:
//!
//! ```text
//! ~/.wpr/                      # Database root
//!   config.toml                # Optional configuration
//!   2011-01-24.todolist        # Task records, one per line
//!   2011-01-24.memo            # Free-text memo, raw bytes
//!   2011-01-24.checksum        # CRC-32 of memo ++ todolist, decimal
//!   work/                      # A group: same layout, separate weeks
//!     2011-01-24.todolist
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::date::CalendarDate;
use crate::error::Result;

pub const EXT_TODOLIST: &str = "todolist";
pub const EXT_MEMO: &str = "memo";
pub const EXT_CHECKSUM: &str = "checksum";

/// Paths of the three files backing one week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekFiles {
    pub todolist: PathBuf,
    pub memo: PathBuf,
    pub checksum: PathBuf,
}

impl WeekFiles {
    pub fn new(dir: &Path, monday: &CalendarDate) -> Self {
        let basename = monday.to_string();
        let file = |ext: &str| dir.join(format!("{basename}.{ext}"));
        Self {
            todolist: file(EXT_TODOLIST),
            memo: file(EXT_MEMO),
            checksum: file(EXT_CHECKSUM),
        }
    }

    /// The memo and task files, in checksum order.
    pub fn checksummed(&self) -> [&Path; 2] {
        [&self.memo, &self.todolist]
    }
}

// =========================================================================
// Filesystem helpers
// =========================================================================

/// Create a directory and its parents if they are missing.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

/// Delete a file. Returns `false` if it was already gone.
pub fn remove_file(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Read a whole file, `None` if it does not exist.
///
/// An existing empty file yields `Some(vec![])`; any other failure is an error.
pub fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Replace a file's contents atomically (temp file in the same directory, then rename).
///
/// Readers never observe a half-written file.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;

    Ok(())
}
