#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;
use wpr::checksum;
use wpr::date::CalendarDate;
use wpr::storage::WeekFiles;

/// A throw-away wpr database.
pub struct TestDb {
    dir: TempDir,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The wpr binary pointed at this database.
    pub fn wpr(&self) -> Command {
        let mut cmd = Command::cargo_bin("wpr").expect("binary");
        cmd.env_remove("WPR_DB")
            .env_remove("RUST_LOG")
            .arg("--db")
            .arg(self.path());
        cmd
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn week_files(&self, monday: &CalendarDate) -> WeekFiles {
        WeekFiles::new(self.path(), monday)
    }

    /// Write a week directly, with a valid checksum.
    pub fn write_week(
        &self,
        monday: &CalendarDate,
        todolist: &str,
        memo: Option<&str>,
    ) -> std::io::Result<WeekFiles> {
        let files = self.week_files(monday);
        fs::write(&files.todolist, todolist)?;
        if let Some(memo) = memo {
            fs::write(&files.memo, memo)?;
        }
        let value = checksum::files_checksum(&files.checksummed())?;
        fs::write(&files.checksum, checksum::format_stored(value))?;
        Ok(files)
    }
}

pub fn current_monday() -> CalendarDate {
    CalendarDate::now().week_start()
}

pub fn previous_monday() -> CalendarDate {
    let mut monday = current_monday();
    monday.shift(-7);
    monday
}
