//! Database root and group resolution.
//!
//! The database root holds the default group's weeks directly; every
//! sub-directory is a named group with the same layout.
//!
//! Root resolution order:
//! 1) CLI --db (or `WPR_DB`, which clap maps onto the same flag)
//! 2) `$HOME/.wpr`
//! 3) `./.wpr` when no home directory can be determined

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::warn;

use crate::config::{Config, CONFIG_FILE};
use crate::date::CalendarDate;
use crate::error::{Error, Result};
use crate::storage;
use crate::weekly::Weekly;

/// Name of the database directory under the home directory
pub const DEFAULT_DIR_NAME: &str = ".wpr";

#[derive(Debug, Clone)]
pub struct Database {
    root: PathBuf,
}

impl Database {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Database at the explicit path, or at the default location.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        match explicit {
            Some(path) => Self::new(path),
            None => Self::new(default_root()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Load `config.toml`, writing a default one first if it is missing.
    pub fn load_config(&self) -> Result<Config> {
        let path = self.config_path();
        if path.exists() {
            return Config::load(&path);
        }
        let config = Config::default();
        if let Err(err) = storage::ensure_dir(&self.root).and_then(|()| config.save(&path)) {
            warn!(path = %path.display(), "could not write default config: {err}");
        }
        Ok(config)
    }

    /// Working directory for a group, the root itself when `group` is `None`.
    pub fn group_dir(&self, group: Option<&str>) -> Result<PathBuf> {
        match group {
            Some(name) => {
                validate_group_name(name)?;
                Ok(self.root.join(name))
            }
            None => Ok(self.root.clone()),
        }
    }

    /// Open the week containing `date` in the given group.
    pub fn open_week(&self, group: Option<&str>, date: &CalendarDate) -> Result<Weekly> {
        let dir = self.group_dir(group)?;
        Weekly::open(dir, date)
    }

    /// Names of all groups, sorted. Every sub-directory of the root is a group.
    pub fn list_groups(&self) -> Result<Vec<String>> {
        storage::ensure_dir(&self.root)?;
        let mut groups = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => groups.push(name),
                Err(name) => warn!(?name, "skipping group directory with a non-UTF-8 name"),
            }
        }
        groups.sort();
        Ok(groups)
    }
}

pub fn default_root() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR_NAME))
}

/// A group name is a single path component below the root.
pub fn validate_group_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|ch: char| matches!(ch, '/' | '\\' | '\0'));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidGroup(name.to_string()))
    }
}
