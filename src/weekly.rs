//! Weekly store: the tasks and memo of one Monday-started week.
//!
//! Opening a [`Weekly`] loads the week's files all-or-nothing: a checksum
//! mismatch fails the whole open, while a missing memo or checksum file is
//! tolerated. Only the current week hands out an [`Editor`]; every other week
//! is read-only.
//!
//! The memo is kept as the raw bytes of its file. Task records must be UTF-8;
//! a task file that is not fails the open rather than being re-encoded.
//!
//! Changes are persisted when the store is closed. [`Weekly::close`] must be
//! called to observe save errors; dropping a changed store still saves it but
//! can only log a failure.

use std::borrow::Cow;
use std::ops::Index;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::checksum;
use crate::date::{CalendarDate, Weekday};
use crate::error::{Error, Result};
use crate::storage::{self, WeekFiles};
use crate::task::TodoTask;

/// One week of tasks and memo, backed by files in a working directory.
#[derive(Debug)]
pub struct Weekly {
    inner: Inner,
}

#[derive(Debug)]
struct Inner {
    monday: CalendarDate,
    tasks: Vec<TodoTask>,
    memo: Vec<u8>,
    dir: PathBuf,
    dirty: bool,
}

impl Weekly {
    /// Open the week containing today.
    pub fn open_current(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::open(dir, &CalendarDate::now())
    }

    /// Open the week containing `date`, creating `dir` if needed.
    pub fn open(dir: impl Into<PathBuf>, date: &CalendarDate) -> Result<Self> {
        let dir = dir.into();
        storage::ensure_dir(&dir)?;
        let inner = Inner::load(dir, date.week_start())?;
        Ok(Self { inner })
    }

    /// Monday of the represented week.
    pub fn starting_date(&self) -> &CalendarDate {
        &self.inner.monday
    }

    /// Sunday of the represented week.
    pub fn ending_date(&self) -> CalendarDate {
        let mut sunday = self.inner.monday;
        sunday.shift_to(Weekday::Sunday);
        sunday
    }

    pub fn len(&self) -> usize {
        self.inner.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TodoTask> {
        self.inner.tasks.get(index)
    }

    pub fn tasks(&self) -> &[TodoTask] {
        &self.inner.tasks
    }

    /// The memo exactly as stored.
    pub fn memo(&self) -> &[u8] {
        &self.inner.memo
    }

    /// The memo for display; invalid UTF-8 is shown as U+FFFD.
    pub fn memo_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.inner.memo)
    }

    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    pub fn files(&self) -> WeekFiles {
        self.inner.files()
    }

    /// Whether in-memory state differs from what is on disk.
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty
    }

    /// True only for the week containing today.
    pub fn is_editable(&self) -> bool {
        self.inner.monday == CalendarDate::now().week_start()
    }

    /// Edit capability, present only for the current week.
    pub fn editor(&mut self) -> Option<Editor<'_>> {
        if self.is_editable() {
            Some(Editor {
                inner: &mut self.inner,
            })
        } else {
            None
        }
    }

    /// Like [`Weekly::editor`] but reports a past week as an error.
    pub fn edit(&mut self) -> Result<Editor<'_>> {
        let monday = self.inner.monday;
        self.editor().ok_or(Error::NotEditable(monday))
    }

    /// Write pending changes now and keep the store open.
    pub fn sync(&mut self) -> Result<()> {
        if self.inner.dirty {
            self.inner.save()?;
            self.inner.dirty = false;
        }
        Ok(())
    }

    /// Write pending changes and release the store.
    pub fn close(mut self) -> Result<()> {
        let result = if self.inner.dirty {
            self.inner.save()
        } else {
            Ok(())
        };
        self.inner.dirty = false;
        result
    }
}

impl Index<usize> for Weekly {
    type Output = TodoTask;

    fn index(&self, index: usize) -> &TodoTask {
        &self.inner.tasks[index]
    }
}

impl Drop for Weekly {
    fn drop(&mut self) {
        if !self.inner.dirty {
            return;
        }
        if let Err(err) = self.inner.save() {
            error!(
                week = %self.inner.monday,
                dir = %self.inner.dir.display(),
                "failed to save weekly on drop: {err}"
            );
        }
    }
}

impl Inner {
    fn files(&self) -> WeekFiles {
        WeekFiles::new(&self.dir, &self.monday)
    }

    fn load(dir: PathBuf, monday: CalendarDate) -> Result<Self> {
        let files = WeekFiles::new(&dir, &monday);
        let mut dirty = false;

        match storage::read_optional(&files.checksum)? {
            Some(raw) => {
                let stored = checksum::parse_stored(&String::from_utf8_lossy(&raw))
                    .ok_or_else(|| Error::UnreadableChecksum(files.checksum.clone()))?;
                let computed = checksum::files_checksum(&files.checksummed())?;
                if stored != computed {
                    return Err(Error::ChecksumMismatch {
                        path: files.checksum.clone(),
                        stored,
                        computed,
                    });
                }
            }
            None => {
                // Nothing to protect for a week that was never written.
                if storage::file_exists(&files.todolist) || storage::file_exists(&files.memo) {
                    warn!(
                        path = %files.checksum.display(),
                        "checksum file missing, it will be regenerated on save"
                    );
                    dirty = true;
                }
            }
        }

        let tasks = match storage::read_optional(&files.todolist)? {
            Some(raw) => {
                let text = String::from_utf8(raw)
                    .map_err(|_| Error::InvalidEncoding(files.todolist.clone()))?;
                parse_tasks(&text, &files.todolist)
            }
            None => Vec::new(),
        };

        let memo = match storage::read_optional(&files.memo) {
            Ok(Some(raw)) => raw,
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(path = %files.memo.display(), "ignoring unreadable memo: {err}");
                Vec::new()
            }
        };

        debug!(week = %monday, tasks = tasks.len(), memo_len = memo.len(), "weekly loaded");
        Ok(Self {
            monday,
            tasks,
            memo,
            dir,
            dirty,
        })
    }

    fn save(&self) -> Result<()> {
        let files = self.files();

        if self.memo.is_empty() {
            if storage::file_exists(&files.memo) {
                storage::remove_file(&files.memo)?;
            }
        } else {
            storage::write_atomic(&files.memo, &self.memo)?;
        }

        let mut body = Vec::new();
        for task in &self.tasks {
            task.write(&mut body)?;
            body.push(b'\n');
        }
        storage::write_atomic(&files.todolist, &body)?;

        // Checksum failures are tolerated; a stale checksum must not survive them.
        let stored = checksum::files_checksum(&files.checksummed())
            .map_err(Error::from)
            .and_then(|value| {
                storage::write_atomic(&files.checksum, checksum::format_stored(value).as_bytes())
            });
        if let Err(err) = stored {
            warn!(path = %files.checksum.display(), "failed to write checksum: {err}");
            let _ = storage::remove_file(&files.checksum);
        }

        debug!(week = %self.monday, tasks = self.tasks.len(), "weekly saved");
        Ok(())
    }
}

/// Parse records until the first malformed one or the end of input.
fn parse_tasks(text: &str, path: &Path) -> Vec<TodoTask> {
    let mut tasks = Vec::new();
    let mut cursor = text;
    while !cursor.is_empty() {
        let mut task = TodoTask::new("");
        if let Err(err) = task.read(&mut cursor) {
            warn!(
                path = %path.display(),
                record = tasks.len() + 1,
                "task list truncated at malformed record: {err}"
            );
            break;
        }
        tasks.push(task);
    }
    tasks
}

/// Mutable access to the current week. Every mutation marks the week dirty.
#[derive(Debug)]
pub struct Editor<'a> {
    inner: &'a mut Inner,
}

impl Editor<'_> {
    /// Append a task originated today and return its index.
    ///
    /// Descriptions are stored one per line, so line breaks are rejected.
    pub fn add_task(&mut self, description: impl Into<String>) -> Result<usize> {
        let description = description.into();
        if description.contains(|c: char| c == '\n' || c == '\r') {
            return Err(Error::InvalidArgument(
                "task description cannot contain line breaks".to_string(),
            ));
        }
        self.inner.tasks.push(TodoTask::new(description));
        self.inner.dirty = true;
        Ok(self.inner.tasks.len() - 1)
    }

    pub fn set_memo(&mut self, text: impl Into<String>) {
        self.inner.memo = text.into().into_bytes();
        self.inner.dirty = true;
    }

    /// Mutable access to a task. Any access counts as a change.
    pub fn task_mut(&mut self, index: usize) -> Option<&mut TodoTask> {
        let task = self.inner.tasks.get_mut(index)?;
        self.inner.dirty = true;
        Some(task)
    }

    /// Complete the task at `index` (0-based).
    ///
    /// Errors carry the 1-based task number shown to users.
    pub fn complete(&mut self, index: usize) -> Result<()> {
        let task = self
            .inner
            .tasks
            .get_mut(index)
            .ok_or(Error::TaskNotFound(index.saturating_add(1)))?;
        if task.is_completed() {
            return Err(Error::TaskAlreadyCompleted(index + 1));
        }
        task.complete_it();
        self.inner.dirty = true;
        Ok(())
    }

    /// Re-create the uncompleted tasks of `source` in this week, dated today.
    ///
    /// Only allowed while this week has no tasks. Returns the number copied.
    pub fn copy_uncompleted_from(&mut self, source: &Weekly) -> Result<usize> {
        if !self.inner.tasks.is_empty() {
            return Err(Error::WeekNotEmpty(self.inner.monday));
        }
        let copied: Vec<TodoTask> = source
            .tasks()
            .iter()
            .filter(|task| !task.is_completed())
            .map(|task| TodoTask::new(task.description()))
            .collect();
        let count = copied.len();
        if count > 0 {
            self.inner.tasks.extend(copied);
            self.inner.dirty = true;
        }
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.inner.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.tasks.is_empty()
    }
}
