//! Todo task records.
//!
//! One record per line in a week's `.todolist` file:
//!
//! ```text
//! 2011-01-26:A:call the plumber
//! 2011-01-27:C:write weekly report: draft
//! ```
//!
//! The status character is `A` (active) or `C` (completed). The description is
//! everything after the second colon up to the end of the line, colons
//! included.

use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

use crate::date::CalendarDate;
use crate::error::ParseError;

const STATUS_ACTIVE: char = 'A';
const STATUS_COMPLETED: char = 'C';
const FIELD_SEPARATOR: char = ':';

/// A single todo item attached to the day it was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoTask {
    originated_on: CalendarDate,
    completed: bool,
    description: String,
}

impl TodoTask {
    /// New active task originated today.
    pub fn new(description: impl Into<String>) -> Self {
        let mut originated_on = CalendarDate::now();
        originated_on.lock();
        Self {
            originated_on,
            completed: false,
            description: description.into(),
        }
    }

    pub fn originated_on(&self) -> &CalendarDate {
        &self.originated_on
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Mark the task completed. Refusing to complete twice is up to the
    /// caller, see [`crate::weekly::Editor::complete`].
    pub fn complete_it(&mut self) {
        self.completed = true;
    }

    fn status_char(&self) -> char {
        if self.completed {
            STATUS_COMPLETED
        } else {
            STATUS_ACTIVE
        }
    }

    /// Write the record without a line terminator.
    pub fn write<W: Write + ?Sized>(&self, sink: &mut W) -> io::Result<()> {
        self.originated_on.write(sink)?;
        write!(
            sink,
            "{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
            self.status_char(),
            self.description
        )
    }

    /// Parse one record from the front of `input`, consuming its line
    /// terminator if there is one.
    ///
    /// On failure neither `self` nor the cursor changes.
    pub fn read(&mut self, input: &mut &str) -> Result<(), ParseError> {
        let start_len = input.len();
        let mut cursor = *input;

        let mut originated_on = CalendarDate::from_naive(self.originated_on.as_naive());
        originated_on.read(&mut cursor)?;
        let offset = |cursor: &str| start_len - cursor.len();

        cursor = expect_separator(cursor, offset(cursor))?;
        let mut chars = cursor.chars();
        let completed = match chars.next() {
            Some(STATUS_ACTIVE) => false,
            Some(STATUS_COMPLETED) => true,
            Some(other) => return Err(ParseError::BadStatus(other)),
            None => {
                return Err(ParseError::Unexpected {
                    expected: "status",
                    offset: offset(cursor),
                })
            }
        };
        cursor = chars.as_str();
        cursor = expect_separator(cursor, offset(cursor))?;

        let (description, rest) = match cursor.find('\n') {
            Some(end) => (&cursor[..end], &cursor[end + 1..]),
            None => (cursor, ""),
        };

        originated_on.lock();
        self.originated_on = originated_on;
        self.completed = completed;
        self.description = description.to_string();
        *input = rest;
        Ok(())
    }
}

fn expect_separator(cursor: &str, offset: usize) -> Result<&str, ParseError> {
    cursor
        .strip_prefix(FIELD_SEPARATOR)
        .ok_or(ParseError::Unexpected {
            expected: "':'",
            offset,
        })
}

impl fmt::Display for TodoTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
            self.originated_on,
            self.status_char(),
            self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<TodoTask, ParseError> {
        let mut task = TodoTask::new("");
        let mut cursor = line;
        task.read(&mut cursor)?;
        Ok(task)
    }

    #[test]
    fn new_task_is_active_and_dated_today() {
        let task = TodoTask::new("buy milk");
        assert_eq!(*task.originated_on(), CalendarDate::now());
        assert!(task.originated_on().is_locked());
        assert!(!task.is_completed());
        assert_eq!(task.description(), "buy milk");
    }

    #[test]
    fn complete_it_is_one_way() {
        let mut task = TodoTask::new("x");
        task.complete_it();
        assert!(task.is_completed());
        task.complete_it();
        assert!(task.is_completed());
    }

    #[test]
    fn write_uses_record_format() {
        let mut task = parse("2011-01-26:A:call the plumber").expect("parse");
        let mut out = Vec::new();
        task.write(&mut out).expect("write");
        assert_eq!(out, b"2011-01-26:A:call the plumber");

        task.complete_it();
        assert_eq!(task.to_string(), "2011-01-26:C:call the plumber");
    }

    #[test]
    fn read_keeps_colons_in_description() {
        let task = parse("2011-01-27:C:report: draft: v2\n").expect("parse");
        assert_eq!(task.originated_on().to_string(), "2011-01-27");
        assert!(task.originated_on().is_locked());
        assert!(task.is_completed());
        assert_eq!(task.description(), "report: draft: v2");
    }

    #[test]
    fn read_consumes_one_line() {
        let mut task = TodoTask::new("");
        let mut cursor = "2011-01-26:A:first\n2011-01-27:C:second\n";
        task.read(&mut cursor).expect("first");
        assert_eq!(task.description(), "first");
        assert_eq!(cursor, "2011-01-27:C:second\n");

        task.read(&mut cursor).expect("second");
        assert_eq!(task.description(), "second");
        assert!(cursor.is_empty());
    }

    #[test]
    fn read_accepts_last_line_without_newline() {
        let task = parse("2011-01-26:A:no newline").expect("parse");
        assert_eq!(task.description(), "no newline");
    }

    #[test]
    fn read_accepts_empty_description() {
        let task = parse("2011-01-26:A:\n").expect("parse");
        assert_eq!(task.description(), "");
    }

    #[test]
    fn read_rejects_unknown_status() {
        assert_eq!(parse("2011-01-26:X:oops"), Err(ParseError::BadStatus('X')));
        assert_eq!(parse("2011-01-26:a:oops"), Err(ParseError::BadStatus('a')));
    }

    #[test]
    fn read_rejects_missing_separators() {
        assert!(parse("2011-01-26A:oops").is_err());
        assert!(parse("2011-01-26:Aoops").is_err());
        assert!(parse("2011-01-26:").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn failed_read_leaves_task_unchanged() {
        let mut task = parse("2011-01-26:A:keep me").expect("parse");
        let before = task.clone();
        let mut cursor = "2011-02-30:C:bad date";
        assert!(task.read(&mut cursor).is_err());
        assert_eq!(task, before);
        assert_eq!(cursor, "2011-02-30:C:bad date");
    }
}
