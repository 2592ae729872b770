//! Commands that modify the current week: add, complete, set-memo and
//! copy-from-the-past.

use std::borrow::Cow;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cli::Context;
use crate::date::CalendarDate;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::storage;
use crate::task::TodoTask;
use crate::weekly::Weekly;

/// Open the previous week relative to `week`.
fn open_previous(ctx: &Context, week: &Weekly) -> Result<Weekly> {
    let mut sunday = *week.starting_date();
    sunday.shift(-1);
    ctx.open_week_at(&sunday)
}

/// Outcome of seeding a fresh week from the previous one.
#[derive(Debug, Default)]
struct AutoCopy {
    copied: usize,
    skipped: Option<String>,
}

impl AutoCopy {
    fn report_to(&self, human: &mut HumanOutput) {
        if self.copied > 0 {
            human.push_note(format!(
                "{} uncompleted tasks copied from the previous week.",
                self.copied
            ));
        }
        if let Some(reason) = &self.skipped {
            human.push_warning(format!(
                "tasks not copied from the previous week: {reason}"
            ));
        }
    }
}

/// Open the target week for a modification, seeding a brand-new week from
/// the previous one when `auto_copy_from_past` is set.
///
/// A previous week that cannot be loaded only skips the seeding.
fn open_for_edit(ctx: &Context) -> Result<(Weekly, AutoCopy)> {
    let mut week = ctx.open_week()?;
    if !ctx.config.auto_copy_from_past
        || !week.is_editable()
        || !week.is_empty()
        || storage::file_exists(&week.files().todolist)
    {
        return Ok((week, AutoCopy::default()));
    }

    let previous = match open_previous(ctx, &week) {
        Ok(previous) => previous,
        Err(err) => {
            warn!("skipping copy from the previous week: {err}");
            let skipped = AutoCopy {
                copied: 0,
                skipped: Some(err.to_string()),
            };
            return Ok((week, skipped));
        }
    };
    let copied = week.edit()?.copy_uncompleted_from(&previous)?;
    previous.close()?;
    if copied > 0 {
        info!(copied, "seeded new week from the previous one");
    }
    Ok((
        week,
        AutoCopy {
            copied,
            skipped: None,
        },
    ))
}

#[derive(Serialize)]
struct AddedTask<'a> {
    id: usize,
    #[serde(flatten)]
    task: &'a TodoTask,
    copied_from_past: usize,
}

pub fn run_add(ctx: &Context, description: String) -> Result<()> {
    let (mut week, auto_copy) = open_for_edit(ctx)?;
    let index = week.edit()?.add_task(description)?;
    week.sync()?;
    debug!(index, "task added");

    let mut human = HumanOutput::new();
    auto_copy.report_to(&mut human);
    human.push_note("New task successfully added.");

    let report = AddedTask {
        id: index + 1,
        task: &week[index],
        copied_from_past: auto_copy.copied,
    };
    emit_success(ctx.output, "add", &report, Some(&human))?;
    week.close()
}

pub fn run_complete(ctx: &Context, id: usize) -> Result<()> {
    let index = id.checked_sub(1).ok_or(Error::TaskNotFound(id))?;
    let (mut week, auto_copy) = open_for_edit(ctx)?;
    week.edit()?.complete(index)?;
    week.sync()?;

    let mut human = HumanOutput::new();
    auto_copy.report_to(&mut human);
    human.push_note(format!("Task {id} completed: {}", week[index].description()));

    #[derive(Serialize)]
    struct Completed<'a> {
        id: usize,
        #[serde(flatten)]
        task: &'a TodoTask,
    }

    let report = Completed {
        id,
        task: &week[index],
    };
    emit_success(ctx.output, "complete", &report, Some(&human))?;
    week.close()
}

pub fn run_set_memo(ctx: &Context, text: String) -> Result<()> {
    let (mut week, auto_copy) = open_for_edit(ctx)?;
    week.edit()?.set_memo(text);
    week.sync()?;

    let mut human = HumanOutput::new();
    auto_copy.report_to(&mut human);
    if week.memo().is_empty() {
        human.push_note("Memo removed.");
    } else {
        human.push_note("Memo recorded.");
    }

    #[derive(Serialize)]
    struct MemoSet<'a> {
        week_start: CalendarDate,
        memo: Cow<'a, str>,
    }

    let report = MemoSet {
        week_start: *week.starting_date(),
        memo: week.memo_text(),
    };
    emit_success(ctx.output, "set-memo", &report, Some(&human))?;
    week.close()
}

pub fn run_copy_from_the_past(ctx: &Context) -> Result<()> {
    let mut week = ctx.open_week()?;
    let previous = open_previous(ctx, &week)?;
    let copied = week.edit()?.copy_uncompleted_from(&previous)?;
    week.sync()?;

    let mut human = HumanOutput::new();
    human.push_note(format!(
        "{copied} tasks copied from the week started on {}.",
        previous.starting_date()
    ));

    #[derive(Serialize)]
    struct CopyReport {
        week_start: CalendarDate,
        source_week_start: CalendarDate,
        copied: usize,
    }

    let report = CopyReport {
        week_start: *week.starting_date(),
        source_week_start: *previous.starting_date(),
        copied,
    };
    emit_success(ctx.output, "copy-from-the-past", &report, Some(&human))?;
    previous.close()?;
    week.close()
}
