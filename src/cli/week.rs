//! Read-only wpr commands: weekly, today, daily, memo, summary.

use std::borrow::Cow;

use serde::Serialize;

use crate::cli::{week_header, Context};
use crate::date::CalendarDate;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::task::TodoTask;
use crate::weekly::Weekly;

#[derive(Serialize)]
struct TaskEntry<'a> {
    id: usize,
    #[serde(flatten)]
    task: &'a TodoTask,
}

#[derive(Serialize)]
struct WeekInfo {
    week_number: u32,
    starting_date: CalendarDate,
    ending_date: CalendarDate,
    editable: bool,
}

impl WeekInfo {
    fn of(week: &Weekly) -> Self {
        Self {
            week_number: week.starting_date().week_number(),
            starting_date: *week.starting_date(),
            ending_date: week.ending_date(),
            editable: week.is_editable(),
        }
    }
}

/// Task numbers are 1-based positions in the week's list.
fn entries<'a>(
    week: &'a Weekly,
    filter: impl Fn(&TodoTask) -> bool,
) -> Vec<TaskEntry<'a>> {
    week.tasks()
        .iter()
        .enumerate()
        .filter(|&(_, task)| filter(task))
        .map(|(index, task)| TaskEntry {
            id: index + 1,
            task,
        })
        .collect()
}

fn status_label(task: &TodoTask) -> &'static str {
    if task.is_completed() {
        "DONE"
    } else {
        "WORK"
    }
}

pub fn run_weekly(ctx: &Context) -> Result<()> {
    let week = ctx.open_week()?;
    let tasks = entries(&week, |_| true);

    let mut human = HumanOutput::with_header(week_header(&week));
    for entry in &tasks {
        human.push_line(format!(
            "{}. {}|{}: {}",
            entry.id,
            entry.task.originated_on(),
            status_label(entry.task),
            entry.task.description()
        ));
    }
    if tasks.is_empty() {
        human.push_note("Nothing found.");
    }

    #[derive(Serialize)]
    struct WeeklyReport<'a> {
        #[serde(flatten)]
        week: WeekInfo,
        tasks: Vec<TaskEntry<'a>>,
    }

    let report = WeeklyReport {
        week: WeekInfo::of(&week),
        tasks,
    };
    emit_success(ctx.output, "weekly", &report, Some(&human))?;
    week.close()
}

#[derive(Serialize)]
struct DayPlan<'a> {
    date: CalendarDate,
    tasks: Vec<TaskEntry<'a>>,
}

fn active_tasks_report(
    ctx: &Context,
    command: &str,
    header: String,
    empty_note: String,
    filter: impl Fn(&TodoTask) -> bool,
) -> Result<()> {
    let week = ctx.open_week()?;
    let tasks = entries(&week, |task| !task.is_completed() && filter(task));

    let mut human = HumanOutput::new();
    if tasks.is_empty() {
        human.push_note(empty_note);
    } else {
        human.push_line(header);
        for entry in &tasks {
            human.push_line(format!(
                "{}. {}: {}",
                entry.id,
                entry.task.originated_on(),
                entry.task.description()
            ));
        }
    }

    let plan = DayPlan {
        date: ctx.date,
        tasks,
    };
    emit_success(ctx.output, command, &plan, Some(&human))?;
    week.close()
}

pub fn run_today(ctx: &Context) -> Result<()> {
    let date = ctx.date;
    active_tasks_report(
        ctx,
        "today",
        format!("Active tasks scheduled on {date}:"),
        format!("No active tasks found for {date}."),
        |task| *task.originated_on() == date,
    )
}

pub fn run_daily(ctx: &Context) -> Result<()> {
    let date = ctx.date;
    active_tasks_report(
        ctx,
        "daily",
        format!("Proposed todo plan up to {date}:"),
        format!("No active tasks found up to {date}."),
        |task| *task.originated_on() <= date,
    )
}

pub fn run_memo(ctx: &Context) -> Result<()> {
    let week = ctx.open_week()?;

    let mut human = HumanOutput::with_header(week_header(&week));
    if week.memo().is_empty() {
        human.push_note("No memo record found for this week.");
    } else {
        human.push_line("Memo text:");
        human.push_line(week.memo_text());
    }

    #[derive(Serialize)]
    struct MemoReport<'a> {
        #[serde(flatten)]
        week: WeekInfo,
        memo: Cow<'a, str>,
    }

    let report = MemoReport {
        week: WeekInfo::of(&week),
        memo: week.memo_text(),
    };
    emit_success(ctx.output, "memo", &report, Some(&human))?;
    week.close()
}

pub fn run_summary(ctx: &Context) -> Result<()> {
    let week = ctx.open_week()?;
    let completed: Vec<&str> = week
        .tasks()
        .iter()
        .filter(|task| task.is_completed())
        .map(TodoTask::description)
        .collect();
    let open: Vec<&str> = week
        .tasks()
        .iter()
        .filter(|task| !task.is_completed())
        .map(TodoTask::description)
        .collect();

    let mut human = HumanOutput::with_header(week_header(&week));
    human.push_line("Completed tasks:");
    for description in &completed {
        human.push_line(format!("- {description}"));
    }
    if completed.is_empty() && ctx.verbose() {
        human.push_line("  No completed tasks found.");
    }
    human.push_line("Uncompleted tasks or opportunities:");
    for description in &open {
        human.push_line(format!("- {description}"));
    }
    if open.is_empty() && ctx.verbose() {
        human.push_line("  No active tasks found.");
    }

    #[derive(Serialize)]
    struct Summary<'a> {
        #[serde(flatten)]
        week: WeekInfo,
        completed: Vec<&'a str>,
        uncompleted: Vec<&'a str>,
    }

    let summary = Summary {
        week: WeekInfo::of(&week),
        completed,
        uncompleted: open,
    };
    emit_success(ctx.output, "summary", &summary, Some(&human))?;
    week.close()
}
