//! Command-line interface for wpr
//!
//! This module defines the CLI structure using clap derive macros.
//! Read-only commands live in `week`, modifying commands in `edit`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::database::Database;
use crate::date::{CalendarDate, Weekday};
use crate::error::{Error, Result};
use crate::output::OutputOptions;
use crate::weekly::Weekly;

mod edit;
mod groups;
mod week;

/// wpr - Weekly Plans and Reports
///
/// Keeps a todo list and a memo per week. Only the current week can be
/// modified; past weeks are kept as a read-only record.
#[derive(Parser, Debug)]
#[command(name = "wpr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the weekly database (defaults to ~/.wpr)
    #[arg(short = 'b', long = "db", global = true, env = "WPR_DB")]
    pub db: Option<PathBuf>,

    /// Weekly group to use
    #[arg(short, long, global = true)]
    pub group: Option<String>,

    /// Target date, today or in the past (YYYY-MM-DD)
    #[arg(short, long, global = true, conflicts_with = "previous_week")]
    pub date: Option<String>,

    /// Select the previous week instead of a date
    #[arg(short, long, global = true)]
    pub previous_week: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print informational messages
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print all tasks of the week
    Weekly,

    /// Print active tasks created on the selected day
    Today,

    /// Print active tasks created up to the selected day
    Daily,

    /// Print the week's memo
    Memo,

    /// Replace the week's memo (an empty text removes it)
    SetMemo {
        /// Memo text
        text: Option<String>,
    },

    /// Add a task for today
    Add {
        /// Task description
        description: String,
    },

    /// Mark a task completed
    Complete {
        /// Task number as printed by `weekly`
        id: usize,
    },

    /// Print the weekly report: completed and open tasks
    Summary,

    /// List groups
    Groups,

    /// Copy uncompleted tasks from the previous week into the empty current week
    CopyFromThePast,
}

/// Everything a command needs, resolved from flags, environment and config.
pub(crate) struct Context {
    pub db: Database,
    pub config: Config,
    pub group: Option<String>,
    pub date: CalendarDate,
    pub output: OutputOptions,
}

impl Context {
    /// Week containing the selected date.
    pub fn open_week(&self) -> Result<Weekly> {
        self.open_week_at(&self.date)
    }

    pub fn open_week_at(&self, date: &CalendarDate) -> Result<Weekly> {
        self.db.open_week(self.group.as_deref(), date)
    }

    pub fn verbose(&self) -> bool {
        self.output.verbose
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let ctx = self.context()?;
        tracing::debug!(
            db = %ctx.db.root().display(),
            group = ?ctx.group,
            date = %ctx.date,
            "resolved context"
        );

        match self.command {
            Commands::Weekly => week::run_weekly(&ctx),
            Commands::Today => week::run_today(&ctx),
            Commands::Daily => week::run_daily(&ctx),
            Commands::Memo => week::run_memo(&ctx),
            Commands::Summary => week::run_summary(&ctx),
            Commands::SetMemo { text } => edit::run_set_memo(&ctx, text.unwrap_or_default()),
            Commands::Add { description } => edit::run_add(&ctx, description),
            Commands::Complete { id } => edit::run_complete(&ctx, id),
            Commands::CopyFromThePast => edit::run_copy_from_the_past(&ctx),
            Commands::Groups => groups::run(&ctx),
        }
    }

    fn context(&self) -> Result<Context> {
        let db = Database::resolve(self.db.as_deref());
        let config = db.load_config()?;
        let group = self.group.clone().or_else(|| config.default_group.clone());
        let date = resolve_date(self.date.as_deref(), self.previous_week)?;
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
            verbose: self.verbose || config.verbose,
        };
        Ok(Context {
            db,
            config,
            group,
            date,
            output,
        })
    }
}

/// Target date: `--date`, the Sunday before this week, or today.
pub fn resolve_date(date: Option<&str>, previous_week: bool) -> Result<CalendarDate> {
    let today = CalendarDate::now();
    if let Some(raw) = date {
        let parsed: CalendarDate = raw.parse().map_err(|source| Error::InvalidDate {
            input: raw.to_string(),
            source,
        })?;
        if today < parsed {
            return Err(Error::FutureDate(parsed));
        }
        return Ok(parsed);
    }
    if previous_week {
        let mut sunday = today;
        sunday.shift_to(Weekday::Monday);
        sunday.shift(-1);
        return Ok(sunday);
    }
    Ok(today)
}

/// `Week <n> - <monday>...<sunday>:`
pub(crate) fn week_header(week: &Weekly) -> String {
    let monday = week.starting_date();
    format!(
        "Week {} - {}...{}:",
        monday.week_number(),
        monday,
        week.ending_date()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_date_defaults_to_today() {
        assert_eq!(resolve_date(None, false).unwrap(), CalendarDate::now());
    }

    #[test]
    fn resolve_date_parses_past_dates() {
        let date = resolve_date(Some("2011-01-26"), false).unwrap();
        assert_eq!(date.to_string(), "2011-01-26");
    }

    #[test]
    fn resolve_date_rejects_future() {
        let mut future = CalendarDate::now();
        future.shift(1);
        let err = resolve_date(Some(&future.to_string()), false).unwrap_err();
        assert!(matches!(err, Error::FutureDate(_)));
    }

    #[test]
    fn resolve_date_rejects_garbage() {
        for raw in ["2021-02-30", "yesterday", "2021-01-01x"] {
            let err = resolve_date(Some(raw), false).unwrap_err();
            assert!(matches!(err, Error::InvalidDate { .. }), "{raw}");
        }
    }

    #[test]
    fn previous_week_is_last_sunday() {
        let date = resolve_date(None, true).unwrap();
        assert_eq!(date.week_day(), Weekday::Sunday);
        assert_eq!(date.days_to(&CalendarDate::now().week_start()), 1);
    }

    #[test]
    fn cli_rejects_date_with_previous_week() {
        let parsed = Cli::try_parse_from(["wpr", "-d", "2011-01-26", "-p", "weekly"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn cli_parses_kebab_case_commands() {
        let cli = Cli::try_parse_from(["wpr", "set-memo", "hello"]).unwrap();
        assert!(matches!(cli.command, Commands::SetMemo { text: Some(ref t) } if t == "hello"));

        let cli = Cli::try_parse_from(["wpr", "-g", "work", "copy-from-the-past"]).unwrap();
        assert!(matches!(cli.command, Commands::CopyFromThePast));
        assert_eq!(cli.group.as_deref(), Some("work"));
    }
}
