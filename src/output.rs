//! Shared output formatting for wpr CLI commands.

use serde::Serialize;

use crate::error::Result;

pub const SCHEMA_VERSION: &str = "wpr.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
    pub verbose: bool,
}

/// Human-readable rendering of a command result.
#[derive(Debug, Clone, Default)]
pub struct HumanOutput {
    header: Option<String>,
    lines: Vec<String>,
    notes: Vec<String>,
    warnings: Vec<String>,
}

impl HumanOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(header: impl Into<String>) -> Self {
        Self {
            header: Some(header.into()),
            ..Self::default()
        }
    }

    pub fn push_line(&mut self, value: impl Into<String>) {
        self.lines.push(value.into());
    }

    /// Informational message, shown only in verbose mode.
    pub fn push_note(&mut self, value: impl Into<String>) {
        self.notes.push(value.into());
    }

    /// Printed to stderr, also in quiet mode.
    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let warnings = human.map(|h| h.warnings.clone()).unwrap_or_default();

        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            warnings: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            warnings,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let Some(human) = human else {
        return Ok(());
    };
    for warning in &human.warnings {
        eprintln!("warning: {warning}");
    }
    if options.quiet {
        return Ok(());
    }
    let text = format_human(human, options.verbose);
    if !text.is_empty() {
        println!("{text}");
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &crate::error::Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    let hint = next_steps.first().map(|step| step.as_str());
    if json {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            message: &'a str,
            code: i32,
            kind: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<serde_json::Value>,
        }

        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: ErrorBody<'a>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorBody {
                message: &err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
                details: err.details(),
            },
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput, verbose: bool) -> String {
    let mut lines = Vec::new();
    if let Some(header) = &output.header {
        lines.push(header.clone());
    }
    lines.extend(output.lines.iter().cloned());
    if verbose {
        lines.extend(output.notes.iter().cloned());
    }
    lines.join("\n")
}

/// Options that consume the following argument.
const VALUE_OPTIONS: [&str; 6] = ["-d", "--date", "-b", "--db", "-g", "--group"];

pub fn infer_command_name_from_args() -> String {
    infer_command_name(std::env::args().skip(1))
}

fn infer_command_name(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if VALUE_OPTIONS.contains(&arg.as_str()) {
            args.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        return arg;
    }
    "wpr".to_string()
}

fn error_kind(err: &crate::error::Error) -> &'static str {
    match err.exit_code() {
        2 => "user_error",
        3 => "policy_blocked",
        _ => "operation_failed",
    }
}

fn error_next_steps(err: &crate::error::Error) -> Vec<String> {
    use crate::error::Error;

    match err {
        Error::ChecksumMismatch { .. } | Error::UnreadableChecksum(_) => vec![
            "check the .todolist file manually, or remove the .checksum or .memo file of this week to let wpr rebuild it"
                .to_string(),
        ],
        Error::InvalidEncoding(_) => vec![
            "convert the .todolist file of this week to UTF-8"
                .to_string(),
        ],
        Error::NotEditable(_) => vec!["only the current week can be modified".to_string()],
        Error::TaskNotFound(_) => vec!["wpr weekly".to_string()],
        Error::WeekNotEmpty(_) => vec!["wpr weekly".to_string()],
        Error::InvalidConfig(_) => vec!["fix config.toml then retry".to_string()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn infer_skips_options_and_their_values() {
        assert_eq!(infer_command_name(args(&["weekly"])), "weekly");
        assert_eq!(
            infer_command_name(args(&["--date", "2011-01-26", "-v", "today"])),
            "today"
        );
        assert_eq!(
            infer_command_name(args(&["-g", "work", "--db", "/tmp/x", "add", "task"])),
            "add"
        );
        assert_eq!(infer_command_name(args(&["--json"])), "wpr");
    }

    #[test]
    fn notes_only_in_verbose_mode() {
        let mut out = HumanOutput::with_header("Week 5 - 2011-01-24...2011-01-30:");
        out.push_line("1. 2011-01-26|WORK: call");
        out.push_note("Nothing else found.");

        assert_eq!(
            format_human(&out, false),
            "Week 5 - 2011-01-24...2011-01-30:\n1. 2011-01-26|WORK: call"
        );
        assert!(format_human(&out, true).ends_with("Nothing else found."));
    }

    #[test]
    fn empty_output_formats_to_empty_string() {
        assert_eq!(format_human(&HumanOutput::new(), true), "");
    }
}
