//! wpr - Weekly Plans and Reports CLI
//!
//! Keeps a todo list and a memo for every week; past weeks stay read-only.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wpr::cli::Cli;
use wpr::output::{emit_error, infer_command_name_from_args};

fn main() {
    let command = infer_command_name_from_args();
    let cli = Cli::parse();

    // Tracing is opt-in via RUST_LOG; --verbose turns on wpr debug logs.
    // Ignore invalid/huge filters so startup stays robust.
    let default_filter = if cli.verbose { "wpr=debug" } else { "off" };
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let json = cli.json;
    if let Err(err) = cli.run() {
        let _ = emit_error(&command, &err, json);
        std::process::exit(err.exit_code());
    }
}
