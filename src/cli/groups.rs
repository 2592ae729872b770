use serde::Serialize;

use crate::cli::Context;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

pub fn run(ctx: &Context) -> Result<()> {
    let groups = ctx.db.list_groups()?;

    let mut human = HumanOutput::new();
    for group in &groups {
        if ctx.group.as_deref() == Some(group.as_str()) {
            human.push_line(format!("* {group}"));
        } else {
            human.push_line(format!("  {group}"));
        }
    }
    if groups.is_empty() {
        human.push_note("No groups found.");
    }

    #[derive(Serialize)]
    struct GroupList<'a> {
        groups: &'a [String],
        #[serde(skip_serializing_if = "Option::is_none")]
        selected: Option<&'a str>,
    }

    emit_success(
        ctx.output,
        "groups",
        &GroupList {
            groups: &groups,
            selected: ctx.group.as_deref(),
        },
        Some(&human),
    )
}
