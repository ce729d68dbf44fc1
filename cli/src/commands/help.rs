use labelist_core::{Flags, Result, ShellError};

use crate::context::AppContext;

/// `help [--name] <command>...`: help for each named command, or a command
/// overview when none is named.
pub(super) fn run(ctx: &mut AppContext, flags: &Flags) -> Result<()> {
    if flags.explicit_count() > 1 {
        return Err(ShellError::ExcessiveFlags(format!(
            "help command requires 1 flag, got {}",
            flags.explicit_count()
        )));
    }
    if flags.wants_help() {
        return ctx.show_help("help");
    }
    if flags.get("name").is_some_and(|v| v.is_empty()) {
        return Err(ShellError::MissingArg(
            "--name requires at least 1 str value, got 0".to_string(),
        ));
    }

    let names: Vec<String> = flags
        .root_literals()
        .iter()
        .chain(flags.literals("name").unwrap_or(&[]))
        .cloned()
        .collect();
    if names.is_empty() {
        return overview(ctx);
    }
    for name in &names {
        ctx.spec(name)?;
    }
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            ctx.console.print("");
        }
        ctx.show_help(name)?;
    }
    Ok(())
}

fn overview(ctx: &mut AppContext) -> Result<()> {
    let cells: Vec<Vec<String>> = ctx
        .lexicon
        .commands
        .iter()
        .map(|(name, spec)| {
            let description = spec
                .docs
                .as_ref()
                .map(|d| d.description.clone())
                .unwrap_or_default();
            vec![name.clone(), description]
        })
        .collect();
    ctx.console.table(&["Command", "Description"], &cells);
    ctx.console
        .print("\nUse `help <command>` for flags and examples.");
    Ok(())
}
