//! Shell command handlers.
//!
//! Each handler checks its flags completely before touching storage or the
//! network, so a rejected statement has no side effects.

mod add;
mod ask;
mod cd;
mod clear;
mod fetch;
mod get;
mod help;
mod ls;
mod new;
mod set;

use labelist_core::{CoercedValue, CommandRegistry, Flags, Result, ShellError};

use crate::context::AppContext;

/// Registry with every built-in command.
pub fn build_registry() -> CommandRegistry<AppContext> {
    CommandRegistry::builder()
        .register("add", add::run)
        .register("ask", ask::run)
        .register("cd", cd::run)
        .register("clear", clear::run)
        .register("fetch", fetch::run)
        .register("get", get::run)
        .register("help", help::run)
        .register("ls", ls::run)
        .register("new", new::run)
        .register("set", set::run)
        .build()
}

/// A non-negative integer flag value.
fn count_arg(long: &str, value: &CoercedValue) -> Result<u32> {
    let n = value.as_int().ok_or_else(|| {
        ShellError::ArgumentValue(format!(
            "--{long} required arg of type int, got {} ({value})",
            value.type_name()
        ))
    })?;
    u32::try_from(n).map_err(|_| {
        ShellError::ArgumentValue(format!("--{long} must be a non-negative int, got {n}"))
    })
}

/// Rejects values after switches such as `--old`.
fn switches(flags: &Flags, names: &[&str]) -> Result<()> {
    names.iter().try_for_each(|name| flags.no_args(name))
}

/// Shortens `text` to `max` characters, marking the cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push('…');
    cut
}
