use labelist_core::{Flags, Result};

use crate::context::AppContext;

/// `get --key K`: prints a stored value.
pub(super) fn run(ctx: &mut AppContext, flags: &Flags) -> Result<()> {
    if flags.wants_help() {
        return ctx.show_help("get");
    }
    flags.no_positionals("get")?;
    let key = flags.single_literal("get", "key")?.to_string();

    match ctx.globals.get(&key)? {
        Some(value) => {
            ctx.console.field("KEY", &key);
            ctx.console.field("VALUE", &value.to_string());
        }
        None => ctx.console.warn(&format!("No value stored under key {key}.")),
    }
    Ok(())
}
