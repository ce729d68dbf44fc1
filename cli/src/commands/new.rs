use labelist_core::{Flags, Result};

use crate::context::AppContext;

/// `new --name <table>`: creates an empty conversation table.
pub(super) fn run(ctx: &mut AppContext, flags: &Flags) -> Result<()> {
    if flags.wants_help() {
        return ctx.show_help("new");
    }
    flags.no_positionals("new")?;
    let name = flags.single_literal("new", "name")?.to_string();

    ctx.console.info("Creating table...");
    ctx.converse.create_table(&name)?;
    ctx.console.done(&format!("Created table {name}."));
    Ok(())
}
