use labelist_core::{Flags, Result};
use labelist_sqlite::Converse;

use crate::context::AppContext;

/// `add --prompt P --answer A`: stores a hand-written pair.
pub(super) fn run(ctx: &mut AppContext, flags: &Flags) -> Result<()> {
    if flags.wants_help() {
        return ctx.show_help("add");
    }
    flags.no_positionals("add")?;
    let prompt = flags.single_literal("add", "prompt")?.to_string();
    let answer = flags.single_literal("add", "answer")?.to_string();
    let table = ctx.existing_table()?;

    let veci = ctx.embedder.embed(&prompt)?;
    let veco = ctx.embedder.embed(&answer)?;
    let id = ctx
        .converse
        .insert(&table, &Converse::new(prompt, answer, veci, veco))?;
    ctx.console
        .done(&format!("Stored conversation {id} in {table}."));
    Ok(())
}
