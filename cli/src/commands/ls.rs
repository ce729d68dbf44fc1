use labelist_core::{Flags, Result, ShellError};
use labelist_sqlite::FetchOptions;

use super::{count_arg, switches, truncate};
use crate::context::AppContext;

/// Rows listed when neither `--all` nor `--limit` is given.
const DEFAULT_LIMIT: u32 = 10;
/// Characters of prompt and answer shown per row.
const PREVIEW_CHARS: usize = 48;

/// `ls [--all | --limit N] [--old] [--desc]`.
///
/// Without flags this lists tables; with flags it lists conversations of
/// the current table.
pub(super) fn run(ctx: &mut AppContext, flags: &Flags) -> Result<()> {
    if flags.wants_help() {
        return ctx.show_help("ls");
    }
    flags.no_positionals("ls")?;
    if flags.explicit_count() == 0 {
        return list_tables(ctx);
    }

    switches(flags, &["all", "old", "desc"])?;
    let limit = if flags.contains("all") {
        if flags.explicit_count() > 1 {
            return Err(ShellError::ExcessiveFlags("--all must be used alone".to_string()));
        }
        None
    } else {
        match flags.optional_single("limit", "int")? {
            Some(value) => Some(count_arg("limit", value)?),
            None => Some(DEFAULT_LIMIT),
        }
    };
    let options = FetchOptions {
        limit,
        oldest_first: flags.contains("old"),
        ascending: !flags.contains("desc"),
    };

    let table = ctx.existing_table()?;
    let rows = ctx.converse.fetch(&table, &options)?;

    ctx.console
        .info(&format!("Total of {} entries fetched.", rows.len()));
    if rows.is_empty() {
        ctx.console.warn("No conversations found.");
        return Ok(());
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.id.to_string(),
                truncate(&row.converse.prompt, PREVIEW_CHARS),
                truncate(&row.converse.answer, PREVIEW_CHARS),
            ]
        })
        .collect();
    ctx.console.table(&["ID", "Prompt", "Answer"], &cells);
    Ok(())
}

fn list_tables(ctx: &mut AppContext) -> Result<()> {
    let tables = ctx.converse.list_tables()?;
    let current = ctx.current_table()?;

    ctx.console.info(&format!("Total of {} tables.", tables.len()));
    let cells: Vec<Vec<String>> = tables
        .into_iter()
        .map(|t| {
            let marker = if t.name == current { "*" } else { "" };
            vec![marker.to_string(), t.name, t.rows.to_string()]
        })
        .collect();
    ctx.console.table(&["", "Table", "Rows"], &cells);
    Ok(())
}
