use labelist_core::{Flags, Result, ShellError};
use labelist_sqlite::FetchOptions;

use super::{count_arg, switches, truncate};
use crate::context::AppContext;

/// `fetch (--all | --limit N) [--old] [--desc] [--max-length N]`: prints
/// full conversations of the current table.
pub(super) fn run(ctx: &mut AppContext, flags: &Flags) -> Result<()> {
    if flags.wants_help() {
        return ctx.show_help("fetch");
    }
    flags.no_positionals("fetch")?;
    switches(flags, &["all", "old", "desc"])?;

    let limit = if flags.contains("all") {
        if flags.contains("limit") {
            return Err(ShellError::ExcessiveFlags(
                "--all must be used independent of limit".to_string(),
            ));
        }
        None
    } else if flags.contains("limit") {
        let value = flags.single("fetch", "limit", "int")?;
        Some(count_arg("limit", value)?)
    } else {
        return Err(ShellError::MissingFlag(
            "fetch requires either a flag --all or --limit".to_string(),
        ));
    };

    let max_length = match flags.optional_single("max-length", "int")? {
        Some(value) => Some(count_arg("max-length", value)? as usize),
        None => None,
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
    for row in rows {
        let clip = |s: &str| match max_length {
            Some(max) => truncate(s, max),
            None => s.to_string(),
        };
        ctx.console
            .print(&format!("\n({}) [{}]", row.id, row.timestamp));
        ctx.console.field("PROMPT", &clip(&row.converse.prompt));
        ctx.console.field("ANSWER", &clip(&row.converse.answer));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::testing::TestShell;

    fn seeded() -> TestShell {
        let mut shell = TestShell::new();
        shell
            .exec("add -p 'What colour is the sky?' -a 'Blue, mostly.'")
            .unwrap();
        shell.exec("add -p 'And the sea?' -a 'Also blue.'").unwrap();
        shell.output();
        shell
    }

    #[test]
    fn test_fetch_prints_pairs() {
        let mut shell = seeded();
        shell.exec("fetch --all").unwrap();
        let out = shell.output();
        assert!(out.starts_with("[INFO] Total of 2 entries fetched.\n"));
        assert!(out.contains("\n(1) ["));
        assert!(out.contains("PROMPT What colour is the sky?\nANSWER Blue, mostly.\n"));
        assert!(out.find("(1)").unwrap() < out.find("(2)").unwrap());
    }

    #[test]
    fn test_fetch_limit_desc_and_truncation() {
        let mut shell = seeded();
        shell.exec("fetch --limit 2 --desc --max-length 4").unwrap();
        let out = shell.output();
        assert!(out.find("(2)").unwrap() < out.find("(1)").unwrap());
        assert!(out.contains("PROMPT What…\nANSWER Blue…\n"));
        assert!(out.contains("PROMPT And …\nANSWER Also…\n"));
    }

    #[test]
    fn test_fetch_flag_rules() {
        let mut shell = seeded();
        assert_eq!(
            shell.exec("fetch").unwrap_err().to_string(),
            "fetch requires either a flag --all or --limit"
        );
        assert_eq!(
            shell.exec("fetch --old").unwrap_err().category(),
            "MissingFlagError"
        );
        assert_eq!(
            shell.exec("fetch --all --limit 3").unwrap_err().to_string(),
            "--all must be used independent of limit"
        );
        assert_eq!(
            shell.exec("fetch --all --max-length long").unwrap_err().to_string(),
            "--max-length required arg of type int, got str (long)"
        );
        assert_eq!(
            shell.exec("fetch --all --max-length").unwrap_err().category(),
            "MissingArgError"
        );
        assert_eq!(shell.output(), "");
    }
}
