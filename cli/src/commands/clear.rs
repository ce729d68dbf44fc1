use labelist_core::{Flags, Result, ShellError};

use crate::context::AppContext;

pub(super) fn run(ctx: &mut AppContext, flags: &Flags) -> Result<()> {
    if flags.wants_help() && flags.explicit_count() == 1 {
        return ctx.show_help("clear");
    }
    if flags.explicit_count() > 0 {
        return Err(ShellError::ExcessiveFlags(format!(
            "clear command requires no flags, got {:?}",
            flags.explicit_names()
        )));
    }
    flags.no_positionals("clear")?;
    ctx.console.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::testing::TestShell;

    #[test]
    fn test_clear_writes_escape() {
        let mut shell = TestShell::new();
        shell.exec("clear").unwrap();
        assert_eq!(shell.output(), "\x1b[H\x1b[J");
    }

    #[test]
    fn test_clear_rejects_arguments() {
        let mut shell = TestShell::new();
        shell.exec("clear -h").unwrap();
        assert!(shell.output().starts_with("Command: clear"));
        assert_eq!(
            shell.exec("clear now").unwrap_err().to_string(),
            "clear accepts no positional args, got 1"
        );
    }
}
