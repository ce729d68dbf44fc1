use labelist_core::{Flags, Result, ShellError};
use labelist_sqlite::{StoredValue, validate_table_name};

use crate::context::{AppContext, TABLENAME_KEY};

/// `cd <table>`: points the shell at another table.
pub(super) fn run(ctx: &mut AppContext, flags: &Flags) -> Result<()> {
    if flags.wants_help() {
        return ctx.show_help("cd");
    }
    if flags.explicit_count() > 0 {
        return Err(ShellError::ExcessiveFlags(
            "cd command does not require flags.".to_string(),
        ));
    }

    let table = flags.single_root_literal("cd")?.to_string();
    validate_table_name(&table).map_err(|e| ShellError::ArgumentValue(e.to_string()))?;
    ctx.globals.set(TABLENAME_KEY, &StoredValue::Str(table))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use labelist_core::Session;

    use crate::testing::TestShell;

    #[test]
    fn test_cd_moves_pointer() {
        let mut shell = TestShell::new();
        shell.exec("cd archive").unwrap();
        assert_eq!(shell.ctx.current_table().unwrap(), "archive");
        assert_eq!(shell.ctx.prompt(), "archive → ");
    }

    #[test]
    fn test_cd_arity() {
        let mut shell = TestShell::new();
        assert_eq!(
            shell.exec("cd").unwrap_err().to_string(),
            "cd requires 1 str arg, got 0"
        );
        assert_eq!(
            shell.exec("cd a b").unwrap_err().to_string(),
            "--ROOT accepts 1 arg, got 2"
        );
        assert_eq!(shell.ctx.current_table().unwrap(), "main");
    }

    #[test]
    fn test_cd_rejects_bad_names() {
        let mut shell = TestShell::new();
        let err = shell.exec("cd 'two words'").unwrap_err();
        assert_eq!(err.category(), "ArgumentValueError");
        assert_eq!(shell.ctx.current_table().unwrap(), "main");
    }

    #[test]
    fn test_cd_help() {
        let mut shell = TestShell::new();
        shell.exec("cd --help").unwrap();
        assert!(shell.output().starts_with("Command: cd"));
    }
}
