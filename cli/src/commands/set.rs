use labelist_core::{Flags, Result};
use labelist_sqlite::StoredValue;

use crate::context::AppContext;

/// `set --key K --value V`: stores a typed value in the global store.
pub(super) fn run(ctx: &mut AppContext, flags: &Flags) -> Result<()> {
    if flags.wants_help() {
        return ctx.show_help("set");
    }
    flags.no_positionals("set")?;
    let key = flags.single_literal("set", "key")?.to_string();
    let value = flags.single("set", "value", "str")?;

    ctx.globals.set(&key, &StoredValue::from(value.clone()))?;
    ctx.console.done(&format!("Set key {key} to {value}."));
    Ok(())
}

#[cfg(test)]
mod tests {
    use labelist_sqlite::StoredValue;

    use crate::testing::TestShell;

    #[test]
    fn test_set_keeps_value_type() {
        let mut shell = TestShell::new();
        shell.exec("set --key verbose --value True").unwrap();
        shell.exec("set -k retries -v 3").unwrap();
        shell.exec("set -k label -v '3'").unwrap();

        let globals = &shell.ctx.globals;
        assert_eq!(globals.get("verbose").unwrap(), Some(StoredValue::Bool(true)));
        assert_eq!(globals.get("retries").unwrap(), Some(StoredValue::Int(3)));
        assert_eq!(globals.get("label").unwrap(), Some(StoredValue::from("3")));
        assert!(shell.output().contains("[DONE] Set key verbose to True.\n"));
    }

    #[test]
    fn test_set_requires_key_and_value() {
        let mut shell = TestShell::new();
        assert_eq!(
            shell.exec("set --value 1").unwrap_err().to_string(),
            "set command requires flag --key."
        );
        assert_eq!(
            shell.exec("set --key k").unwrap_err().to_string(),
            "set command requires flag --value."
        );
        assert_eq!(
            shell.exec("set --key k --value").unwrap_err().to_string(),
            "--value requires 1 str value, got 0"
        );
        assert!(shell.ctx.globals.get("k").unwrap().is_none());
    }
}
