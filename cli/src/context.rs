//! Shell state shared by every command handler.

use labelist_config::OllamaSettings;
use labelist_core::{CommandSpec, Execution, Lexicon, Result, Session, ShellError};
use labelist_sqlite::{ConverseStore, GlobalStore, StoreError, StoredValue};
use tracing::warn;

use crate::console::Console;
use crate::embed::Embedder;
use crate::inference::InferenceClient;

/// Global-store key holding the current table.
pub const TABLENAME_KEY: &str = "tablename";
/// Global-store key enabling per-command runtime reports.
pub const VERBOSE_KEY: &str = "verbose";
/// Table selected on first start.
pub const DEFAULT_TABLE: &str = "main";

/// Handler context: output, storage and model clients.
pub struct AppContext {
    pub console: Console,
    pub converse: ConverseStore,
    pub globals: GlobalStore,
    pub lexicon: Lexicon,
    pub ollama: OllamaSettings,
    pub inference: Box<dyn InferenceClient>,
    pub embedder: Box<dyn Embedder>,
}

impl AppContext {
    /// Points `tablename` at [`DEFAULT_TABLE`] unless a table is already
    /// selected, and makes sure the selected table exists.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub fn initialize(&self) -> Result<()> {
        self.globals
            .set_default(TABLENAME_KEY, &StoredValue::from(DEFAULT_TABLE))?;
        let table = self.current_table()?;
        if !self.converse.table_exists(&table)? {
            self.converse.create_table(&table)?;
        }
        Ok(())
    }

    /// Name of the table commands read from and write to.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub fn current_table(&self) -> Result<String> {
        Ok(self
            .globals
            .get_str(TABLENAME_KEY)?
            .unwrap_or_else(|| DEFAULT_TABLE.to_string()))
    }

    /// Like [`current_table`](Self::current_table), but the table must
    /// exist.
    ///
    /// # Errors
    ///
    /// [`ShellError::Storage`] naming the missing table.
    pub fn existing_table(&self) -> Result<String> {
        let table = self.current_table()?;
        if !self.converse.table_exists(&table)? {
            return Err(StoreError::NoSuchTable(table).into());
        }
        Ok(table)
    }

    /// Whether runtime reports are enabled.
    pub fn verbose(&self) -> bool {
        match self.globals.get(VERBOSE_KEY) {
            Ok(Some(value)) => value.as_bool().unwrap_or_else(|| {
                warn!(%value, "ignoring non-boolean verbose setting");
                false
            }),
            Ok(None) => false,
            Err(err) => {
                warn!(error = %err, "could not read verbose setting");
                false
            }
        }
    }

    /// Lexicon entry for a command.
    ///
    /// # Errors
    ///
    /// [`ShellError::CommandNotFound`] for names the lexicon does not know.
    pub fn spec(&self, name: &str) -> Result<&CommandSpec> {
        self.lexicon
            .get(name)
            .ok_or_else(|| ShellError::CommandNotFound(name.to_string()))
    }

    /// Renders help for `name`.
    ///
    /// # Errors
    ///
    /// See [`spec`](Self::spec).
    pub fn show_help(&mut self, name: &str) -> Result<()> {
        let spec = self
            .lexicon
            .get(name)
            .ok_or_else(|| ShellError::CommandNotFound(name.to_string()))?;
        self.console.help(name, spec);
        Ok(())
    }
}

impl Session for AppContext {
    fn prompt(&self) -> String {
        let table = self
            .current_table()
            .unwrap_or_else(|_| DEFAULT_TABLE.to_string());
        format!("{table} → ")
    }

    fn report_error(&mut self, error: &ShellError) {
        self.console
            .error(&format!("{}: {error}", error.category()));
        if let ShellError::TableExists(table) = error {
            self.console
                .warn(&format!("Use the command `cd {table}` to point at it."));
        }
    }

    fn report_notice(&mut self, message: &str) {
        self.console.warn(message);
    }

    fn on_complete(&mut self, execution: &Execution) {
        if self.verbose() {
            self.console.info(&format!(
                "Finished executing {} in {:.3} ms",
                execution.command,
                execution.elapsed.as_secs_f64() * 1000.0
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::TestShell;

    #[test]
    fn test_initialize_selects_and_creates_main() {
        let shell = TestShell::new();
        assert_eq!(shell.ctx.current_table().unwrap(), "main");
        assert!(shell.ctx.converse.table_exists("main").unwrap());
        assert_eq!(shell.ctx.prompt(), "main → ");
    }

    #[test]
    fn test_initialize_keeps_existing_selection() {
        let shell = TestShell::new();
        shell
            .ctx
            .globals
            .set(TABLENAME_KEY, &StoredValue::from("archive"))
            .unwrap();
        shell.ctx.initialize().unwrap();
        assert_eq!(shell.ctx.prompt(), "archive → ");
        assert!(shell.ctx.converse.table_exists("archive").unwrap());
    }

    #[test]
    fn test_errors_render_with_category() {
        let mut shell = TestShell::new();
        shell
            .ctx
            .report_error(&ShellError::CommandNotFound("foo".into()));
        assert_eq!(
            shell.output(),
            "[ERR!] CommandNotFoundError: foo is not a valid command.\n"
        );
    }

    #[test]
    fn test_table_exists_adds_cd_hint() {
        let mut shell = TestShell::new();
        shell.ctx.report_error(&ShellError::TableExists("main".into()));
        let out = shell.output();
        assert!(out.contains("[ERR!] TableExistsError: Table main already exists."));
        assert!(out.contains("[WARN] Use the command `cd main` to point at it."));
    }

    #[test]
    fn test_runtime_report_only_when_verbose() {
        let mut shell = TestShell::new();
        let execution = Execution {
            command: "ls".into(),
            elapsed: Duration::from_micros(1500),
        };

        shell.ctx.on_complete(&execution);
        assert_eq!(shell.output(), "");

        shell
            .ctx
            .globals
            .set(VERBOSE_KEY, &StoredValue::Bool(true))
            .unwrap();
        shell.ctx.on_complete(&execution);
        assert_eq!(shell.output(), "[INFO] Finished executing ls in 1.500 ms\n");
    }

    #[test]
    fn test_non_boolean_verbose_is_off() {
        let shell = TestShell::new();
        shell
            .ctx
            .globals
            .set(VERBOSE_KEY, &StoredValue::from("yes"))
            .unwrap();
        assert!(!shell.ctx.verbose());
    }
}
