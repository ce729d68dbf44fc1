//! Statement-level dispatch: lexicon lookup, parsing and handler invocation.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{Result, ShellError};
use crate::lexer::split_statements;
use crate::parser::{Command, parse};
use crate::registry::CommandRegistry;
use crate::schema::Lexicon;

/// Statement that ends the session.
pub const EXIT_STATEMENT: &str = "exit";

/// What the loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Read the next line.
    Continue,
    /// `exit` was seen; stop reading.
    Exit,
}

/// Record of one successful command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Command name.
    pub command: String,
    /// Wall time spent in the handler.
    pub elapsed: Duration,
}

/// Callbacks the dispatcher and REPL use to talk to their host.
///
/// The host is also the handler context, so a session can read its own
/// state (for example a verbosity setting) when reporting.
pub trait Session {
    /// Prompt shown before each read.
    fn prompt(&self) -> String {
        "> ".to_string()
    }

    /// Renders an error from one statement.
    fn report_error(&mut self, error: &ShellError);

    /// Renders a notice that is not an error (interrupt, end of input).
    fn report_notice(&mut self, message: &str);

    /// Called after each successful command.
    fn on_complete(&mut self, _execution: &Execution) {}
}

/// Registry and lexicon bundled for statement execution.
#[derive(Debug)]
pub struct Dispatcher<C> {
    registry: CommandRegistry<C>,
    lexicon: Lexicon,
}

impl<C> Dispatcher<C> {
    /// Creates a dispatcher.
    pub fn new(registry: CommandRegistry<C>, lexicon: Lexicon) -> Self {
        Self { registry, lexicon }
    }

    /// The handler registry.
    pub fn registry(&self) -> &CommandRegistry<C> {
        &self.registry
    }

    /// The flag lexicon.
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Parses one statement after checking that its leading word names a
    /// registered command.
    ///
    /// # Errors
    ///
    /// [`ShellError::EmptyCommand`], [`ShellError::CommandNotFound`] or any
    /// parse error.
    pub fn parse(&self, statement: &str) -> Result<Command> {
        let name = statement
            .split_whitespace()
            .next()
            .ok_or(ShellError::EmptyCommand)?;
        if !self.registry.contains(name) {
            return Err(ShellError::CommandNotFound(name.to_string()));
        }
        parse(statement, self.lexicon.schema_for(name))
    }

    /// Parses and runs one statement.
    ///
    /// # Errors
    ///
    /// Anything from [`parse`](Self::parse) or the handler.
    pub fn execute(&self, ctx: &mut C, statement: &str) -> Result<Execution> {
        let command = self.parse(statement)?;
        let name = command.name.clone();
        debug!(command = %name, "dispatching");

        let started = Instant::now();
        self.registry.dispatch(ctx, command)?;
        let elapsed = started.elapsed();

        debug!(command = %name, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "command finished");
        Ok(Execution {
            command: name,
            elapsed,
        })
    }
}

impl<C: Session> Dispatcher<C> {
    /// Runs every `;`-separated statement of `line` in order.
    ///
    /// Each statement is isolated: an error is reported through
    /// [`Session::report_error`] and the next statement still runs. An
    /// `exit` statement returns [`Control::Exit`] immediately, skipping the
    /// rest of the line.
    pub fn run_line(&self, ctx: &mut C, line: &str) -> Control {
        for statement in split_statements(line) {
            if statement == EXIT_STATEMENT {
                return Control::Exit;
            }
            match self.execute(ctx, statement) {
                Ok(execution) => ctx.on_complete(&execution),
                Err(err) => {
                    debug!(category = err.category(), error = %err, "statement failed");
                    ctx.report_error(&err);
                }
            }
        }
        Control::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Flags;
    use crate::schema::{CommandSpec, FlagSchema};
    use crate::value::CoercedValue;

    #[derive(Default)]
    struct Recorder {
        ran: Vec<(String, Flags)>,
        errors: Vec<ShellError>,
        completed: Vec<String>,
    }

    impl Session for Recorder {
        fn report_error(&mut self, error: &ShellError) {
            self.errors.push(error.clone());
        }

        fn report_notice(&mut self, _message: &str) {}

        fn on_complete(&mut self, execution: &Execution) {
            self.completed.push(execution.command.clone());
        }
    }

    fn remember(name: &'static str) -> impl Fn(&mut Recorder, &Flags) -> Result<()> {
        move |ctx: &mut Recorder, flags: &Flags| {
            ctx.ran.push((name.to_string(), flags.clone()));
            Ok(())
        }
    }

    fn dispatcher() -> Dispatcher<Recorder> {
        let registry = CommandRegistry::builder()
            .register("ls", remember("ls"))
            .register("set", remember("set"))
            .register("fail", |_: &mut Recorder, _: &Flags| -> Result<()> {
                Err(ShellError::MissingFlag("fail command requires flags.".into()))
            })
            .build();
        let mut lexicon = Lexicon::default();
        lexicon.insert("ls", CommandSpec::new(FlagSchema::default().with_flag("a", "all")));
        lexicon.insert(
            "set",
            CommandSpec::new(FlagSchema::default().with_flag("k", "key").with_flag("v", "value")),
        );
        Dispatcher::new(registry, lexicon)
    }

    #[test]
    fn test_unregistered_command_fails_before_parsing() {
        let d = dispatcher();
        assert_eq!(
            d.parse("foo 'unterminated").unwrap_err(),
            ShellError::CommandNotFound("foo".into())
        );
    }

    #[test]
    fn test_registered_command_without_lexicon_entry_rejects_flags() {
        let d = dispatcher();
        assert_eq!(
            d.parse("fail --x").unwrap_err(),
            ShellError::UnknownFlag("x".into())
        );
    }

    #[test]
    fn test_run_line_isolates_statements() {
        let d = dispatcher();
        let mut ctx = Recorder::default();

        let control = d.run_line(&mut ctx, "ls --bogus; set --key 'x' --value 10; fail; nope");

        assert_eq!(control, Control::Continue);
        assert_eq!(ctx.completed, vec!["set"]);
        assert_eq!(
            ctx.errors,
            vec![
                ShellError::UnknownFlag("bogus".into()),
                ShellError::MissingFlag("fail command requires flags.".into()),
                ShellError::CommandNotFound("nope".into()),
            ]
        );
        let (_, flags) = &ctx.ran[0];
        assert_eq!(flags.get("key"), Some(&[CoercedValue::Str("x".into())][..]));
        assert_eq!(flags.get("value"), Some(&[CoercedValue::Int(10)][..]));
    }

    #[test]
    fn test_exit_skips_the_rest_of_the_line() {
        let d = dispatcher();
        let mut ctx = Recorder::default();

        let control = d.run_line(&mut ctx, "ls; exit; set --key a --value b");

        assert_eq!(control, Control::Exit);
        assert_eq!(ctx.completed, vec!["ls"]);
    }

    #[test]
    fn test_exit_with_arguments_is_not_exit() {
        let d = dispatcher();
        let mut ctx = Recorder::default();

        assert_eq!(d.run_line(&mut ctx, "exit now"), Control::Continue);
        assert_eq!(ctx.errors, vec![ShellError::CommandNotFound("exit".into())]);
    }
}
