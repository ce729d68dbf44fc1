//! Command language and dispatch core for the labelist shell.
//!
//! A line typed at the prompt goes through these stages:
//!
//! - [`split_statements`] cuts the line at unquoted `;`.
//! - [`tokenize`] splits one statement into [`Token`]s, honoring quotes.
//! - [`coerce`] turns each value token into a [`CoercedValue`].
//! - [`parse`] groups values under the flags of the command's
//!   [`FlagSchema`], producing a [`Command`].
//! - [`CommandRegistry::dispatch`] hands the [`Flags`] to the registered
//!   [`Handler`].
//!
//! [`Dispatcher`] ties the registry to a [`Lexicon`] and runs whole lines
//! with per-statement error isolation; [`Repl`] drives it from any
//! [`LineSource`]. Lexicons are checked with [`validate_lexicon`].
//!
//! # Example
//!
//! ```
//! use labelist_core::*;
//!
//! #[derive(Default)]
//! struct Shell {
//!     settings: Vec<(String, String)>,
//!     errors: Vec<String>,
//! }
//!
//! impl Session for Shell {
//!     fn report_error(&mut self, error: &ShellError) {
//!         self.errors.push(format!("{}: {error}", error.category()));
//!     }
//!     fn report_notice(&mut self, _message: &str) {}
//! }
//!
//! let registry = CommandRegistry::builder()
//!     .register("set", |shell: &mut Shell, flags: &Flags| -> Result<()> {
//!         let key = flags.single("set", "key", "str")?.to_string();
//!         let value = flags.single("set", "value", "str")?.to_string();
//!         shell.settings.push((key, value));
//!         Ok(())
//!     })
//!     .build();
//!
//! let mut lexicon = Lexicon::default();
//! lexicon.insert(
//!     "set",
//!     CommandSpec::new(FlagSchema::default().with_flag("k", "key").with_flag("v", "value")),
//! );
//! assert!(validate_lexicon(&lexicon).is_empty());
//!
//! let dispatcher = Dispatcher::new(registry, lexicon);
//! let mut shell = Shell::default();
//! let control = dispatcher.run_line(&mut shell, "set --key tablename -v archive; get; exit");
//!
//! assert_eq!(control, Control::Exit);
//! assert_eq!(shell.settings, vec![("tablename".to_string(), "archive".to_string())]);
//! assert_eq!(shell.errors, vec!["CommandNotFoundError: get is not a valid command."]);
//! ```

mod dispatch;
mod error;
mod lexer;
mod parser;
mod registry;
mod repl;
mod schema;
mod validate;
mod value;

pub use dispatch::{Control, Dispatcher, EXIT_STATEMENT, Execution, Session};
pub use error::{Result, ShellError};
pub use lexer::{LexError, Token, split_statements, tokenize};
pub use parser::{Command, FlagMap, parse};
pub use registry::{CommandRegistry, Flags, Handler, RegistryBuilder};
pub use repl::{EXIT_HINT, LineSource, ReadEvent, Repl, ReplState};
pub use schema::{CommandDocs, CommandSpec, FlagDescriptor, FlagDoc, FlagSchema, Lexicon, ROOT};
pub use validate::{ValidationError, validate_lexicon, validate_spec};
pub use value::{CoercedValue, coerce};
