//! Command handlers and the startup-built registry that dispatches to them.
//!
//! Handlers receive the caller's context by `&mut` and the parsed flags in
//! their simple long-name form ([`Flags`]). Registration happens once through
//! [`RegistryBuilder`]; the resulting [`CommandRegistry`] is immutable.
//!
//! # Example
//!
//! ```
//! use labelist_core::{CommandRegistry, Flags, FlagSchema, Result, parse};
//!
//! #[derive(Default)]
//! struct Ctx {
//!     table: String,
//! }
//!
//! let registry = CommandRegistry::builder()
//!     .register("cd", |ctx: &mut Ctx, flags: &Flags| -> Result<()> {
//!         let target = flags.single_root("cd", "str")?;
//!         ctx.table = target.to_string();
//!         Ok(())
//!     })
//!     .build();
//!
//! let mut ctx = Ctx::default();
//! let cmd = parse("cd archive", FlagSchema::empty()).unwrap();
//! registry.dispatch(&mut ctx, cmd).unwrap();
//! assert_eq!(ctx.table, "archive");
//! ```

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::{Result, ShellError};
use crate::parser::Command;
use crate::schema::ROOT;
use crate::value::CoercedValue;

/// Parsed flags keyed by long name, `"ROOT"` holding positional values.
///
/// Besides lookups it carries the arity checks handlers share, each of
/// which returns the matching [`ShellError`] variant. Every value keeps the
/// text it was typed as; handlers storing free text read that through the
/// `*literal*` accessors instead of re-rendering the coerced value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flags {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    name: String,
    values: Vec<CoercedValue>,
    literals: Vec<String>,
}

fn render(value: &CoercedValue) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

impl Flags {
    fn insert(&mut self, entry: Entry) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    fn entry(&self, long: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == long)
    }
}

impl FromIterator<(String, Vec<CoercedValue>, Vec<String>)> for Flags {
    fn from_iter<I: IntoIterator<Item = (String, Vec<CoercedValue>, Vec<String>)>>(
        iter: I,
    ) -> Self {
        let mut flags = Flags::default();
        for (name, values, literals) in iter {
            flags.insert(Entry {
                name,
                values,
                literals,
            });
        }
        flags
    }
}

/// Builds flags without source text; literals are the rendered values.
impl FromIterator<(String, Vec<CoercedValue>)> for Flags {
    fn from_iter<I: IntoIterator<Item = (String, Vec<CoercedValue>)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, values)| {
                let literals = values.iter().map(render).collect();
                (name, values, literals)
            })
            .collect()
    }
}

impl Flags {
    /// Values under `long`, if the flag was given.
    pub fn get(&self, long: &str) -> Option<&[CoercedValue]> {
        self.entry(long).map(|e| e.values.as_slice())
    }

    /// Literal texts under `long`, outer quotes removed.
    pub fn literals(&self, long: &str) -> Option<&[String]> {
        self.entry(long).map(|e| e.literals.as_slice())
    }

    /// Literal texts of the positional values.
    pub fn root_literals(&self) -> &[String] {
        self.literals(ROOT).unwrap_or(&[])
    }

    /// Returns `true` if the flag was given.
    pub fn contains(&self, long: &str) -> bool {
        self.get(long).is_some()
    }

    /// Positional values.
    pub fn root(&self) -> &[CoercedValue] {
        self.get(ROOT).unwrap_or(&[])
    }

    /// Explicit flags (everything but ROOT) in the order given.
    pub fn explicit(&self) -> impl Iterator<Item = (&str, &[CoercedValue])> {
        self.entries
            .iter()
            .filter(|e| e.name != ROOT)
            .map(|e| (e.name.as_str(), e.values.as_slice()))
    }

    /// Number of explicit flags.
    pub fn explicit_count(&self) -> usize {
        self.explicit().count()
    }

    /// Long names of explicit flags.
    pub fn explicit_names(&self) -> Vec<&str> {
        self.explicit().map(|(name, _)| name).collect()
    }

    /// `true` when `--help` was given.
    pub fn wants_help(&self) -> bool {
        self.contains("help")
    }

    /// Requires `--long` to be present.
    ///
    /// # Errors
    ///
    /// [`ShellError::MissingFlag`] naming the command.
    pub fn require(&self, command: &str, long: &str) -> Result<&[CoercedValue]> {
        self.get(long).ok_or_else(|| {
            ShellError::MissingFlag(format!("{command} command requires flag --{long}."))
        })
    }

    /// Requires `--long` to be present with exactly one value.
    ///
    /// `kind` names the expected type in the message (`"str"`, `"int"`).
    ///
    /// # Errors
    ///
    /// [`ShellError::MissingFlag`], [`ShellError::MissingArg`] or
    /// [`ShellError::ExcessiveArgs`].
    pub fn single(&self, command: &str, long: &str, kind: &str) -> Result<&CoercedValue> {
        let values = self.require(command, long)?;
        exactly_one(long, kind, values)
    }

    /// Like [`single`](Self::single) but an absent flag yields `None`.
    ///
    /// # Errors
    ///
    /// [`ShellError::MissingArg`] or [`ShellError::ExcessiveArgs`] when the
    /// flag is present with the wrong number of values.
    pub fn optional_single(&self, long: &str, kind: &str) -> Result<Option<&CoercedValue>> {
        match self.get(long) {
            Some(values) => exactly_one(long, kind, values).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`single`](Self::single), returning the value as typed.
    ///
    /// # Errors
    ///
    /// Same as [`single`](Self::single) with kind `str`.
    pub fn single_literal(&self, command: &str, long: &str) -> Result<&str> {
        self.single(command, long, "str")?;
        Ok(first(self.literals(long)))
    }

    /// Like [`optional_single`](Self::optional_single), returning the value
    /// as typed.
    ///
    /// # Errors
    ///
    /// Same as [`optional_single`](Self::optional_single) with kind `str`.
    pub fn optional_literal(&self, long: &str) -> Result<Option<&str>> {
        Ok(self
            .optional_single(long, "str")?
            .map(|_| first(self.literals(long))))
    }

    /// Requires exactly one positional value.
    ///
    /// # Errors
    ///
    /// [`ShellError::MissingArg`] or [`ShellError::ExcessiveArgs`].
    pub fn single_root(&self, command: &str, kind: &str) -> Result<&CoercedValue> {
        match self.root() {
            [value] => Ok(value),
            [] => Err(ShellError::MissingArg(format!(
                "{command} requires 1 {kind} arg, got 0"
            ))),
            values => Err(ShellError::ExcessiveArgs(format!(
                "--{ROOT} accepts 1 arg, got {}",
                values.len()
            ))),
        }
    }

    /// Like [`single_root`](Self::single_root), returning the value as typed.
    ///
    /// # Errors
    ///
    /// Same as [`single_root`](Self::single_root) with kind `str`.
    pub fn single_root_literal(&self, command: &str) -> Result<&str> {
        self.single_root(command, "str")?;
        Ok(first(Some(self.root_literals())))
    }

    /// Requires that `--long`, if present, carries no values.
    ///
    /// # Errors
    ///
    /// [`ShellError::ExcessiveArgs`].
    pub fn no_args(&self, long: &str) -> Result<()> {
        match self.get(long) {
            Some(values) if !values.is_empty() => Err(ShellError::ExcessiveArgs(format!(
                "--{long} flag doesn't accept args, got {}",
                values.len()
            ))),
            _ => Ok(()),
        }
    }

    /// Rejects positional values.
    ///
    /// # Errors
    ///
    /// [`ShellError::ExcessiveArgs`].
    pub fn no_positionals(&self, command: &str) -> Result<()> {
        match self.root().len() {
            0 => Ok(()),
            n => Err(ShellError::ExcessiveArgs(format!(
                "{command} accepts no positional args, got {n}"
            ))),
        }
    }
}

fn first(literals: Option<&[String]>) -> &str {
    literals
        .and_then(<[String]>::first)
        .map_or("", String::as_str)
}

fn exactly_one<'a>(long: &str, kind: &str, values: &'a [CoercedValue]) -> Result<&'a CoercedValue> {
    match values {
        [value] => Ok(value),
        [] => Err(ShellError::MissingArg(format!(
            "--{long} requires 1 {kind} value, got 0"
        ))),
        _ => Err(ShellError::ExcessiveArgs(format!(
            "--{long} accepts 1 {kind} value, got {}",
            values.len()
        ))),
    }
}

/// A command implementation.
///
/// Implemented for every `Fn(&mut C, &Flags) -> Result<()>`, so plain
/// functions and closures register directly.
pub trait Handler<C> {
    /// Runs the command.
    fn handle(&self, ctx: &mut C, flags: &Flags) -> Result<()>;
}

impl<C, F> Handler<C> for F
where
    F: Fn(&mut C, &Flags) -> Result<()>,
{
    fn handle(&self, ctx: &mut C, flags: &Flags) -> Result<()> {
        self(ctx, flags)
    }
}

/// Collects handlers at startup.
pub struct RegistryBuilder<C> {
    handlers: HashMap<String, Box<dyn Handler<C>>>,
}

impl<C> Default for RegistryBuilder<C> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<C> RegistryBuilder<C> {
    /// Registers `handler` under `name`. A later registration for the same
    /// name replaces the earlier one.
    pub fn register(mut self, name: impl Into<String>, handler: impl Handler<C> + 'static) -> Self {
        let name = name.into();
        if self.handlers.insert(name.clone(), Box::new(handler)).is_some() {
            debug!(command = %name, "replaced previously registered handler");
        }
        self
    }

    /// Freezes the registry.
    pub fn build(self) -> CommandRegistry<C> {
        CommandRegistry {
            handlers: self.handlers,
        }
    }
}

/// Immutable mapping from command name to handler.
pub struct CommandRegistry<C> {
    handlers: HashMap<String, Box<dyn Handler<C>>>,
}

impl<C> fmt::Debug for CommandRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}

impl<C> CommandRegistry<C> {
    /// Returns a new [`RegistryBuilder`].
    pub fn builder() -> RegistryBuilder<C> {
        RegistryBuilder::default()
    }

    /// Returns `true` if a handler is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invokes the handler for `command.name` with its flags converted to
    /// long-name form.
    ///
    /// # Errors
    ///
    /// [`ShellError::CommandNotFound`] if no handler is registered, else
    /// whatever the handler returns.
    pub fn dispatch(&self, ctx: &mut C, command: Command) -> Result<()> {
        let handler = self
            .handlers
            .get(&command.name)
            .ok_or_else(|| ShellError::CommandNotFound(command.name.clone()))?;
        let flags: Flags = command.flags.into();
        handler.handle(ctx, &flags)
    }
}
