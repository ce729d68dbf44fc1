//! Turns one statement into a [`Command`] against a command's flag schema.

use crate::error::{Result, ShellError};
use crate::lexer::{LexError, tokenize};
use crate::registry::Flags;
use crate::schema::{FlagDescriptor, FlagSchema};
use crate::value::{CoercedValue, coerce};

/// Values collected under one flag, each with the text it was written as.
#[derive(Debug, Clone, PartialEq)]
struct Slot {
    flag: FlagDescriptor,
    values: Vec<CoercedValue>,
    literals: Vec<String>,
}

impl Slot {
    fn new(flag: FlagDescriptor) -> Self {
        Self {
            flag,
            values: Vec::new(),
            literals: Vec::new(),
        }
    }
}

/// Ordered mapping from flag descriptor to the values collected under it.
///
/// Keys are unique and kept in the order each flag was first seen. The
/// ROOT entry is always present and always first. Next to every coerced
/// value the map keeps its literal text (outer quotes removed), so free text
/// such as `007` survives unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagMap {
    entries: Vec<Slot>,
}

impl Default for FlagMap {
    fn default() -> Self {
        Self {
            entries: vec![Slot::new(FlagDescriptor::root())],
        }
    }
}

impl FlagMap {
    /// Creates a map holding only an empty ROOT entry.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, flag: &FlagDescriptor) -> &mut Slot {
        match self.entries.iter().position(|slot| slot.flag == *flag) {
            Some(idx) => &mut self.entries[idx],
            None => {
                self.entries.push(Slot::new(flag.clone()));
                let last = self.entries.len() - 1;
                &mut self.entries[last]
            }
        }
    }

    fn slot(&self, long: &str) -> Option<&Slot> {
        self.entries.iter().find(|slot| slot.flag.long == long)
    }

    /// Starts (or restarts) collection for `flag`, discarding earlier values.
    pub fn reset(&mut self, flag: &FlagDescriptor) {
        let slot = self.slot_mut(flag);
        slot.values.clear();
        slot.literals.clear();
    }

    /// Appends a value and its literal text under `flag`, creating the entry
    /// if needed.
    pub fn push(&mut self, flag: &FlagDescriptor, literal: impl Into<String>, value: CoercedValue) {
        let slot = self.slot_mut(flag);
        slot.values.push(value);
        slot.literals.push(literal.into());
    }

    /// Values collected under the flag with long name `long`.
    pub fn get(&self, long: &str) -> Option<&[CoercedValue]> {
        self.slot(long).map(|slot| slot.values.as_slice())
    }

    /// Literal texts collected under `long`, quotes removed.
    pub fn literals(&self, long: &str) -> Option<&[String]> {
        self.slot(long).map(|slot| slot.literals.as_slice())
    }

    /// Positional values.
    pub fn root(&self) -> &[CoercedValue] {
        self.get(crate::schema::ROOT).unwrap_or(&[])
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&FlagDescriptor, &[CoercedValue])> {
        self.entries
            .iter()
            .map(|slot| (&slot.flag, slot.values.as_slice()))
    }

    /// Number of entries, ROOT included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: the ROOT entry is always present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<FlagMap> for Flags {
    fn from(map: FlagMap) -> Self {
        map.entries
            .into_iter()
            .map(|slot| (slot.flag.long, slot.values, slot.literals))
            .collect()
    }
}

/// A parsed statement: the command name and its flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Leading token.
    pub name: String,
    /// Flags in the order they were seen, ROOT first.
    pub flags: FlagMap,
}

impl Command {
    /// Parses `line` against `schema`.
    ///
    /// See [`parse`].
    pub fn parse(line: &str, schema: &FlagSchema) -> Result<Self> {
        parse(line, schema)
    }
}

impl From<LexError> for ShellError {
    fn from(err: LexError) -> Self {
        match err {
            LexError::Empty => ShellError::EmptyCommand,
            LexError::UnterminatedQuote { quote, column } => {
                ShellError::UnterminatedQuote { quote, column }
            }
        }
    }
}

/// Parses one statement.
///
/// The first token is the command name. `--name` tokens are resolved as long
/// flags and `-x` tokens as short flags; either starts (or restarts) that
/// flag's value list. Every other token is coerced and appended to the
/// active flag, or to ROOT before any flag appears. Only recognizability is
/// checked here; arity is each handler's business.
///
/// # Errors
///
/// [`ShellError::EmptyCommand`] and [`ShellError::UnterminatedQuote`] from
/// tokenizing, [`ShellError::UnknownFlag`] and
/// [`ShellError::UnmappedShortFlag`] from flag resolution. No partial
/// command is returned.
///
/// # Examples
///
/// ```
/// use labelist_core::{parse, CoercedValue, FlagSchema};
///
/// let schema = FlagSchema::default().with_flag("k", "key").with_flag("v", "value");
/// let cmd = parse("set --key 'x' -v 10", &schema).unwrap();
///
/// assert_eq!(cmd.name, "set");
/// assert_eq!(cmd.flags.get("key"), Some(&[CoercedValue::Str("x".into())][..]));
/// assert_eq!(cmd.flags.get("value"), Some(&[CoercedValue::Int(10)][..]));
/// assert!(cmd.flags.root().is_empty());
/// ```
pub fn parse(line: &str, schema: &FlagSchema) -> Result<Command> {
    let tokens = tokenize(line)?;
    let mut tokens = tokens.into_iter();
    let name = match tokens.next() {
        Some(token) => token.text,
        None => return Err(ShellError::EmptyCommand),
    };

    let root = FlagDescriptor::root();
    let mut flags = FlagMap::new();
    let mut current: Option<FlagDescriptor> = None;

    for token in tokens {
        if !token.quoted {
            if let Some(long) = token.text.strip_prefix("--") {
                let flag = schema
                    .find_long(long)
                    .ok_or_else(|| ShellError::UnknownFlag(long.to_string()))?;
                flags.reset(flag);
                current = Some(flag.clone());
                continue;
            }
            if let Some(short) = token.text.strip_prefix('-') {
                let flag = schema
                    .find_short(short)
                    .ok_or_else(|| ShellError::UnmappedShortFlag(short.to_string()))?;
                flags.reset(flag);
                current = Some(flag.clone());
                continue;
            }
        }

        let value = coerce(&token.text, token.quoted);
        let literal = match &value {
            CoercedValue::Str(s) => s.clone(),
            _ => token.text,
        };
        flags.push(current.as_ref().unwrap_or(&root), literal, value);
    }

    Ok(Command { name, flags })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FlagSchema {
        FlagSchema::default()
            .with_flag("a", "all")
            .with_flag("l", "limit")
            .with_flag("x", "x")
    }

    fn keys(cmd: &Command) -> Vec<&str> {
        cmd.flags.iter().map(|(key, _)| key.long.as_str()).collect()
    }

    #[test]
    fn test_bare_command_has_empty_root() {
        let cmd = parse("ls", &schema()).unwrap();
        assert_eq!(cmd.name, "ls");
        assert_eq!(keys(&cmd), vec!["ROOT"]);
        assert!(cmd.flags.root().is_empty());
    }

    #[test]
    fn test_short_flag_resolves_to_descriptor() {
        let cmd = parse("ls -l 5", &schema()).unwrap();
        assert_eq!(keys(&cmd), vec!["ROOT", "limit"]);
        assert_eq!(cmd.flags.get("limit"), Some(&[CoercedValue::Int(5)][..]));
    }

    #[test]
    fn test_redeclared_flag_resets_but_keeps_position() {
        let cmd = parse("cmd --x 1 2 --all --x 3", &schema()).unwrap();
        assert_eq!(keys(&cmd), vec!["ROOT", "x", "all"]);
        assert_eq!(cmd.flags.get("x"), Some(&[CoercedValue::Int(3)][..]));
    }

    #[test]
    fn test_short_and_long_forms_share_one_entry() {
        let cmd = parse("ls --limit 1 -l 2", &schema()).unwrap();
        assert_eq!(keys(&cmd), vec!["ROOT", "limit"]);
        assert_eq!(cmd.flags.get("limit"), Some(&[CoercedValue::Int(2)][..]));
    }

    #[test]
    fn test_positionals_before_any_flag_go_to_root() {
        let cmd = parse("cd main extra --all", &schema()).unwrap();
        assert_eq!(
            cmd.flags.root(),
            &[
                CoercedValue::Str("main".into()),
                CoercedValue::Str("extra".into())
            ][..]
        );
        assert_eq!(cmd.flags.get("all"), Some(&[][..]));
    }

    #[test]
    fn test_unknown_long_flag() {
        assert_eq!(
            parse("ls --color", &schema()),
            Err(ShellError::UnknownFlag("color".into()))
        );
        assert_eq!(
            parse("ls --ROOT a", &schema()),
            Err(ShellError::UnknownFlag("ROOT".into()))
        );
        assert_eq!(parse("ls --", &schema()), Err(ShellError::UnknownFlag("".into())));
    }

    #[test]
    fn test_unmapped_short_flag() {
        assert_eq!(
            parse("ls -z", &schema()),
            Err(ShellError::UnmappedShortFlag("z".into()))
        );
        assert_eq!(
            parse("ls -all", &schema()),
            Err(ShellError::UnmappedShortFlag("all".into()))
        );
        assert_eq!(parse("ls -", &schema()), Err(ShellError::UnmappedShortFlag("".into())));
    }

    #[test]
    fn test_quoted_dash_tokens_are_values() {
        let cmd = parse("ls --limit '-5' \"--all\"", &schema()).unwrap();
        assert_eq!(
            cmd.flags.get("limit"),
            Some(&[CoercedValue::Str("-5".into()), CoercedValue::Str("--all".into())][..])
        );
    }

    #[test]
    fn test_tokenizer_errors_surface() {
        assert_eq!(parse("   ", &schema()), Err(ShellError::EmptyCommand));
        assert_eq!(
            parse("ls --limit 'oops", &schema()),
            Err(ShellError::UnterminatedQuote {
                quote: '\'',
                column: 11
            })
        );
    }

    #[test]
    fn test_literal_text_is_kept_beside_numbers() {
        let cmd = parse("ask 007 1.50 --x 1e3 '+5' +5", &schema()).unwrap();
        assert_eq!(cmd.flags.root(), &[CoercedValue::Int(7), CoercedValue::Float(1.5)][..]);
        assert_eq!(
            cmd.flags.literals("ROOT"),
            Some(&["007".to_string(), "1.50".to_string()][..])
        );
        assert_eq!(
            cmd.flags.literals("x"),
            Some(&["1e3".to_string(), "+5".to_string(), "+5".to_string()][..])
        );

        let cmd = parse("cmd --x 1 --x 02", &schema()).unwrap();
        assert_eq!(cmd.flags.literals("x"), Some(&["02".to_string()][..]));
    }

    #[test]
    fn test_into_flags_keys_by_long_name() {
        let cmd = parse("ls -a", &schema()).unwrap();
        let flags: Flags = cmd.flags.into();
        assert!(flags.contains("all"));
        assert!(flags.contains("ROOT"));
        assert_eq!(flags.explicit_count(), 1);
    }
}
