//! Flag schemas and the per-command lexicon.
//!
//! A [`Lexicon`] maps command names to a [`CommandSpec`]: the command's
//! recognized [`FlagDescriptor`]s plus optional documentation consumed by
//! the help renderer. The types deserialize directly from the declarative
//! lexicon file:
//!
//! ```json
//! {
//!   "commands": {
//!     "ls": {
//!       "flags": [{ "short": "a", "long": "all" }],
//!       "docs": {
//!         "description": "Lists conversations",
//!         "additions": [{ "flag": "a", "add": "List every row" }]
//!       }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Long name of the positional pseudo-flag.
pub const ROOT: &str = "ROOT";

/// Identity of one recognized flag.
///
/// Equality and hashing use the `(short, long)` pair. The descriptor
/// `("", "ROOT")` is reserved for unflagged arguments and exists for every
/// command whether or not the lexicon lists it.
///
/// # Examples
///
/// ```
/// use labelist_core::FlagDescriptor;
///
/// let all = FlagDescriptor::new("a", "all");
/// assert!(all.matches("a"));
/// assert!(all.matches("all"));
/// assert!(!all.is_root());
/// assert!(FlagDescriptor::root().is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlagDescriptor {
    /// Single character form, empty for ROOT.
    #[serde(default)]
    pub short: String,
    /// Full name; the stable key handlers look flags up by.
    pub long: String,
}

impl FlagDescriptor {
    /// Creates a descriptor.
    pub fn new(short: impl Into<String>, long: impl Into<String>) -> Self {
        Self {
            short: short.into(),
            long: long.into(),
        }
    }

    /// The positional pseudo-flag.
    pub fn root() -> Self {
        Self::new("", ROOT)
    }

    /// Returns `true` for the positional pseudo-flag.
    pub fn is_root(&self) -> bool {
        self.short.is_empty() && self.long == ROOT
    }

    /// Checks `name` against either the short or the long form.
    pub fn matches(&self, name: &str) -> bool {
        (!self.short.is_empty() && self.short == name) || self.long == name
    }
}

/// The flags one command recognizes.
///
/// Lookups never return the ROOT descriptor: `-`, `--` and `--ROOT` are not
/// ways to address positional arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSchema {
    flags: Vec<FlagDescriptor>,
}

static EMPTY_SCHEMA: FlagSchema = FlagSchema { flags: Vec::new() };

impl FlagSchema {
    /// Creates a schema from descriptors, in declaration order.
    pub fn new(flags: Vec<FlagDescriptor>) -> Self {
        Self { flags }
    }

    /// A schema that recognizes no flags.
    pub fn empty() -> &'static FlagSchema {
        &EMPTY_SCHEMA
    }

    /// Builder-style push.
    pub fn with_flag(mut self, short: &str, long: &str) -> Self {
        self.flags.push(FlagDescriptor::new(short, long));
        self
    }

    /// Declared flags, excluding any explicit ROOT entry.
    pub fn flags(&self) -> impl Iterator<Item = &FlagDescriptor> {
        self.flags.iter().filter(|f| !f.is_root())
    }

    /// All declared entries as written in the lexicon.
    pub fn declared(&self) -> &[FlagDescriptor] {
        &self.flags
    }

    /// Finds a flag by its long name.
    pub fn find_long(&self, long: &str) -> Option<&FlagDescriptor> {
        self.flags().find(|f| f.long == long)
    }

    /// Finds a flag by its short name.
    pub fn find_short(&self, short: &str) -> Option<&FlagDescriptor> {
        if short.is_empty() {
            return None;
        }
        self.flags().find(|f| f.short == short)
    }

    /// Finds a flag by either form, first declaration wins.
    pub fn find(&self, name: &str) -> Option<&FlagDescriptor> {
        self.flags().find(|f| f.matches(name))
    }

    /// Number of declared flags, excluding ROOT.
    pub fn len(&self) -> usize {
        self.flags().count()
    }

    /// Returns `true` if no flags are declared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Help text for one flag, keyed by its short (or long) form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagDoc {
    /// Short or long name of the documented flag.
    pub flag: String,
    /// Help line.
    pub add: String,
}

/// Documentation block rendered by `help`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDocs {
    /// One-paragraph description.
    pub description: String,
    /// Per-flag help lines.
    #[serde(default)]
    pub additions: Vec<FlagDoc>,
    /// Free-form usage examples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
}

impl CommandDocs {
    /// Help line for `flag`, matched against either of its names.
    pub fn flag_help(&self, flag: &FlagDescriptor) -> Option<&str> {
        self.additions
            .iter()
            .find(|doc| flag.matches(&doc.flag))
            .map(|doc| doc.add.as_str())
    }
}

/// Lexicon entry for one command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Recognized flags.
    #[serde(default)]
    pub flags: FlagSchema,
    /// Optional help documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<CommandDocs>,
}

impl CommandSpec {
    /// Creates a spec with the given flags and no docs.
    pub fn new(flags: FlagSchema) -> Self {
        Self { flags, docs: None }
    }

    /// Attaches documentation.
    pub fn with_docs(mut self, docs: CommandDocs) -> Self {
        self.docs = Some(docs);
        self
    }
}

/// Every command's flag schema and docs, keyed by command name.
///
/// # Examples
///
/// ```
/// use labelist_core::{CommandSpec, FlagSchema, Lexicon};
///
/// let mut lexicon = Lexicon::default();
/// lexicon.insert("ls", CommandSpec::new(FlagSchema::default().with_flag("a", "all")));
///
/// assert!(lexicon.schema_for("ls").find_long("all").is_some());
/// assert!(lexicon.schema_for("unknown").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    /// Command entries.
    pub commands: BTreeMap<String, CommandSpec>,
}

impl Lexicon {
    /// Adds or replaces a command entry.
    pub fn insert(&mut self, name: impl Into<String>, spec: CommandSpec) {
        self.commands.insert(name.into(), spec);
    }

    /// Looks up a command entry.
    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    /// Flag schema for `name`; commands without an entry recognize no flags.
    pub fn schema_for(&self, name: &str) -> &FlagSchema {
        self.get(name)
            .map(|spec| &spec.flags)
            .unwrap_or(FlagSchema::empty())
    }

    /// Command names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are defined.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
