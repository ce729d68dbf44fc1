//! Lexicon validation.
//!
//! Catches structural problems in a loaded lexicon (empty or malformed flag
//! names, duplicates, attempts to redefine ROOT, docs for undeclared flags)
//! before the shell starts accepting input.
//!
//! # Examples
//!
//! ```
//! use labelist_core::*;
//!
//! let mut lexicon = Lexicon::default();
//! lexicon.insert("ls", CommandSpec::new(FlagSchema::default().with_flag("a", "all")));
//! assert!(validate_lexicon(&lexicon).is_empty());
//!
//! // Invalid: short flag written with its dash
//! lexicon.insert("get", CommandSpec::new(FlagSchema::default().with_flag("-k", "key")));
//! assert!(!validate_lexicon(&lexicon).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::schema::{CommandSpec, FlagDescriptor, Lexicon, ROOT};

/// Lexicon validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or contains whitespace.
    #[error("invalid command name: {0:?}")]
    InvalidCommandName(String),
    /// Short flag is not exactly one non-dash character.
    #[error("{command}: invalid short flag format: {flag:?}")]
    InvalidShortFlag {
        /// Owning command.
        command: String,
        /// Offending short form.
        flag: String,
    },
    /// Long flag is empty, starts with a dash or contains whitespace.
    #[error("{command}: invalid long flag format: {flag:?}")]
    InvalidLongFlag {
        /// Owning command.
        command: String,
        /// Offending long form.
        flag: String,
    },
    /// A declared flag tries to take the positional pseudo-flag's name.
    #[error("{command}: flag name {flag:?} is reserved")]
    ReservedFlag {
        /// Owning command.
        command: String,
        /// Offending name.
        flag: String,
    },
    /// Two flags of one command share a name.
    #[error("{command}: duplicate flag: {flag}")]
    DuplicateFlag {
        /// Owning command.
        command: String,
        /// Repeated name.
        flag: String,
    },
    /// A docs addition refers to a flag the command does not declare.
    #[error("{command}: help for undeclared flag: {flag}")]
    UndeclaredFlagDoc {
        /// Owning command.
        command: String,
        /// Documented name.
        flag: String,
    },
}

/// Validates every command in a lexicon, in name order.
pub fn validate_lexicon(lexicon: &Lexicon) -> Vec<ValidationError> {
    lexicon
        .commands
        .iter()
        .flat_map(|(name, spec)| validate_spec(name, spec))
        .collect()
}

/// Validates one command entry.
///
/// A flag that fails its format check is not also checked for duplicates.
///
/// # Examples
///
/// ```
/// use labelist_core::*;
///
/// let spec = CommandSpec::new(
///     FlagSchema::default().with_flag("l", "limit").with_flag("l", "long"),
/// );
/// let errors = validate_spec("fetch", &spec);
/// assert_eq!(
///     errors,
///     vec![ValidationError::DuplicateFlag { command: "fetch".into(), flag: "l".into() }]
/// );
/// ```
pub fn validate_spec(command: &str, spec: &CommandSpec) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if command.is_empty() || command.chars().any(char::is_whitespace) {
        errors.push(ValidationError::InvalidCommandName(command.to_string()));
        return errors;
    }

    let mut shorts = HashSet::new();
    let mut longs = HashSet::new();
    for flag in spec.flags.declared() {
        if flag.is_root() {
            continue;
        }
        if let Some(err) = check_flag(command, flag) {
            errors.push(err);
            continue;
        }
        if !flag.short.is_empty() && !shorts.insert(flag.short.as_str()) {
            errors.push(ValidationError::DuplicateFlag {
                command: command.to_string(),
                flag: flag.short.clone(),
            });
        }
        if !longs.insert(flag.long.as_str()) {
            errors.push(ValidationError::DuplicateFlag {
                command: command.to_string(),
                flag: flag.long.clone(),
            });
        }
    }

    if let Some(docs) = &spec.docs {
        for doc in &docs.additions {
            if spec.flags.find(&doc.flag).is_none() {
                errors.push(ValidationError::UndeclaredFlagDoc {
                    command: command.to_string(),
                    flag: doc.flag.clone(),
                });
            }
        }
    }

    errors
}

fn check_flag(command: &str, flag: &FlagDescriptor) -> Option<ValidationError> {
    if flag.long == ROOT {
        return Some(ValidationError::ReservedFlag {
            command: command.to_string(),
            flag: flag.long.clone(),
        });
    }
    if flag.long.is_empty()
        || flag.long.starts_with('-')
        || flag.long.chars().any(char::is_whitespace)
    {
        return Some(ValidationError::InvalidLongFlag {
            command: command.to_string(),
            flag: flag.long.clone(),
        });
    }
    let mut chars = flag.short.chars();
    let valid_short = match (chars.next(), chars.next()) {
        (None, _) => true,
        (Some(c), None) => c != '-' && !c.is_whitespace(),
        _ => false,
    };
    if !valid_short {
        return Some(ValidationError::InvalidShortFlag {
            command: command.to_string(),
            flag: flag.short.clone(),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CommandDocs, FlagDoc, FlagSchema};

    fn spec(flags: &[(&str, &str)]) -> CommandSpec {
        let schema = flags
            .iter()
            .fold(FlagSchema::default(), |schema, (s, l)| schema.with_flag(s, l));
        CommandSpec::new(schema)
    }

    #[test]
    fn test_validate_spec_accepts_explicit_root_entry() {
        let errors = validate_spec("cd", &spec(&[("", ROOT), ("h", "help")]));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validate_spec_rejects_root_with_short_form() {
        let errors = validate_spec("cd", &spec(&[("r", ROOT)]));
        assert_eq!(
            errors,
            vec![ValidationError::ReservedFlag {
                command: "cd".into(),
                flag: ROOT.into()
            }]
        );
    }

    #[test]
    fn test_validate_spec_rejects_bad_formats() {
        let errors = validate_spec("ls", &spec(&[("ab", "all"), ("o", "--old"), ("d", "")]));
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ValidationError::InvalidShortFlag { .. }));
        assert!(matches!(errors[1], ValidationError::InvalidLongFlag { .. }));
        assert!(matches!(errors[2], ValidationError::InvalidLongFlag { .. }));
    }

    #[test]
    fn test_validate_spec_rejects_duplicate_long() {
        let errors = validate_spec("ls", &spec(&[("a", "all"), ("b", "all")]));
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateFlag {
                command: "ls".into(),
                flag: "all".into()
            }]
        );
    }

    #[test]
    fn test_validate_spec_rejects_docs_for_undeclared_flag() {
        let spec = spec(&[("k", "key")]).with_docs(CommandDocs {
            description: "Gets a setting".into(),
            additions: vec![
                FlagDoc {
                    flag: "k".into(),
                    add: "setting key".into(),
                },
                FlagDoc {
                    flag: "v".into(),
                    add: "nothing".into(),
                },
            ],
            examples: None,
        });

        assert_eq!(
            validate_spec("get", &spec),
            vec![ValidationError::UndeclaredFlagDoc {
                command: "get".into(),
                flag: "v".into()
            }]
        );
    }

    #[test]
    fn test_validate_lexicon_rejects_bad_command_name() {
        let mut lexicon = Lexicon::default();
        lexicon.insert("two words", CommandSpec::default());
        assert_eq!(
            validate_lexicon(&lexicon),
            vec![ValidationError::InvalidCommandName("two words".into())]
        );
    }
}
