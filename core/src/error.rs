//! Error taxonomy shared by the parser, the registry and every handler.
//!
//! Each variant is recoverable at the REPL boundary: the loop renders it
//! under [`ShellError::category`] and resumes with the next statement.

use thiserror::Error;

/// Errors produced while tokenizing, parsing, dispatching or running a
/// command.
///
/// Handler-level variants (`Missing*`, `Excessive*`) carry the complete
/// user-facing message, so handlers can phrase them the way the command's
/// help text does.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShellError {
    /// A blank statement reached the parser.
    #[error("empty command")]
    EmptyCommand,

    /// A quote was opened but never closed.
    #[error("unterminated {quote} quote opened at column {column}")]
    UnterminatedQuote {
        /// The opening quote character.
        quote: char,
        /// Zero-based character offset of the opening quote.
        column: usize,
    },

    /// `--name` is not in the command's flag schema.
    #[error("unknown long flag: --{0}")]
    UnknownFlag(String),

    /// `-x` is not in the command's flag schema.
    #[error("unmapped short flag: -{0}")]
    UnmappedShortFlag(String),

    /// A value could not be used where a specific type is required.
    #[error("{0}")]
    ArgumentValue(String),

    /// The leading word does not name a registered command.
    #[error("{0} is not a valid command.")]
    CommandNotFound(String),

    /// A required flag is absent.
    #[error("{0}")]
    MissingFlag(String),

    /// More flags than the command accepts, or flags that cannot combine.
    #[error("{0}")]
    ExcessiveFlags(String),

    /// A flag received fewer values than it needs.
    #[error("{0}")]
    MissingArg(String),

    /// A flag received more values than it accepts.
    #[error("{0}")]
    ExcessiveArgs(String),

    /// The storage collaborator refused to create a table that exists.
    #[error("Table {0} already exists.")]
    TableExists(String),

    /// Underlying storage failure, passed through as text.
    #[error("{0}")]
    Storage(String),

    /// Network or HTTP failure from the inference or embedding service.
    #[error("{0}")]
    Network(String),
}

impl ShellError {
    /// Returns the category label the console renders in front of the
    /// message.
    ///
    /// An unterminated quote is a tokenizer failure but is reported under
    /// `ArgumentValueError`, the same as any other unusable value.
    ///
    /// # Examples
    ///
    /// ```
    /// use labelist_core::ShellError;
    ///
    /// let err = ShellError::CommandNotFound("foo".into());
    /// assert_eq!(err.category(), "CommandNotFoundError");
    /// assert_eq!(err.to_string(), "foo is not a valid command.");
    ///
    /// let err = ShellError::UnterminatedQuote { quote: '\'', column: 4 };
    /// assert_eq!(err.category(), "ArgumentValueError");
    /// ```
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyCommand => "EmptyCommandError",
            Self::UnterminatedQuote { .. } | Self::ArgumentValue(_) => "ArgumentValueError",
            Self::UnknownFlag(_) => "UnknownFlagError",
            Self::UnmappedShortFlag(_) => "UnmappedShortFlagError",
            Self::CommandNotFound(_) => "CommandNotFoundError",
            Self::MissingFlag(_) => "MissingFlagError",
            Self::ExcessiveFlags(_) => "ExcessiveFlagsError",
            Self::MissingArg(_) => "MissingArgError",
            Self::ExcessiveArgs(_) => "ExcessiveArgsError",
            Self::TableExists(_) => "TableExistsError",
            Self::Storage(_) => "StorageError",
            Self::Network(_) => "NetworkError",
        }
    }
}

/// Convenience alias for results with [`ShellError`].
pub type Result<T> = std::result::Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_have_distinct_categories() {
        assert_eq!(ShellError::EmptyCommand.category(), "EmptyCommandError");
        assert_eq!(
            ShellError::UnknownFlag("x".into()).category(),
            "UnknownFlagError"
        );
        assert_eq!(
            ShellError::UnmappedShortFlag("x".into()).category(),
            "UnmappedShortFlagError"
        );
    }

    #[test]
    fn test_flag_errors_render_with_dashes() {
        assert_eq!(
            ShellError::UnknownFlag("color".into()).to_string(),
            "unknown long flag: --color"
        );
        assert_eq!(
            ShellError::UnmappedShortFlag("z".into()).to_string(),
            "unmapped short flag: -z"
        );
    }

    #[test]
    fn test_table_exists_message() {
        let err = ShellError::TableExists("main".into());
        assert_eq!(err.to_string(), "Table main already exists.");
        assert_eq!(err.category(), "TableExistsError");
    }
}
