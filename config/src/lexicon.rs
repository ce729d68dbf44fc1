//! Lexicon loading.
//!
//! A lexicon is read once at startup from a JSON or YAML file, or taken from
//! the copy built into the binary, and validated before use.
//!
//! ```no_run
//! use labelist_config::{load_lexicon, default_lexicon};
//!
//! let lexicon = load_lexicon("lexicon.yaml").unwrap();
//! assert!(lexicon.get("ls").is_some());
//!
//! let builtin = default_lexicon().unwrap();
//! assert!(builtin.get("fetch").is_some());
//! ```

use std::path::Path;

use labelist_core::{Lexicon, validate_lexicon};
use tracing::debug;

use crate::error::{ConfigError, Result};

/// The lexicon shipped with the shell.
pub const DEFAULT_LEXICON_YAML: &str = include_str!("../assets/lexicon.yaml");

/// Serialization format of a lexicon file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexiconFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl LexiconFormat {
    /// Picks the format from a file extension, case-insensitively.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnsupportedFormat`] for anything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use labelist_config::LexiconFormat;
    ///
    /// assert_eq!(LexiconFormat::from_path("shell.json").unwrap(), LexiconFormat::Json);
    /// assert_eq!(LexiconFormat::from_path("shell.YML").unwrap(), LexiconFormat::Yaml);
    /// assert!(LexiconFormat::from_path("shell.toml").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(
                path.as_ref().display().to_string(),
            )),
        }
    }
}

/// Parses and validates lexicon text.
///
/// # Errors
///
/// [`ConfigError::JsonError`] / [`ConfigError::YamlError`] on malformed
/// input, [`ConfigError::InvalidLexicon`] when validation fails.
pub fn parse_lexicon(text: &str, format: LexiconFormat) -> Result<Lexicon> {
    let lexicon: Lexicon = match format {
        LexiconFormat::Json => serde_json::from_str(text)?,
        LexiconFormat::Yaml => serde_yaml::from_str(text)?,
    };

    let errors = validate_lexicon(&lexicon);
    if !errors.is_empty() {
        return Err(ConfigError::InvalidLexicon(errors));
    }
    Ok(lexicon)
}

/// Loads a lexicon file, choosing the parser from its extension.
///
/// # Errors
///
/// [`ConfigError::IoError`] if the file cannot be read, plus everything
/// [`parse_lexicon`] returns.
pub fn load_lexicon(path: impl AsRef<Path>) -> Result<Lexicon> {
    let path = path.as_ref();
    let format = LexiconFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    let lexicon = parse_lexicon(&text, format)?;
    debug!(path = %path.display(), commands = lexicon.len(), "lexicon loaded");
    Ok(lexicon)
}

/// The built-in lexicon.
///
/// # Errors
///
/// Only if the embedded asset is itself invalid.
pub fn default_lexicon() -> Result<Lexicon> {
    parse_lexicon(DEFAULT_LEXICON_YAML, LexiconFormat::Yaml)
}
