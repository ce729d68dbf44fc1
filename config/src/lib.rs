//! Startup configuration for the labelist shell.
//!
//! Two things are configured before the prompt appears:
//!
//! - the [`Lexicon`](labelist_core::Lexicon): which flags each command
//!   recognizes, plus help text ([`load_lexicon`], [`default_lexicon`]);
//! - the [`Settings`]: inference endpoint, models and database paths, read
//!   from YAML and overridden by environment variables.
//!
//! # Quick start
//!
//! ```no_run
//! use labelist_config::{Settings, default_lexicon, load_lexicon};
//!
//! let mut settings = Settings::resolve(None).unwrap();
//! settings.apply_env();
//!
//! let lexicon = match &settings.lexicon_path {
//!     Some(path) => load_lexicon(path).unwrap(),
//!     None => default_lexicon().unwrap(),
//! };
//! println!("{} commands", lexicon.len());
//! ```

mod error;
mod lexicon;
mod settings;

pub use error::{ConfigError, Result};
pub use lexicon::{
    DEFAULT_LEXICON_YAML, LexiconFormat, default_lexicon, load_lexicon, parse_lexicon,
};
pub use settings::{
    ENV_CONFIG_PATH, ENV_DB_PATH, ENV_EMBEDDING_MODEL, ENV_OLLAMA_ENDPOINT, ENV_OLLAMA_MODEL,
    ENV_STORE_PATH, OllamaSettings, Settings, StorageSettings, data_dir,
};
