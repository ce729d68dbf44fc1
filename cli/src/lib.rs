//! The labelist shell: command handlers, console output and model clients
//! wired onto the `labelist-core` REPL.
//!
//! The binary builds an [`AppContext`] from settings, registers the
//! handlers from [`build_registry`] and runs a [`labelist_core::Repl`] over
//! a [`RustylineSource`] (terminal) or a [`PipedSource`] (anything else).
//!
//! ```no_run
//! use labelist_cli::{AppContext, Console, OllamaClient, PipedSource, build_registry};
//! use labelist_cli::embed::embedder_from_settings;
//! use labelist_config::{OllamaSettings, default_lexicon};
//! use labelist_core::{Dispatcher, Repl};
//! use labelist_sqlite::{ConverseStore, GlobalStore};
//!
//! let ollama = OllamaSettings::default();
//! let lexicon = default_lexicon().unwrap();
//! let mut ctx = AppContext {
//!     console: Console::stdout(),
//!     converse: ConverseStore::open("converse.db").unwrap(),
//!     globals: GlobalStore::open("global.db").unwrap(),
//!     lexicon: lexicon.clone(),
//!     inference: Box::new(OllamaClient::from_settings(&ollama).unwrap()),
//!     embedder: embedder_from_settings(&ollama).unwrap(),
//!     ollama,
//! };
//! ctx.initialize().unwrap();
//!
//! let dispatcher = Dispatcher::new(build_registry(), lexicon);
//! let mut source = PipedSource::new(std::io::stdin().lock());
//! Repl::new(&dispatcher).run(&mut ctx, &mut source).unwrap();
//! ```

pub mod commands;
pub mod console;
pub mod context;
pub mod embed;
pub mod inference;
pub mod input;

#[cfg(test)]
mod testing;

pub use commands::build_registry;
pub use console::Console;
pub use context::{AppContext, DEFAULT_TABLE, TABLENAME_KEY, VERBOSE_KEY};
pub use embed::{Embedder, OllamaEmbedder};
pub use inference::{GenerateOptions, InferenceClient, OllamaClient};
pub use input::{PipedSource, RustylineSource};

/// Greeting printed when the shell starts.
pub const WELCOME: &str = "Welcome to Labelist Client for emb2emb.";
