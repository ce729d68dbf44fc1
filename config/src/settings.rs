//! Shell settings.
//!
//! Every field has a default, so a settings file only needs the values it
//! changes. Environment variables are applied on top of the file.
//!
//! # Example YAML
//!
//! ```yaml
//! ollama:
//!   endpoint: http://gpu-box:11434
//!   model: llama3.2:3b
//!   embedding_model: nomic-embed-text
//!   timeout_secs: 30
//!   temperature: 0.0
//!   top_p: 0.9
//! storage:
//!   db_path: /var/lib/labelist/converse.db
//!   store_path: /var/lib/labelist/global.db
//! lexicon_path: ./lexicon.json
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Environment variable overriding [`OllamaSettings::endpoint`].
pub const ENV_OLLAMA_ENDPOINT: &str = "OLLAMA_ENDPOINT";
/// Environment variable overriding [`OllamaSettings::model`].
pub const ENV_OLLAMA_MODEL: &str = "OLLAMA_MODEL";
/// Environment variable overriding [`OllamaSettings::embedding_model`].
pub const ENV_EMBEDDING_MODEL: &str = "EMBEDDING_MODEL";
/// Environment variable overriding [`StorageSettings::db_path`].
pub const ENV_DB_PATH: &str = "DB_PATH";
/// Environment variable overriding [`StorageSettings::store_path`].
pub const ENV_STORE_PATH: &str = "STORE_PATH";
/// Environment variable overriding [`Settings::lexicon_path`].
pub const ENV_CONFIG_PATH: &str = "CONFIG_PATH";

/// Inference and embedding server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    /// Base URL, without the `/api/...` suffix.
    pub endpoint: String,
    /// Generation model.
    pub model: String,
    /// Embedding model.
    pub embedding_model: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Default sampling temperature.
    pub temperature: f64,
    /// Nucleus sampling threshold.
    pub top_p: f64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            timeout_secs: 30,
            temperature: 0.0,
            top_p: 0.9,
        }
    }
}

/// SQLite file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Conversation tables.
    pub db_path: PathBuf,
    /// Global key-value store.
    pub store_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        let dir = data_dir();
        Self {
            db_path: dir.join("converse.db"),
            store_path: dir.join("global.db"),
        }
    }
}

/// Per-user data directory, or the working directory when the platform has
/// none.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("labelist"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Top-level settings.
///
/// # Examples
///
/// ```
/// use labelist_config::Settings;
///
/// let settings: Settings = serde_yaml::from_str("ollama:\n  model: mistral\n").unwrap();
/// assert_eq!(settings.ollama.model, "mistral");
/// assert_eq!(settings.ollama.timeout_secs, 30);
/// assert!(settings.lexicon_path.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Inference server.
    pub ollama: OllamaSettings,
    /// Database files.
    pub storage: StorageSettings,
    /// Lexicon file; the built-in lexicon is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexicon_path: Option<PathBuf>,
}

impl Settings {
    /// Default location of the settings file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("labelist").join("settings.yaml"))
    }

    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::ConfigError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::ConfigError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let settings = serde_yaml::from_reader(reader)?;
        Ok(settings)
    }

    /// Loads `path` when given, else the default file if it exists, else
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load). An explicitly given path must exist.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "loading default settings file");
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Saves the settings as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::ConfigError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::ConfigError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`. Empty values are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use labelist_config::Settings;
    ///
    /// let mut settings = Settings::default();
    /// settings.apply_env_with(|key| match key {
    ///     "OLLAMA_MODEL" => Some("mistral".to_string()),
    ///     "DB_PATH" => Some(String::new()),
    ///     _ => None,
    /// });
    /// assert_eq!(settings.ollama.model, "mistral");
    /// assert_eq!(settings.storage.db_path, Settings::default().storage.db_path);
    /// ```
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_OLLAMA_ENDPOINT) {
            self.ollama.endpoint = v;
        }
        if let Some(v) = get(ENV_OLLAMA_MODEL) {
            self.ollama.model = v;
        }
        if let Some(v) = get(ENV_EMBEDDING_MODEL) {
            self.ollama.embedding_model = v;
        }
        if let Some(v) = get(ENV_DB_PATH) {
            self.storage.db_path = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_STORE_PATH) {
            self.storage.store_path = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_CONFIG_PATH) {
            self.lexicon_path = Some(PathBuf::from(v));
        }
    }
}
