//! Persistent, typed key-value store.
//!
//! Values keep their type across restarts: each row records a type tag next
//! to the text encoding, and [`GlobalStore::get`] rebuilds the original
//! [`StoredValue`] variant from it.
//!
//! # Example
//!
//! ```
//! use labelist_sqlite::{GlobalStore, StoredValue};
//!
//! let store = GlobalStore::open_in_memory().unwrap();
//! store.set("tablename", &StoredValue::from("main")).unwrap();
//! store.set("verbose", &StoredValue::Bool(true)).unwrap();
//!
//! assert_eq!(store.get("verbose").unwrap(), Some(StoredValue::Bool(true)));
//! assert_eq!(store.get_str("tablename").unwrap().as_deref(), Some("main"));
//! assert_eq!(store.get("missing").unwrap(), None);
//! ```

use std::fmt;
use std::path::Path;

use chrono::Utc;
use labelist_core::CoercedValue;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::schema::{GLOBAL_STORE_TABLE, generate_global_store_sql};

/// A value in the global store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// Structured JSON (objects and arrays).
    Json(serde_json::Value),
    /// Boolean, stored as `1`/`0`.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// Raw bytes, stored hex-encoded.
    Bytes(Vec<u8>),
    /// Text.
    Str(String),
}

impl StoredValue {
    /// Type tag written to the `type` column.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Json(_) => "json",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bytes(_) => "bytes",
            Self::Str(_) => "str",
        }
    }

    /// Text written to the `value` column.
    pub fn encode(&self) -> String {
        match self {
            Self::Json(v) => v.to_string(),
            Self::Bool(b) => String::from(if *b { "1" } else { "0" }),
            Self::Int(n) => n.to_string(),
            Self::Float(x) => x.to_string(),
            Self::Bytes(bytes) => bytes.iter().map(|b| format!("{b:02x}")).collect(),
            Self::Str(s) => s.clone(),
        }
    }

    /// Rebuilds a value from its tag and text.
    ///
    /// # Errors
    ///
    /// [`StoreError::ConversionError`] for an unknown tag or text that does
    /// not parse as the tagged type.
    pub fn decode(tag: &str, text: &str) -> Result<Self> {
        let bad = |reason: String| {
            StoreError::ConversionError(format!("{tag} value '{text}': {reason}"))
        };
        match tag {
            "json" => serde_json::from_str(text)
                .map(Self::Json)
                .map_err(|e| bad(e.to_string())),
            "bool" => match text {
                "1" => Ok(Self::Bool(true)),
                "0" => Ok(Self::Bool(false)),
                _ => Err(bad("expected 1 or 0".into())),
            },
            "int" => text.parse().map(Self::Int).map_err(|e| bad(e.to_string())),
            "float" => text.parse().map(Self::Float).map_err(|e| bad(e.to_string())),
            "bytes" => decode_hex(text).map(Self::Bytes).ok_or_else(|| bad("bad hex".into())),
            "str" => Ok(Self::Str(text.to_string())),
            other => Err(StoreError::ConversionError(format!("unknown value type '{other}'"))),
        }
    }

    /// The text payload of a [`Str`](Self::Str) value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The payload of a [`Bool`](Self::Bool) value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

fn decode_hex(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 || !text.is_ascii() {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).ok())
        .collect()
}

impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Float(x) => write!(f, "{x:?}"),
            other => f.write_str(&other.encode()),
        }
    }
}

impl From<&str> for StoredValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<CoercedValue> for StoredValue {
    fn from(value: CoercedValue) -> Self {
        match value {
            CoercedValue::Bool(b) => Self::Bool(b),
            CoercedValue::Int(n) => Self::Int(n),
            CoercedValue::Float(x) => Self::Float(x),
            CoercedValue::Str(s) => Self::Str(s),
        }
    }
}

/// A stored value with its bookkeeping times (seconds since the epoch).
#[derive(Debug, Clone, PartialEq)]
pub struct StoreEntry {
    /// The value.
    pub value: StoredValue,
    /// First write.
    pub created_at: f64,
    /// Latest write.
    pub updated_at: f64,
}

/// Key-value store backed by the `mem_global_store` table.
pub struct GlobalStore {
    conn: Connection,
}

impl fmt::Debug for GlobalStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalStore")
            .field("path", &self.conn.path())
            .finish()
    }
}

fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

impl GlobalStore {
    /// Wraps a connection, creating the table if needed.
    ///
    /// # Errors
    ///
    /// [`StoreError::DatabaseError`].
    pub fn new(conn: Connection) -> Result<Self> {
        conn.execute_batch(&generate_global_store_sql())?;
        Ok(Self { conn })
    }

    /// Opens (or creates) the store file, creating parent directories.
    ///
    /// # Errors
    ///
    /// [`StoreError::IoError`] or [`StoreError::DatabaseError`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::new(Connection::open(path)?)
    }

    /// Opens a private in-memory store.
    ///
    /// # Errors
    ///
    /// [`StoreError::DatabaseError`].
    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Inserts or replaces `key`. An existing key keeps its `created_at`.
    ///
    /// # Errors
    ///
    /// [`StoreError::DatabaseError`].
    pub fn set(&self, key: &str, value: &StoredValue) -> Result<()> {
        let now = now_secs();
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {GLOBAL_STORE_TABLE} (key, value, type, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, COALESCE((SELECT created_at FROM {GLOBAL_STORE_TABLE} WHERE key = ?1), ?4), ?4)"
            ),
            params![key, value.encode(), value.type_tag(), now],
        )?;
        debug!(key, kind = value.type_tag(), "global store write");
        Ok(())
    }

    /// Reads `key` with its timestamps.
    ///
    /// # Errors
    ///
    /// [`StoreError::DatabaseError`] or [`StoreError::ConversionError`].
    pub fn entry(&self, key: &str) -> Result<Option<StoreEntry>> {
        let row: Option<(String, String, f64, f64)> = self
            .conn
            .query_row(
                &format!(
                    "SELECT value, type, created_at, updated_at FROM {GLOBAL_STORE_TABLE} WHERE key = ?1"
                ),
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        row.map(|(text, tag, created_at, updated_at)| {
            Ok(StoreEntry {
                value: StoredValue::decode(&tag, &text)?,
                created_at,
                updated_at,
            })
        })
        .transpose()
    }

    /// Reads `key`.
    ///
    /// # Errors
    ///
    /// Same as [`entry`](Self::entry).
    pub fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        Ok(self.entry(key)?.map(|entry| entry.value))
    }

    /// Reads `key` rendered as text, whatever its stored type.
    ///
    /// # Errors
    ///
    /// Same as [`entry`](Self::entry).
    pub fn get_str(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key)?.map(|value| match value {
            StoredValue::Str(s) => s,
            other => other.to_string(),
        }))
    }

    /// Writes `value` only when `key` is absent. Returns `true` if written.
    ///
    /// # Errors
    ///
    /// [`StoreError::DatabaseError`].
    pub fn set_default(&self, key: &str, value: &StoredValue) -> Result<bool> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                &format!("SELECT 1 FROM {GLOBAL_STORE_TABLE} WHERE key = ?1"),
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Ok(false);
        }
        self.set(key, value)?;
        Ok(true)
    }

    /// Removes `key`. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// [`StoreError::DatabaseError`].
    pub fn delete(&self, key: &str) -> Result<bool> {
        let n = self.conn.execute(
            &format!("DELETE FROM {GLOBAL_STORE_TABLE} WHERE key = ?1"),
            params![key],
        )?;
        Ok(n > 0)
    }

    /// All keys, sorted.
    ///
    /// # Errors
    ///
    /// [`StoreError::DatabaseError`].
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT key FROM {GLOBAL_STORE_TABLE} ORDER BY key"))?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}
