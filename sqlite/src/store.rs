//! Conversation tables.
//!
//! [`ConverseStore`] owns the connection to the conversation database and
//! provides the four operations the shell needs: create a table, insert a
//! pair, fetch pairs and list tables.
//!
//! # Example
//!
//! ```
//! use labelist_sqlite::{Converse, ConverseStore, FetchOptions};
//!
//! let store = ConverseStore::open_in_memory().unwrap();
//! store.create_table("main").unwrap();
//! store
//!     .insert("main", &Converse::new("hi", "hello", vec![0.1, 0.2], vec![0.3, 0.4]))
//!     .unwrap();
//!
//! let rows = store.fetch("main", &FetchOptions::all()).unwrap();
//! assert_eq!(rows[0].converse.answer, "hello");
//! ```

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::converse::{Converse, ConverseRow, StoredConverse, encode_vector};
use crate::error::{Result, StoreError};
use crate::schema::{
    GLOBAL_STORE_TABLE, generate_converse_table_sql, generate_fetch_sql, validate_table_name,
};

/// Which rows [`ConverseStore::fetch`] returns, and in what order.
///
/// `limit` rows are taken from the oldest end when `oldest_first` is set and
/// from the newest end otherwise; the selection is then sorted by id,
/// ascending or descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Maximum number of rows, `None` for all.
    pub limit: Option<u32>,
    /// Select from the oldest rows instead of the newest.
    pub oldest_first: bool,
    /// Output order by id.
    pub ascending: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::all()
    }
}

impl FetchOptions {
    /// Every row, ascending.
    pub fn all() -> Self {
        Self {
            limit: None,
            oldest_first: false,
            ascending: true,
        }
    }

    /// The newest `limit` rows, ascending.
    pub fn latest(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::all()
        }
    }

    /// Builder-style setter for [`oldest_first`](Self::oldest_first).
    pub fn oldest_first(mut self, oldest_first: bool) -> Self {
        self.oldest_first = oldest_first;
        self
    }

    /// Builder-style setter for [`ascending`](Self::ascending).
    pub fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }
}

/// One table and its row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    /// Table name.
    pub name: String,
    /// Number of rows.
    pub rows: u64,
}

/// Conversation database.
pub struct ConverseStore {
    conn: Connection,
}

impl std::fmt::Debug for ConverseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverseStore")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl ConverseStore {
    /// Wraps an open connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (or creates) the database file, creating parent directories.
    ///
    /// # Errors
    ///
    /// [`StoreError::IoError`] or [`StoreError::DatabaseError`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened conversation database");
        Ok(Self::new(conn))
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// [`StoreError::DatabaseError`].
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Connection::open_in_memory()?))
    }

    /// The underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns `true` if a table with this name exists. SQLite table names
    /// are case-insensitive.
    ///
    /// # Errors
    ///
    /// [`StoreError::DatabaseError`].
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn require_table(&self, name: &str) -> Result<()> {
        validate_table_name(name)?;
        if !self.table_exists(name)? {
            return Err(StoreError::NoSuchTable(name.to_string()));
        }
        Ok(())
    }

    /// Creates an empty conversation table.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidTableName`], or [`StoreError::TableExists`] if
    /// any table already uses the name.
    pub fn create_table(&self, name: &str) -> Result<()> {
        let sql = generate_converse_table_sql(name)?;
        if self.table_exists(name)? {
            return Err(StoreError::TableExists(name.to_string()));
        }
        self.conn.execute_batch(&sql)?;
        info!(table = name, "created conversation table");
        Ok(())
    }

    /// Inserts a pair and returns its row id.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidTableName`], [`StoreError::NoSuchTable`] or
    /// [`StoreError::DatabaseError`].
    pub fn insert(&self, table: &str, converse: &Converse) -> Result<i64> {
        self.require_table(table)?;
        self.conn.execute(
            &format!(r#"INSERT INTO "{table}" (prompt, answer, veci, veco) VALUES (?1, ?2, ?3, ?4)"#),
            params![
                converse.prompt,
                converse.answer,
                encode_vector(&converse.veci),
                encode_vector(&converse.veco),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(table, id, "inserted conversation");
        Ok(id)
    }

    /// Reads conversations according to `options`.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidTableName`], [`StoreError::NoSuchTable`],
    /// [`StoreError::DatabaseError`] or [`StoreError::ConversionError`] for a
    /// row that does not decode.
    pub fn fetch(&self, table: &str, options: &FetchOptions) -> Result<Vec<StoredConverse>> {
        self.require_table(table)?;
        let sql = generate_fetch_sql(table, options.oldest_first, options.ascending)?;
        let limit = options.limit.map_or(-1, i64::from);

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![limit], ConverseRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(table, count = rows.len(), "fetched conversations");
        rows.into_iter().map(ConverseRow::decode).collect()
    }

    /// Lists user tables with row counts, sorted by name. SQLite's internal
    /// tables and the global store table are left out.
    ///
    /// # Errors
    ///
    /// [`StoreError::DatabaseError`].
    pub fn list_tables(&self) -> Result<Vec<TableSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' AND name != ?1 \
             ORDER BY name",
        )?;
        let names: Vec<String> = stmt
            .query_map(params![GLOBAL_STORE_TABLE], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            let rows: i64 =
                self.conn
                    .query_row(&format!(r#"SELECT COUNT(*) FROM "{name}""#), [], |row| {
                        row.get(0)
                    })?;
            tables.push(TableSummary {
                name,
                rows: u64::try_from(rows).unwrap_or(0),
            });
        }
        Ok(tables)
    }
}
