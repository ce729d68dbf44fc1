//! SQL generation for conversation tables and the global store.
//!
//! Conversation tables are created on demand under user-chosen names, so
//! every name is checked with [`validate_table_name`] before it is spliced
//! into SQL. Identifiers are additionally double-quoted.
//!
//! # Table structure
//!
//! - `<name>`: one row per prompt/answer pair with both embeddings, stored
//!   as space-separated floats
//! - `mem_global_store`: typed key-value pairs with creation and update
//!   times in seconds since the epoch

use crate::error::{Result, StoreError};

/// Name of the key-value table.
pub const GLOBAL_STORE_TABLE: &str = "mem_global_store";

/// Checks that `name` is a plain identifier: a letter or underscore, then
/// letters, digits or underscores. Names starting with `sqlite_` are
/// reserved by SQLite.
///
/// # Errors
///
/// Returns [`StoreError::InvalidTableName`] otherwise.
///
/// # Examples
///
/// ```
/// use labelist_sqlite::validate_table_name;
///
/// assert!(validate_table_name("main").is_ok());
/// assert!(validate_table_name("_archive_2025").is_ok());
/// assert!(validate_table_name("2025").is_err());
/// assert!(validate_table_name("drop table").is_err());
/// assert!(validate_table_name("sqlite_master").is_err());
/// ```
pub fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if !valid || name.to_ascii_lowercase().starts_with("sqlite_") {
        return Err(StoreError::InvalidTableName(name.to_string()));
    }
    Ok(())
}

/// `CREATE TABLE` statement for a conversation table.
///
/// # Errors
///
/// Returns [`StoreError::InvalidTableName`] for a bad name.
pub fn generate_converse_table_sql(name: &str) -> Result<String> {
    validate_table_name(name)?;
    Ok(format!(
        r#"
CREATE TABLE "{name}" (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp DATETIME DEFAULT CURRENT_TIMESTAMP,
    prompt TEXT NOT NULL,
    answer TEXT NOT NULL,
    veci TEXT NOT NULL,
    veco TEXT NOT NULL
);
"#
    ))
}

/// `CREATE TABLE IF NOT EXISTS` statement for the key-value table.
pub fn generate_global_store_sql() -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {GLOBAL_STORE_TABLE} (
    key TEXT PRIMARY KEY,
    value TEXT,
    type TEXT,
    created_at REAL,
    updated_at REAL
);
"#
    )
}

/// Two-level select: the inner query picks which rows (oldest or newest
/// `?1`, where `-1` means all), the outer query sets the output order.
///
/// # Errors
///
/// Returns [`StoreError::InvalidTableName`] for a bad name.
pub fn generate_fetch_sql(name: &str, oldest_first: bool, ascending: bool) -> Result<String> {
    validate_table_name(name)?;
    let inner = if oldest_first { "ASC" } else { "DESC" };
    let outer = if ascending { "ASC" } else { "DESC" };
    Ok(format!(
        r#"
SELECT id, timestamp, prompt, answer, veci, veco
FROM (
    SELECT * FROM "{name}"
    ORDER BY id {inner}
    LIMIT ?1
)
ORDER BY id {outer}
"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_table_name_rejects_injection() {
        for bad in ["", "a-b", "a b", "x;DROP TABLE main", "\"q\"", "名前", "SQLITE_sequence"] {
            assert!(
                matches!(validate_table_name(bad), Err(StoreError::InvalidTableName(_))),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn test_converse_sql_has_all_columns() {
        let sql = generate_converse_table_sql("main").unwrap();
        for column in ["id", "timestamp", "prompt", "answer", "veci", "veco"] {
            assert!(sql.contains(column), "missing {column}");
        }
        assert!(sql.contains("CREATE TABLE \"main\""));
    }

    #[test]
    fn test_fetch_sql_orders() {
        let sql = generate_fetch_sql("t", true, false).unwrap();
        assert!(sql.contains("ORDER BY id ASC\n    LIMIT ?1"));
        assert!(sql.trim_end().ends_with("ORDER BY id DESC"));
    }

    #[test]
    fn test_global_store_sql_executes() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(&generate_global_store_sql()).unwrap();
        conn.execute_batch(&generate_global_store_sql()).unwrap();
    }
}
