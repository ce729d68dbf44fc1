//! Error types for conversation and global-store operations.

use labelist_core::ShellError;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Table name is not a plain identifier.
    #[error("invalid table name '{0}': must start with a letter or underscore and contain only alphanumeric characters and underscores")]
    InvalidTableName(String),

    /// `create_table` was asked for a name already in use.
    #[error("Table {0} already exists.")]
    TableExists(String),

    /// The named conversation table does not exist.
    #[error("no such table: {0}")]
    NoSuchTable(String),

    /// A stored row or value could not be decoded.
    #[error("conversion error: {0}")]
    ConversionError(String),

    /// Creating the database's parent directory failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;

/// Storage failures reach the shell as [`ShellError::TableExists`] when the
/// name collides and as [`ShellError::Storage`] otherwise.
impl From<StoreError> for ShellError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TableExists(name) => ShellError::TableExists(name),
            other => ShellError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_exists_keeps_its_category() {
        let err: ShellError = StoreError::TableExists("main".into()).into();
        assert_eq!(err, ShellError::TableExists("main".into()));
        assert_eq!(err.to_string(), "Table main already exists.");
    }

    #[test]
    fn test_other_errors_become_storage() {
        let err: ShellError = StoreError::NoSuchTable("ghost".into()).into();
        assert_eq!(err, ShellError::Storage("no such table: ghost".into()));
        assert_eq!(err.category(), "StorageError");
    }
}
