//! SQLite storage for the labelist shell.
//!
//! Two stores live here:
//!
//! - [`ConverseStore`]: named conversation tables holding prompt/answer
//!   pairs and their embeddings;
//! - [`GlobalStore`]: a typed key-value table for shell state such as the
//!   current table pointer.
//!
//! # Architecture
//!
//! - **`schema`**: SQL generation and table-name validation
//! - **`converse`**: record types and the vector text encoding
//! - **`store`**: conversation table operations
//! - **`global`**: the key-value store
//!
//! # Quick start
//!
//! ```no_run
//! use labelist_sqlite::{ConverseStore, FetchOptions, GlobalStore, StoredValue};
//!
//! let globals = GlobalStore::open("global.db").unwrap();
//! globals.set_default("tablename", &StoredValue::from("main")).unwrap();
//!
//! let store = ConverseStore::open("converse.db").unwrap();
//! for table in store.list_tables().unwrap() {
//!     println!("{} ({} rows)", table.name, table.rows);
//! }
//! let recent = store.fetch("main", &FetchOptions::latest(10)).unwrap();
//! ```
//!
//! Table names must be plain identifiers (see [`validate_table_name`]);
//! they are spliced into SQL and so are checked before every statement.

mod converse;
mod error;
mod global;
mod schema;
mod store;

pub use converse::{Converse, StoredConverse, decode_vector, encode_vector};
pub use error::{Result, StoreError};
pub use global::{GlobalStore, StoreEntry, StoredValue};
pub use schema::{
    GLOBAL_STORE_TABLE, generate_converse_table_sql, generate_fetch_sql,
    generate_global_store_sql, validate_table_name,
};
pub use store::{ConverseStore, FetchOptions, TableSummary};
