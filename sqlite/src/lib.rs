//! SQLite storage backend for table models.
//!
//! [`SqliteStore`] implements the [`Storage`](table_model_core::Storage)
//! capability set over a `rusqlite` connection, so any
//! [`Model`](table_model_core::Model) can run against a SQLite database.
//!
//! # Architecture
//!
//! - **`sql`**: statement generation from immutable query values, with
//!   identifier validation and quoting
//! - **`error`**: classification of constraint violations by extended
//!   result code
//! - **`store`**: the connection wrapper and transaction handling
//!
//! # Quick start
//!
//! ```
//! use table_model_core::{ErrorKind, Model, Row, Saved, Value};
//! use table_model_sqlite::SqliteStore;
//!
//! let store = SqliteStore::open_in_memory().unwrap();
//! store
//!     .execute_batch("CREATE TABLE tags (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE)")
//!     .unwrap();
//!
//! let tags = Model::new(&store, "Tags", "tags");
//! let saved = tags.save(&Row::new().with("name", "rust")).unwrap();
//! assert_eq!(saved, Saved::Inserted(Value::Integer(1)));
//!
//! let err = tags.insert(&Row::new().with("name", "rust")).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ColumnMustBeUnique);
//! ```

mod error;
mod sql;
mod store;

pub use store::SqliteStore;
