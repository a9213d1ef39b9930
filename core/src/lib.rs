//! Active-record style table models.
//!
//! This crate defines the storage-agnostic half of a table model:
//!
//! - [`Model`]: CRUD against one bound table keyed by a configurable
//!   primary-key column, with optional parent-pointer tree mode, a row
//!   quota guard and CSV import.
//! - [`Storage`]: the capability set a backend must provide. The
//!   `table-model-sqlite` crate implements it for SQLite.
//! - [`Query`] / [`Table`]: immutable query values built fresh per call.
//! - [`ModelError`] / [`translate`]: the closed domain error set and the
//!   mapping from [`StorageError`] constraint violations onto it.
//! - [`ModelConfig`]: typed, YAML-loadable model configuration.
//! - [`parse_csv`]: standalone CSV text parser.
//!
//! # Example
//!
//! ```
//! use table_model_core::*;
//!
//! let failure = Failure::from(StorageError::NotNull("tags.name".into()));
//! let err = translate(failure, &ErrorFamily::for_model("Tags"));
//! assert_eq!(err.kind(), ErrorKind::ColumnEmptyNotNull);
//! assert_eq!(err.code(), 3);
//!
//! let records = parse_csv("a;b\n1;2", &CsvOptions::default().with_delimiter(';'));
//! assert_eq!(records[1], vec!["1", "2"]);
//! ```

mod config;
mod csv;
mod error;
mod model;
mod query;
mod storage;
mod translate;
mod value;

pub use config::{ConfigError, ModelConfig};
pub use csv::{CsvOptions, parse_csv};
pub use error::{
    ErrorFamily, ErrorKind, Failure, ModelError, Result, StorageError, StorageResult,
};
pub use model::{ImportMode, ImportReport, Model, Saved};
pub use query::{Comparison, Filter, Query, Table};
pub use storage::Storage;
pub use translate::translate;
pub use value::{Row, Value};
