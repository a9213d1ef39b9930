//! The storage collaborator contract.

use crate::error::{Failure, StorageResult};
use crate::query::Query;
use crate::value::{Row, Value};

/// Capability set a model needs from its storage backend.
///
/// Every method receives a fully built [`Query`]; implementations must not
/// keep per-query state between calls. Constraint violations must surface
/// as the matching [`StorageError`](crate::StorageError) variant so the
/// translator can classify them.
pub trait Storage {
    /// Number of rows matching `query`.
    fn count(&self, query: &Query) -> StorageResult<u64>;

    /// First row matching `query`, if any.
    fn fetch_one(&self, query: &Query) -> StorageResult<Option<Row>>;

    /// All rows matching `query`.
    fn fetch_all(&self, query: &Query) -> StorageResult<Vec<Row>>;

    /// Inserts `row` into `table` and returns the primary-key value as stored.
    ///
    /// This is the key a later lookup will match: a defaulted or generated
    /// key when `row` has none, and the stored form of an explicit one.
    fn insert(&self, table: &str, primary_key: &str, row: &Row) -> StorageResult<Value>;

    /// Sets the columns of `row` on every row matching `query`.
    /// Returns the number of affected rows.
    fn update(&self, query: &Query, row: &Row) -> StorageResult<u64>;

    /// Deletes every row matching `query`. Returns the number removed.
    fn delete(&self, query: &Query) -> StorageResult<u64>;

    /// Runs `f` atomically: its effects are committed when it returns `Ok`
    /// and rolled back when it returns `Err`.
    fn transaction<T, F>(&self, f: F) -> Result<T, Failure>
    where
        F: FnOnce() -> Result<T, Failure>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn count(&self, query: &Query) -> StorageResult<u64> {
        (**self).count(query)
    }

    fn fetch_one(&self, query: &Query) -> StorageResult<Option<Row>> {
        (**self).fetch_one(query)
    }

    fn fetch_all(&self, query: &Query) -> StorageResult<Vec<Row>> {
        (**self).fetch_all(query)
    }

    fn insert(&self, table: &str, primary_key: &str, row: &Row) -> StorageResult<Value> {
        (**self).insert(table, primary_key, row)
    }

    fn update(&self, query: &Query, row: &Row) -> StorageResult<u64> {
        (**self).update(query, row)
    }

    fn delete(&self, query: &Query) -> StorageResult<u64> {
        (**self).delete(query)
    }

    fn transaction<T, F>(&self, f: F) -> Result<T, Failure>
    where
        F: FnOnce() -> Result<T, Failure>,
    {
        (**self).transaction(f)
    }
}
