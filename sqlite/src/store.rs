//! [`Storage`] implementation over a SQLite connection.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, params_from_iter};
use table_model_core::{Failure, Query, Row, Storage, StorageResult, Value};
use tracing::debug;

use crate::error::storage_error;
use crate::sql::{self, Statement};

/// SQLite-backed storage collaborator.
///
/// Foreign key enforcement is switched on for every connection, so
/// `ON DELETE RESTRICT` references surface as
/// [`StorageError::ForeignKey`](table_model_core::StorageError::ForeignKey).
///
/// # Examples
///
/// ```no_run
/// use table_model_core::{Model, Row};
/// use table_model_sqlite::SqliteStore;
///
/// let store = SqliteStore::open("app.db").unwrap();
/// store
///     .execute_batch("CREATE TABLE IF NOT EXISTS tags (id INTEGER PRIMARY KEY, name TEXT)")
///     .unwrap();
///
/// let tags = Model::new(&store, "Tags", "tags");
/// let id = tags.insert(&Row::new().with("name", "rust")).unwrap();
/// println!("{:?}", tags.load(id).unwrap());
/// ```
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path).map_err(storage_error)?;
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory().map_err(storage_error)?;
        Self::from_connection(conn)
    }

    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(storage_error)?;
        Ok(Self { conn })
    }

    /// Runs raw SQL, typically schema setup.
    pub fn execute_batch(&self, sql: &str) -> StorageResult<()> {
        self.conn.execute_batch(sql).map_err(storage_error)
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn execute(&self, stmt: &Statement) -> StorageResult<u64> {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "execute");
        let affected = self
            .conn
            .execute(&stmt.sql, params_from_iter(stmt.params.iter()))
            .map_err(storage_error)?;
        Ok(affected as u64)
    }

    fn query_rows(&self, stmt: &Statement) -> StorageResult<Vec<Row>> {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "query");
        let mut prepared = self.conn.prepare(&stmt.sql).map_err(storage_error)?;
        let names: Vec<String> = prepared
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let rows = prepared
            .query_map(params_from_iter(stmt.params.iter()), |row| {
                let mut out = Row::new();
                for (index, name) in names.iter().enumerate() {
                    out.set(name.as_str(), from_sql_value(row.get_ref(index)?));
                }
                Ok(out)
            })
            .map_err(storage_error)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(storage_error)
    }
}

fn from_sql_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Integer(n),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

impl Storage for SqliteStore {
    fn count(&self, query: &Query) -> StorageResult<u64> {
        let stmt = sql::count(query)?;
        debug!(sql = %stmt.sql, params = stmt.params.len(), "count");
        let count: i64 = self
            .conn
            .query_row(&stmt.sql, params_from_iter(stmt.params.iter()), |row| {
                row.get(0)
            })
            .map_err(storage_error)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn fetch_one(&self, query: &Query) -> StorageResult<Option<Row>> {
        let stmt = sql::select(query, Some(1))?;
        Ok(self.query_rows(&stmt)?.into_iter().next())
    }

    fn fetch_all(&self, query: &Query) -> StorageResult<Vec<Row>> {
        let stmt = sql::select(query, None)?;
        self.query_rows(&stmt)
    }

    fn insert(&self, table: &str, primary_key: &str, row: &Row) -> StorageResult<Value> {
        let stmt = sql::insert(table, primary_key, row)?;
        debug!(sql = %stmt.sql, params = stmt.params.len(), "insert");
        self.conn
            .query_row(&stmt.sql, params_from_iter(stmt.params.iter()), |stored| {
                stored.get_ref(0).map(from_sql_value)
            })
            .map_err(storage_error)
    }

    fn update(&self, query: &Query, row: &Row) -> StorageResult<u64> {
        if row.is_empty() {
            return Ok(0);
        }
        let stmt = sql::update(query, row)?;
        self.execute(&stmt)
    }

    fn delete(&self, query: &Query) -> StorageResult<u64> {
        let stmt = sql::delete(query)?;
        self.execute(&stmt)
    }

    /// Runs `f` in a transaction. When the connection is already inside a
    /// transaction, `f` joins it instead of opening a nested one.
    fn transaction<T, F>(&self, f: F) -> Result<T, Failure>
    where
        F: FnOnce() -> Result<T, Failure>,
    {
        if !self.conn.is_autocommit() {
            return f();
        }
        let tx = self.conn.unchecked_transaction().map_err(storage_error)?;
        match f() {
            Ok(value) => {
                tx.commit().map_err(storage_error)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback() {
                    debug!(error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }
}
