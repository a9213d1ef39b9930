//! Classification of SQLite failures.
//!
//! Constraint violations are told apart by their extended result code and
//! reported as the matching [`StorageError`] variant; everything else is a
//! [`StorageError::Backend`].

use rusqlite::ErrorCode;
use rusqlite::ffi;
use table_model_core::StorageError;

/// Converts a `rusqlite` error into a [`StorageError`].
pub(crate) fn storage_error(err: rusqlite::Error) -> StorageError {
    let Some((extended_code, detail)) = constraint_details(&err) else {
        return StorageError::backend(err);
    };
    match extended_code {
        ffi::SQLITE_CONSTRAINT_NOTNULL => StorageError::NotNull(detail),
        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            StorageError::Unique(detail)
        }
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => StorageError::ForeignKey(detail),
        _ => StorageError::backend(err),
    }
}

/// Extended code and message of a constraint violation.
fn constraint_details(err: &rusqlite::Error) -> Option<(std::ffi::c_int, String)> {
    match err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            let detail = message.clone().unwrap_or_else(|| failure.to_string());
            Some((failure.extended_code, detail))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE tags (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);
             CREATE TABLE posts (
                 id INTEGER PRIMARY KEY,
                 tag_id INTEGER REFERENCES tags(id) ON DELETE RESTRICT,
                 score INTEGER CHECK (score >= 0)
             );
             INSERT INTO tags (id, name) VALUES (1, 'a');
             INSERT INTO posts (id, tag_id) VALUES (1, 1);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_not_null() {
        let err = conn()
            .execute("INSERT INTO tags (id) VALUES (2)", [])
            .unwrap_err();
        assert!(matches!(storage_error(err), StorageError::NotNull(_)));
    }

    #[test]
    fn test_unique_and_primary_key() {
        let conn = conn();
        let err = conn
            .execute("INSERT INTO tags (name) VALUES ('a')", [])
            .unwrap_err();
        assert!(matches!(storage_error(err), StorageError::Unique(_)));

        let err = conn
            .execute("INSERT INTO tags (id, name) VALUES (1, 'b')", [])
            .unwrap_err();
        assert!(matches!(storage_error(err), StorageError::Unique(_)));
    }

    #[test]
    fn test_foreign_key_restrict() {
        let conn = conn();
        let err = conn.execute("DELETE FROM tags WHERE id = 1", []).unwrap_err();
        assert!(matches!(storage_error(err), StorageError::ForeignKey(_)));

        let err = conn
            .execute("INSERT INTO posts (tag_id) VALUES (99)", [])
            .unwrap_err();
        assert!(matches!(storage_error(err), StorageError::ForeignKey(_)));
    }

    #[test]
    fn test_other_failures_are_backend() {
        let conn = conn();
        let err = conn
            .execute("INSERT INTO posts (score) VALUES (-1)", [])
            .unwrap_err();
        assert!(matches!(storage_error(err), StorageError::Backend(_)));

        let err = conn.execute("SELECT * FROM missing", []).unwrap_err();
        assert!(matches!(storage_error(err), StorageError::Backend(_)));
    }
}
