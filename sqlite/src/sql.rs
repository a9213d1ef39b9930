//! SQL generation for [`Query`] values.
//!
//! Table and column names cannot be bound as parameters, so they are
//! validated (alphanumerics and underscores only) and double-quoted before
//! being spliced into statement text. Values are always bound.

use rusqlite::types::Value as SqlValue;
use table_model_core::{Comparison, Query, Row, StorageError, StorageResult, Value};

/// Statement text plus its positional parameters.
#[derive(Debug)]
pub(crate) struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Validates that an identifier contains only alphanumeric characters and underscores.
pub(crate) fn validate_identifier(name: &str) -> StorageResult<()> {
    if name.is_empty() {
        return Err(StorageError::InvalidIdentifier(name.to_string()));
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(StorageError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

fn quoted(name: &str) -> StorageResult<String> {
    validate_identifier(name)?;
    Ok(format!("\"{name}\""))
}

pub(crate) fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(n) => SqlValue::Integer(*n),
        Value::Real(r) => SqlValue::Real(*r),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

/// Appends the `WHERE` clause of `query` to `sql`, pushing bound values.
fn push_where(query: &Query, sql: &mut String, params: &mut Vec<SqlValue>) -> StorageResult<()> {
    for (index, filter) in query.filters().iter().enumerate() {
        sql.push_str(if index == 0 { " WHERE " } else { " AND " });
        let column = quoted(&filter.column)?;
        match (&filter.value, filter.comparison) {
            (Value::Null, Comparison::Eq) => sql.push_str(&format!("{column} IS NULL")),
            (Value::Null, Comparison::Ne) => sql.push_str(&format!("{column} IS NOT NULL")),
            (value, comparison) => {
                params.push(to_sql_value(value));
                sql.push_str(&format!("{column} {} ?{}", comparison.as_sql(), params.len()));
            }
        }
    }
    Ok(())
}

/// `SELECT` honoring projection and ordering, optionally limited.
pub(crate) fn select(query: &Query, limit: Option<u32>) -> StorageResult<Statement> {
    let columns = match query.projection() {
        Some(columns) => columns
            .iter()
            .map(|c| quoted(c))
            .collect::<StorageResult<Vec<_>>>()?
            .join(", "),
        None => "*".to_string(),
    };
    let mut sql = format!("SELECT {columns} FROM {}", quoted(query.table())?);
    let mut params = Vec::new();
    push_where(query, &mut sql, &mut params)?;
    if let Some(column) = query.ordering() {
        sql.push_str(&format!(" ORDER BY {}", quoted(column)?));
    }
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    Ok(Statement { sql, params })
}

pub(crate) fn count(query: &Query) -> StorageResult<Statement> {
    let mut sql = format!("SELECT COUNT(*) FROM {}", quoted(query.table())?);
    let mut params = Vec::new();
    push_where(query, &mut sql, &mut params)?;
    Ok(Statement { sql, params })
}

/// `INSERT` returning the stored `primary_key` column.
pub(crate) fn insert(table: &str, primary_key: &str, row: &Row) -> StorageResult<Statement> {
    let table = quoted(table)?;
    let returning = quoted(primary_key)?;
    if row.is_empty() {
        return Ok(Statement {
            sql: format!("INSERT INTO {table} DEFAULT VALUES RETURNING {returning}"),
            params: Vec::new(),
        });
    }
    let columns = row
        .columns()
        .map(quoted)
        .collect::<StorageResult<Vec<_>>>()?
        .join(", ");
    let placeholders = (1..=row.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(Statement {
        sql: format!("INSERT INTO {table} ({columns}) VALUES ({placeholders}) RETURNING {returning}"),
        params: row.values().map(to_sql_value).collect(),
    })
}

/// `UPDATE` setting every column of `row`. `row` must not be empty.
pub(crate) fn update(query: &Query, row: &Row) -> StorageResult<Statement> {
    let mut params: Vec<SqlValue> = Vec::with_capacity(row.len());
    let mut assignments = Vec::with_capacity(row.len());
    for (column, value) in row.iter() {
        params.push(to_sql_value(value));
        assignments.push(format!("{} = ?{}", quoted(column)?, params.len()));
    }
    let mut sql = format!(
        "UPDATE {} SET {}",
        quoted(query.table())?,
        assignments.join(", ")
    );
    push_where(query, &mut sql, &mut params)?;
    Ok(Statement { sql, params })
}

pub(crate) fn delete(query: &Query) -> StorageResult<Statement> {
    let mut sql = format!("DELETE FROM {}", quoted(query.table())?);
    let mut params = Vec::new();
    push_where(query, &mut sql, &mut params)?;
    Ok(Statement { sql, params })
}
