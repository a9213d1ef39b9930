//! Immutable table handles and query values.
//!
//! A [`Table`] names the table a model is bound to. Every operation starts
//! from [`Table::query`], which hands out a fresh [`Query`]; builder methods
//! consume the query and return a new one, so filters applied for one call
//! can never leak into the next.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Handle to a bound table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    name: String,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns an unfiltered query over the whole table.
    pub fn query(&self) -> Query {
        Query::new(self.name.clone())
    }
}

/// Comparison operator of a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    /// SQL operator token.
    pub fn as_sql(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "<>",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }
}

/// A single `column <op> value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub comparison: Comparison,
    pub value: Value,
}

/// A filtered, optionally projected view of one table.
///
/// Conditions are combined with `AND`. A `Null` value under
/// [`Comparison::Eq`] matches `IS NULL` rows, and under [`Comparison::Ne`]
/// matches `IS NOT NULL` rows.
///
/// # Examples
///
/// ```
/// use table_model_core::{Comparison, Table};
///
/// let tags = Table::new("tags");
/// let roots = tags.query().filter_eq("parent_id", None::<i64>);
/// let recent = tags.query().filter("id", Comparison::Gt, 10).select(["id", "name"]);
///
/// assert_eq!(roots.filters().len(), 1);
/// assert!(tags.query().filters().is_empty());
/// assert_eq!(recent.projection(), Some(&["id".to_string(), "name".to_string()][..]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    table: String,
    filters: Vec<Filter>,
    projection: Option<Vec<String>>,
    order_by: Option<String>,
}

impl Query {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            projection: None,
            order_by: None,
        }
    }

    /// Adds a `column = value` condition.
    #[must_use]
    pub fn filter_eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, Comparison::Eq, value)
    }

    /// Adds a `column <comparison> value` condition.
    #[must_use]
    pub fn filter(
        mut self,
        column: impl Into<String>,
        comparison: Comparison,
        value: impl Into<Value>,
    ) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            comparison,
            value: value.into(),
        });
        self
    }

    /// Restricts the fetched columns. An empty list selects everything.
    #[must_use]
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        self.projection = if columns.is_empty() {
            None
        } else {
            Some(columns)
        };
        self
    }

    /// Orders fetched rows by `column`, ascending.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn projection(&self) -> Option<&[String]> {
        self.projection.as_deref()
    }

    pub fn ordering(&self) -> Option<&str> {
        self.order_by.as_deref()
    }
}
