//! Table models: CRUD, parent-pointer trees, quota guard and CSV import.
//!
//! A [`Model`] is bound to one table of a [`Storage`] backend and addresses
//! rows through a configurable primary-key column. Reads return the raw
//! [`StorageError`](crate::StorageError); every mutating operation funnels
//! its failures through [`translate`] and returns exactly one [`ModelError`].
//!
//! # Tree mode
//!
//! Setting a parent column turns the table into a forest: each row may point
//! at its parent's primary key. [`Model::delete_one`] then removes all
//! descendants depth-first before the row itself, inside one transaction.
//! No cycle check is performed.

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::ModelConfig;
use crate::csv::{CsvOptions, parse_csv};
use crate::error::{
    ErrorFamily, ErrorKind, Failure, ModelError, Result, StorageError, StorageResult,
};
use crate::query::{Query, Table};
use crate::storage::Storage;
use crate::translate::translate;
use crate::value::{Row, Value};

/// Outcome of [`Model::save`].
#[derive(Debug, Clone, PartialEq)]
pub enum Saved {
    /// A new row was inserted with this primary-key value.
    Inserted(Value),
    /// An existing row was updated; the number of affected rows.
    Updated(u64),
}

impl Saved {
    /// The inserted primary key, or `None` for updates.
    pub fn inserted_id(&self) -> Option<&Value> {
        match self {
            Saved::Inserted(id) => Some(id),
            Saved::Updated(_) => None,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Saved::Inserted(_))
    }
}

/// Whether [`Model::import_csv`] keeps the existing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Delete every row before importing.
    Replace,
    /// Add the imported rows to the existing ones.
    Append,
}

/// Summary of a CSV import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub rows_inserted: u64,
    pub rows_removed: u64,
}

/// Active-record style access to one table.
///
/// # Examples
///
/// ```ignore
/// let store = SqliteStore::open_in_memory()?;
/// let mut tags = Model::new(&store, "Tags", "tags");
/// tags.set_parent_column(Some("parent_id"));
///
/// let root = tags.insert(&Row::new().with("name", "lang"))?;
/// tags.insert(&Row::new().with("name", "rust").with("parent_id", root.clone()))?;
/// assert!(tags.has_children(root.clone())?);
///
/// tags.delete_one(root)?;
/// ```
pub struct Model<S> {
    storage: S,
    name: String,
    config: ModelConfig,
    table: Table,
    error_family: ErrorFamily,
}

impl<S: Storage> Model<S> {
    /// Creates a model named `name` bound to `table` with default settings.
    ///
    /// The error family defaults to `<name>Error`.
    pub fn new(storage: S, name: &str, table: &str) -> Self {
        let config = ModelConfig {
            table: Some(table.to_string()),
            ..ModelConfig::default()
        };
        Self::from_config(storage, name, config)
    }

    /// Creates a model from a configuration.
    ///
    /// The table defaults to the model name when `config.table` is unset,
    /// and `config.error_family` overrides the default family.
    pub fn from_config(storage: S, name: &str, config: ModelConfig) -> Self {
        let table = Table::new(config.table.as_deref().unwrap_or(name));
        let error_family = config
            .error_family
            .clone()
            .map_or_else(|| ErrorFamily::for_model(name), ErrorFamily::new);
        Self {
            storage,
            name: name.to_string(),
            config,
            table,
            error_family,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // -- configuration ------------------------------------------------------

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Replaces the configuration. The bound table and error family are kept
    /// and written back into the new configuration.
    pub fn set_config(&mut self, config: ModelConfig) {
        self.config = config;
        self.config.table = Some(self.table.name().to_string());
        self.config.error_family = Some(self.error_family.as_str().to_string());
    }

    /// Stores an application setting under `key`.
    pub fn add_config(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.config.extra.insert(key.into(), value.into());
    }

    pub fn license(&self) -> Option<&str> {
        self.config.license.as_deref()
    }

    pub fn modules(&self) -> Option<&[String]> {
        self.config.modules.as_deref()
    }

    pub fn primary_key(&self) -> &str {
        &self.config.primary_key
    }

    pub fn set_primary_key(&mut self, column: impl Into<String>) {
        self.config.primary_key = column.into();
    }

    pub fn error_family(&self) -> &ErrorFamily {
        &self.error_family
    }

    pub fn set_error_family(&mut self, family: ErrorFamily) {
        self.config.error_family = Some(family.as_str().to_string());
        self.error_family = family;
    }

    // -- table binding ------------------------------------------------------

    /// Binds the model to `name`; all later operations query this table.
    pub fn bind_table(&mut self, name: &str) -> &Table {
        self.table = Table::new(name);
        self.config.table = Some(name.to_string());
        &self.table
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Fresh query over every row of the bound table.
    pub fn all(&self) -> Query {
        self.table.query()
    }

    fn by_id(&self, id: Value) -> Query {
        self.table.query().filter_eq(self.primary_key(), id)
    }

    // -- reads ----------------------------------------------------------------

    /// Loads the row whose primary key equals `id`.
    ///
    /// Returns `Ok(None)` when no row matches. If several rows match, the
    /// first one is returned.
    pub fn load(&self, id: impl Into<Value>) -> StorageResult<Option<Row>> {
        let query = self.by_id(id.into());
        debug!(table = self.table.name(), "load");
        self.storage.fetch_one(&query)
    }

    /// Loads a row and deserializes it into `T`.
    pub fn load_as<T: DeserializeOwned>(&self, id: impl Into<Value>) -> StorageResult<Option<T>> {
        self.load(id)?
            .map(|row| row.deserialize_into().map_err(StorageError::backend))
            .transpose()
    }

    /// Returns `true` if at least one row has `key == value`.
    pub fn exists(&self, key: &str, value: impl Into<Value>) -> StorageResult<bool> {
        let query = self.table.query().filter_eq(key, value);
        Ok(self.storage.count(&query)? > 0)
    }

    pub fn count(&self, query: &Query) -> StorageResult<u64> {
        self.storage.count(query)
    }

    /// Materializes `query`, optionally projecting `fields`.
    pub fn rows(&self, query: Query, fields: &[&str]) -> StorageResult<Vec<Row>> {
        let query = query.select(fields.iter().copied());
        self.storage.fetch_all(&query)
    }

    // -- tree -----------------------------------------------------------------

    /// Sets the parent column. `None` or an empty name disables tree mode.
    pub fn set_parent_column(&mut self, column: Option<&str>) {
        self.config.parent_column = column.filter(|c| !c.is_empty()).map(str::to_string);
    }

    pub fn parent_column(&self) -> Option<&str> {
        self.config
            .parent_column
            .as_deref()
            .filter(|c| !c.is_empty())
    }

    /// Returns `true` if any row names `id` as its parent.
    ///
    /// Always `false` when tree mode is disabled.
    pub fn has_children(&self, id: impl Into<Value>) -> StorageResult<bool> {
        match self.children(id) {
            Some(query) => Ok(self.storage.count(&query)? > 0),
            None => Ok(false),
        }
    }

    /// Query over the direct children of `id`, or `None` without tree mode.
    pub fn children(&self, id: impl Into<Value>) -> Option<Query> {
        let parent = self.parent_column()?;
        Some(self.table.query().filter_eq(parent, id))
    }

    // -- writes ---------------------------------------------------------------

    /// Inserts or updates `data`.
    ///
    /// Inserts when the primary-key field is missing or unset (see
    /// [`Value::is_unset`]; an unset key is dropped from the inserted row) or
    /// when no row carries that key. Otherwise updates the existing row.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::UnsetPrimaryKey`] when the model has no primary-key
    /// column, or any translated storage failure.
    pub fn save(&self, data: &Row) -> Result<Saved> {
        self.require_primary_key()?;
        let key = self.primary_key();

        match data.get(key) {
            Some(id) if !id.is_unset() => {
                let present = self
                    .storage
                    .count(&self.by_id(id.clone()))
                    .map_err(|e| self.fail(e))?;
                if present == 0 {
                    self.insert(data).map(Saved::Inserted)
                } else {
                    self.update(data).map(Saved::Updated)
                }
            }
            Some(_) => {
                let mut data = data.clone();
                data.remove(key);
                self.insert(&data).map(Saved::Inserted)
            }
            None => self.insert(data).map(Saved::Inserted),
        }
    }

    /// Inserts one row and returns its primary-key value.
    pub fn insert(&self, data: &Row) -> Result<Value> {
        debug!(table = self.table.name(), columns = data.len(), "insert");
        self.storage
            .insert(self.table.name(), self.primary_key(), data)
            .map_err(|e| self.fail(e))
    }

    /// Writes every field of `data` to the row matching `data[primary_key]`.
    ///
    /// Returns the number of affected rows.
    pub fn update(&self, data: &Row) -> Result<u64> {
        self.require_primary_key()?;
        let id = data
            .get(self.primary_key())
            .cloned()
            .ok_or_else(|| self.error_family.error(ErrorKind::UnsetPrimaryKey))?;
        debug!(table = self.table.name(), columns = data.len(), "update");
        self.storage
            .update(&self.by_id(id), data)
            .map_err(|e| self.fail(e))
    }

    /// Sets a single column of the row matching `id`.
    pub fn change_field(
        &self,
        id: impl Into<Value>,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<u64> {
        let change = Row::new().with(key, value);
        debug!(table = self.table.name(), column = key, "change field");
        self.storage
            .update(&self.by_id(id.into()), &change)
            .map_err(|e| self.fail(e))
    }

    /// Deletes the row matching `id`.
    ///
    /// In tree mode every descendant is removed first, depth-first and
    /// post-order. The cascade is atomic: if any delete fails, none of the
    /// rows are removed. Returns the total number of rows deleted.
    pub fn delete_one(&self, id: impl Into<Value>) -> Result<u64> {
        self.require_primary_key()?;
        let id = id.into();
        let removed = self
            .storage
            .transaction(|| self.delete_subtree(id))
            .map_err(|f| self.fail(f))?;
        if self.parent_column().is_some() {
            info!(table = self.table.name(), removed, "cascading delete finished");
        }
        Ok(removed)
    }

    // Recurses once per tree level; the parent column must not form a cycle.
    fn delete_subtree(&self, id: Value) -> std::result::Result<u64, Failure> {
        let mut removed = 0;
        if let Some(children) = self.children(id.clone()) {
            let key = self.primary_key();
            let children = self.storage.fetch_all(&children.select([key]))?;
            for child in children {
                if let Some(child_id) = child.get(key) {
                    removed += self.delete_subtree(child_id.clone())?;
                }
            }
        }
        debug!(table = self.table.name(), id = %id, "delete");
        removed += self.storage.delete(&self.by_id(id))?;
        Ok(removed)
    }

    /// Deletes every row of the table. Returns the number removed.
    pub fn delete_all(&self) -> Result<u64> {
        debug!(table = self.table.name(), "delete all");
        self.storage.delete(&self.all()).map_err(|e| self.fail(e))
    }

    // -- quota ----------------------------------------------------------------

    /// Fails with [`ErrorKind::MaxNumberReached`] once the table holds
    /// `max_rows` rows or more.
    pub fn enforce_quota(&self, max_rows: u64) -> Result<()> {
        let count = self.storage.count(&self.all()).map_err(|e| self.fail(e))?;
        if count >= max_rows {
            warn!(table = self.table.name(), count, max_rows, "row quota reached");
            return Err(self.error_family.error(ErrorKind::MaxNumberReached));
        }
        Ok(())
    }

    /// [`enforce_quota`](Self::enforce_quota) with the configured
    /// `max_rows`; does nothing when none is configured.
    pub fn enforce_configured_quota(&self) -> Result<()> {
        match self.config.max_rows {
            Some(max_rows) => self.enforce_quota(max_rows),
            None => Ok(()),
        }
    }

    // -- CSV import -----------------------------------------------------------

    /// Imports CSV text into the table.
    ///
    /// The first record names the columns. Missing trailing cells and empty
    /// cells are stored as `NULL`; a record with more cells than the header
    /// is rejected. The configured quota is checked before each row, and the
    /// whole import runs in one transaction.
    pub fn import_csv(&self, text: &str, options: &CsvOptions, mode: ImportMode) -> Result<ImportReport> {
        let mut records = parse_csv(text, options).into_iter();
        let Some(header) = records.next() else {
            return Ok(ImportReport::default());
        };

        let report = self
            .storage
            .transaction(|| {
                let mut report = ImportReport::default();
                if mode == ImportMode::Replace {
                    report.rows_removed = self.storage.delete(&self.all())?;
                }
                for (index, record) in records.enumerate() {
                    if record.len() > header.len() {
                        warn!(
                            record = index + 2,
                            cells = record.len(),
                            columns = header.len(),
                            "csv record has more cells than the header"
                        );
                        return Err(ErrorFamily::generic().error(ErrorKind::ColumnUndefined).into());
                    }
                    self.enforce_configured_quota()?;
                    let row = csv_row(&header, record);
                    self.storage.insert(self.table.name(), self.primary_key(), &row)?;
                    report.rows_inserted += 1;
                }
                Ok(report)
            })
            .map_err(|f| self.fail(f))?;

        info!(
            table = self.table.name(),
            inserted = report.rows_inserted,
            removed = report.rows_removed,
            "csv import finished"
        );
        Ok(report)
    }

    // -- helpers --------------------------------------------------------------

    fn require_primary_key(&self) -> Result<()> {
        if self.primary_key().is_empty() {
            return Err(self.error_family.error(ErrorKind::UnsetPrimaryKey));
        }
        Ok(())
    }

    fn fail(&self, failure: impl Into<Failure>) -> ModelError {
        translate(failure.into(), &self.error_family)
    }
}

fn csv_row(header: &[String], record: Vec<String>) -> Row {
    let mut cells = record.into_iter();
    header
        .iter()
        .map(|column| {
            let value = match cells.next() {
                Some(cell) if !cell.is_empty() => Value::Text(cell),
                _ => Value::Null,
            };
            (column.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::query::{Comparison, Filter};

    /// In-memory table with an auto-increment `id`, optional unique column
    /// and an injectable delete failure.
    #[derive(Default)]
    struct MemoryStore {
        rows: RefCell<Vec<Row>>,
        next_id: Cell<i64>,
        unique: Option<&'static str>,
        fail_delete_of: Option<Value>,
    }

    impl MemoryStore {
        fn with_rows(rows: Vec<Row>) -> Self {
            let next = rows.len() as i64;
            let store = Self::default();
            *store.rows.borrow_mut() = rows;
            store.next_id.set(next);
            store
        }

        fn ids(&self) -> Vec<i64> {
            self.rows
                .borrow()
                .iter()
                .filter_map(|r| r.get("id").and_then(Value::as_i64))
                .collect()
        }
    }

    fn matches(row: &Row, filter: &Filter) -> bool {
        let value = row.get(&filter.column).unwrap_or(&Value::Null);
        let ordering = match (value, &filter.value) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Null, Value::Null) => std::cmp::Ordering::Equal,
            _ => return filter.comparison == Comparison::Ne,
        };
        match filter.comparison {
            Comparison::Eq => ordering.is_eq(),
            Comparison::Ne => ordering.is_ne(),
            Comparison::Lt => ordering.is_lt(),
            Comparison::Le => ordering.is_le(),
            Comparison::Gt => ordering.is_gt(),
            Comparison::Ge => ordering.is_ge(),
        }
    }

    fn matching(store: &MemoryStore, query: &Query) -> Vec<Row> {
        store
            .rows
            .borrow()
            .iter()
            .filter(|row| query.filters().iter().all(|f| matches(row, f)))
            .cloned()
            .collect()
    }

    impl Storage for MemoryStore {
        fn count(&self, query: &Query) -> StorageResult<u64> {
            Ok(matching(self, query).len() as u64)
        }

        fn fetch_one(&self, query: &Query) -> StorageResult<Option<Row>> {
            Ok(matching(self, query).into_iter().next())
        }

        fn fetch_all(&self, query: &Query) -> StorageResult<Vec<Row>> {
            Ok(matching(self, query))
        }

        fn insert(&self, _table: &str, primary_key: &str, row: &Row) -> StorageResult<Value> {
            if let Some(column) = self.unique {
                let value = row.get(column).cloned().unwrap_or(Value::Null);
                if self.rows.borrow().iter().any(|r| r.get(column) == Some(&value)) {
                    return Err(StorageError::Unique(column.to_string()));
                }
            }
            let mut row = row.clone();
            let id = match row.get(primary_key) {
                Some(id) => id.clone(),
                None => {
                    self.next_id.set(self.next_id.get() + 1);
                    Value::Integer(self.next_id.get())
                }
            };
            row.set(primary_key, id.clone());
            self.rows.borrow_mut().push(row);
            Ok(id)
        }

        fn update(&self, query: &Query, change: &Row) -> StorageResult<u64> {
            let mut affected = 0;
            for row in self.rows.borrow_mut().iter_mut() {
                if query.filters().iter().all(|f| matches(row, f)) {
                    for (column, value) in change.iter() {
                        row.set(column, value.clone());
                    }
                    affected += 1;
                }
            }
            Ok(affected)
        }

        fn delete(&self, query: &Query) -> StorageResult<u64> {
            if let Some(bad) = &self.fail_delete_of {
                let targeted = matching(self, query)
                    .iter()
                    .any(|row| row.get("id") == Some(bad));
                if targeted {
                    return Err(StorageError::ForeignKey("restricted".into()));
                }
            }
            let before = self.rows.borrow().len();
            self.rows
                .borrow_mut()
                .retain(|row| !query.filters().iter().all(|f| matches(row, f)));
            Ok((before - self.rows.borrow().len()) as u64)
        }

        fn transaction<T, F>(&self, f: F) -> std::result::Result<T, Failure>
        where
            F: FnOnce() -> std::result::Result<T, Failure>,
        {
            let snapshot = self.rows.borrow().clone();
            let result = f();
            if result.is_err() {
                *self.rows.borrow_mut() = snapshot;
            }
            result
        }
    }

    fn node(id: i64, parent: Option<i64>) -> Row {
        Row::new()
            .with("id", id)
            .with("name", format!("n{id}"))
            .with("parent_id", parent)
    }

    fn forest() -> MemoryStore {
        // 1 -> 2 -> 3, 1 -> 4, 5 (separate root)
        MemoryStore::with_rows(vec![
            node(1, None),
            node(2, Some(1)),
            node(3, Some(2)),
            node(4, Some(1)),
            node(5, None),
        ])
    }

    #[test]
    fn test_default_family_and_primary_key() {
        let store = MemoryStore::default();
        let model = Model::new(&store, "Tags", "tags");
        assert_eq!(model.error_family().as_str(), "TagsError");
        assert_eq!(model.primary_key(), "id");
        assert_eq!(model.table().name(), "tags");
        assert_eq!(model.parent_column(), None);
    }

    #[test]
    fn test_from_config() {
        let store = MemoryStore::default();
        let config = ModelConfig {
            primary_key: "tag_id".into(),
            parent_column: Some("parent".into()),
            error_family: Some("LabelError".into()),
            license: Some("L-1".into()),
            modules: Some(vec!["search".into()]),
            ..ModelConfig::default()
        };
        let model = Model::from_config(&store, "Labels", config);
        assert_eq!(model.table().name(), "Labels");
        assert_eq!(model.primary_key(), "tag_id");
        assert_eq!(model.parent_column(), Some("parent"));
        assert_eq!(model.error_family().as_str(), "LabelError");
        assert_eq!(model.license(), Some("L-1"));
        assert_eq!(model.modules(), Some(&["search".to_string()][..]));
    }

    #[test]
    fn test_add_config_uses_given_key() {
        let store = MemoryStore::default();
        let mut model = Model::new(&store, "Tags", "tags");
        model.add_config("page_size", 20);
        assert_eq!(model.config().get_extra("page_size"), Some(&serde_json::json!(20)));
        assert_eq!(model.config().get_extra("key"), None);
    }

    #[test]
    fn test_set_config_keeps_table() {
        let store = MemoryStore::default();
        let mut model = Model::new(&store, "Tags", "tags");
        model.set_config(ModelConfig::default());
        assert_eq!(model.config().table.as_deref(), Some("tags"));
    }

    #[test]
    fn test_set_config_keeps_family_in_sync() {
        let store = MemoryStore::default();
        let mut model = Model::new(&store, "Tags", "tags");
        model.set_config(ModelConfig {
            error_family: Some("OtherError".into()),
            ..ModelConfig::default()
        });
        assert_eq!(model.error_family().as_str(), "TagsError");
        assert_eq!(model.config().error_family.as_deref(), Some("TagsError"));
    }

    #[test]
    fn test_save_without_key_inserts() {
        let store = MemoryStore::default();
        let model = Model::new(&store, "Tags", "tags");
        let saved = model.save(&Row::new().with("name", "a")).unwrap();
        assert_eq!(saved, Saved::Inserted(Value::Integer(1)));
    }

    #[test]
    fn test_save_with_unset_key_strips_it() {
        let store = MemoryStore::default();
        let model = Model::new(&store, "Tags", "tags");
        let saved = model.save(&Row::new().with("id", 0).with("name", "a")).unwrap();
        assert_eq!(saved, Saved::Inserted(Value::Integer(1)));
        assert_eq!(store.ids(), vec![1]);
    }

    #[test]
    fn test_save_unknown_key_inserts_known_key_updates() {
        let store = forest();
        let model = Model::new(&store, "Tags", "tags");

        let saved = model.save(&Row::new().with("id", 42).with("name", "x")).unwrap();
        assert_eq!(saved, Saved::Inserted(Value::Integer(42)));

        let saved = model.save(&Row::new().with("id", 42).with("name", "y")).unwrap();
        assert_eq!(saved, Saved::Updated(1));
        let row = model.load(42).unwrap().unwrap();
        assert_eq!(row.get("name"), Some(&Value::from("y")));
    }

    #[test]
    fn test_empty_primary_key_is_rejected() {
        let store = MemoryStore::default();
        let mut model = Model::new(&store, "Tags", "tags");
        model.set_primary_key("");

        let err = model.save(&Row::new().with("name", "a")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsetPrimaryKey);
        assert_eq!(err.family().as_str(), "TagsError");

        let err = model.delete_one(1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsetPrimaryKey);
    }

    #[test]
    fn test_update_requires_key_in_data() {
        let store = forest();
        let model = Model::new(&store, "Tags", "tags");
        let err = model.update(&Row::new().with("name", "x")).unwrap_err();
        assert_eq!(err.code(), 1);
    }

    #[test]
    fn test_unique_violation_is_translated() {
        let store = MemoryStore {
            unique: Some("name"),
            ..MemoryStore::default()
        };
        let model = Model::new(&store, "Tags", "tags");
        model.insert(&Row::new().with("name", "a")).unwrap();
        let err = model.insert(&Row::new().with("name", "a")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ColumnMustBeUnique);
        assert!(err.family().is_generic());
        assert_eq!(store.ids().len(), 1);
    }

    #[test]
    fn test_cascade_removes_descendants_only() {
        let store = forest();
        let mut model = Model::new(&store, "Tags", "tags");
        model.set_parent_column(Some("parent_id"));

        assert_eq!(model.delete_one(1).unwrap(), 4);
        assert_eq!(store.ids(), vec![5]);
    }

    #[test]
    fn test_without_tree_mode_only_target_is_removed() {
        let store = forest();
        let model = Model::new(&store, "Tags", "tags");
        assert_eq!(model.delete_one(1).unwrap(), 1);
        assert_eq!(store.ids(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_failed_cascade_rolls_back() {
        let mut store = forest();
        store.fail_delete_of = Some(Value::Integer(4));
        let mut model = Model::new(&store, "Tags", "tags");
        model.set_parent_column(Some("parent_id"));

        let err = model.delete_one(1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ColumnRestrictForeignKey);
        assert_eq!(store.ids(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_children_and_has_children() {
        let store = forest();
        let mut model = Model::new(&store, "Tags", "tags");
        assert!(model.children(1).is_none());
        assert!(!model.has_children(1).unwrap());

        model.set_parent_column(Some("parent_id"));
        let children = model.rows(model.children(1).unwrap(), &[]).unwrap();
        assert_eq!(children.len(), 2);
        assert!(model.has_children(2).unwrap());
        assert!(!model.has_children(3).unwrap());

        model.set_parent_column(Some(""));
        assert_eq!(model.parent_column(), None);
    }

    #[test]
    fn test_quota_boundary() {
        let store = forest();
        let model = Model::new(&store, "Tags", "tags");
        assert!(model.enforce_quota(6).is_ok());
        let err = model.enforce_quota(5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MaxNumberReached);
        assert_eq!(err.family().as_str(), "TagsError");
    }

    #[test]
    fn test_import_respects_configured_quota() {
        let store = MemoryStore::default();
        let config = ModelConfig {
            table: Some("tags".into()),
            max_rows: Some(2),
            ..ModelConfig::default()
        };
        let model = Model::from_config(&store, "Tags", config);
        let err = model
            .import_csv("name\na\nb\nc\n", &CsvOptions::default(), ImportMode::Append)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MaxNumberReached);
        assert_eq!(err.family().as_str(), "TagsError");
        assert!(store.ids().is_empty());
    }

    #[test]
    fn test_import_rejects_wide_records() {
        let store = forest();
        let model = Model::new(&store, "Tags", "tags");
        let err = model
            .import_csv("name\na,b\n", &CsvOptions::default(), ImportMode::Replace)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ColumnUndefined);
        assert_eq!(store.ids().len(), 5);
    }

    #[test]
    fn test_csv_row_pads_with_null() {
        let header = vec!["id".to_string(), "name".to_string(), "note".to_string()];
        let row = csv_row(&header, vec!["".into(), "a".into()]);
        assert_eq!(row.get("id"), Some(&Value::Null));
        assert_eq!(row.get("name"), Some(&Value::from("a")));
        assert_eq!(row.get("note"), Some(&Value::Null));
    }
}
