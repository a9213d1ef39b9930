//! Cell values and ordered rows.
//!
//! A [`Row`] is an ordered mapping from column name to [`Value`]. Column order
//! follows insertion order, which is also the order the storage layer reports
//! columns in when fetching.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A single scalar cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value cannot identify an existing row.
    ///
    /// `Null`, empty text, numeric zero and an empty blob count as an unset
    /// key, so a save carrying one of them always inserts.
    pub fn is_unset(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Integer(n) => *n == 0,
            Value::Real(f) => *f == 0.0,
            Value::Text(s) => s.is_empty(),
            Value::Blob(b) => b.is_empty(),
        }
    }

    /// Returns the integer payload, if any.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => f.write_str(s),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// An ordered mapping from column name to [`Value`].
///
/// Setting a column that already exists replaces its value in place and
/// keeps its position.
///
/// # Examples
///
/// ```
/// use table_model_core::{Row, Value};
///
/// let row = Row::new().with("id", 1).with("name", "a");
/// assert_eq!(row.get("name"), Some(&Value::from("a")));
/// assert_eq!(row.columns().collect::<Vec<_>>(), vec!["id", "name"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Sets `column` to `value`, replacing any previous value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Removes `column` and returns its value.
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        let index = self.cells.iter().position(|(name, _)| name == column)?;
        Some(self.cells.remove(index).1)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// Values in column order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.cells.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Converts the row to a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .cells
            .iter()
            .map(|(name, value)| (name.clone(), value_to_json(value)))
            .collect();
        serde_json::Value::Object(map)
    }

    /// Deserializes the row into a caller-defined record type.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the row's columns do not match `T`.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.to_json())
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(n) => serde_json::Value::from(*n),
        Value::Real(r) => serde_json::Value::from(*r),
        Value::Text(s) => serde_json::Value::from(s.as_str()),
        Value::Blob(b) => serde_json::Value::from(b.clone()),
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut row = Row::new().with("id", 1).with("name", "a").with("rank", 3);
        row.set("name", "b");
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["id", "name", "rank"]);
        assert_eq!(row.get("name"), Some(&Value::from("b")));
    }

    #[test]
    fn test_remove_drops_column() {
        let mut row = Row::new().with("id", 1).with("name", "a");
        assert_eq!(row.remove("id"), Some(Value::Integer(1)));
        assert!(!row.contains("id"));
        assert_eq!(row.len(), 1);
        assert_eq!(row.remove("id"), None);
    }

    #[test]
    fn test_unset_values() {
        assert!(Value::Null.is_unset());
        assert!(Value::Integer(0).is_unset());
        assert!(Value::from("").is_unset());
        assert!(Value::Real(0.0).is_unset());
        assert!(Value::Blob(Vec::new()).is_unset());
        assert!(!Value::Integer(7).is_unset());
        assert!(!Value::from("x").is_unset());
        assert!(!Value::Real(0.5).is_unset());
        assert!(!Value::Blob(vec![0]).is_unset());
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }

    #[test]
    fn test_serialize_keeps_column_order() {
        let row = Row::new().with("z", 1).with("a", Value::Null).with("m", "t");
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"z":1,"a":null,"m":"t"}"#);
    }

    #[test]
    fn test_deserialize_into_record() {
        #[derive(Deserialize)]
        struct Tag {
            id: i64,
            name: String,
            parent_id: Option<i64>,
        }

        let row = Row::new()
            .with("id", 4)
            .with("name", "rust")
            .with("parent_id", Value::Null);
        let tag: Tag = row.deserialize_into().unwrap();
        assert_eq!(tag.id, 4);
        assert_eq!(tag.name, "rust");
        assert_eq!(tag.parent_id, None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Integer(3).to_string(), "3");
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::Blob(vec![1, 2]).to_string(), "<2 bytes>");
    }
}
