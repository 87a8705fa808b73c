use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One data line of the sheet, keyed by lowercase header name.
///
/// Keys keep the header order of the source sheet. Rows shorter than the
/// header line simply lack the trailing keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), Value::String(value.into()));
    }

    /// Cell value for `key`. Non-string JSON values (only possible in data
    /// written by other tools) are treated as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// Stable key of a checklist row, assigned once when the rows are mapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for RowId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(RowId)
    }
}

/// A checklist row as persisted under `filteredCsvData`.
///
/// Retained columns are flattened next to `idName` and `checkList`. The
/// camel-cased field names can never clash with retained columns because
/// those are always lowercase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    #[serde(rename = "rowId", default)]
    pub row_id: RowId,
    #[serde(rename = "idName", default)]
    pub id_name: String,
    #[serde(rename = "checkList", default)]
    pub check_list: bool,
    #[serde(flatten)]
    pub retained: Map<String, Value>,
}

impl NormalizedRecord {
    pub fn new(row_id: RowId, id_name: impl Into<String>) -> Self {
        Self {
            row_id,
            id_name: id_name.into(),
            check_list: false,
            retained: Map::new(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.retained
            .insert(column.into(), Value::String(value.into()));
        self
    }

    /// Retained columns in insertion order, rendered as text.
    pub fn retained_columns(&self) -> impl Iterator<Item = (&str, String)> {
        self.retained.iter().map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key.as_str(), text)
        })
    }
}

/// Which source column(s) make up a row's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityColumns {
    Single(String),
    Split { first: String, last: String },
}

impl IdentityColumns {
    pub fn contains(&self, column: &str) -> bool {
        match self {
            IdentityColumns::Single(name) => name == column,
            IdentityColumns::Split { first, last } => first == column || last == column,
        }
    }
}

/// A complete column choice: one identity mode plus the retained columns.
///
/// Identity columns and duplicates are removed from the retained list on
/// construction, so a selection can always be mapped as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    identity: IdentityColumns,
    retained: Vec<String>,
}

impl ColumnSelection {
    pub fn new<I, S>(identity: IdentityColumns, retained: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut kept: Vec<String> = Vec::new();
        for column in retained {
            let column = column.into();
            if identity.contains(&column) || kept.contains(&column) {
                continue;
            }
            kept.push(column);
        }
        Self {
            identity,
            retained: kept,
        }
    }

    pub fn single<I, S>(name: impl Into<String>, retained: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(IdentityColumns::Single(name.into()), retained)
    }

    pub fn split<I, S>(first: impl Into<String>, last: impl Into<String>, retained: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            IdentityColumns::Split {
                first: first.into(),
                last: last.into(),
            },
            retained,
        )
    }

    pub fn identity(&self) -> &IdentityColumns {
        &self.identity
    }

    pub fn retained(&self) -> &[String] {
        &self.retained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_drops_identity_and_duplicate_columns() {
        let selection = ColumnSelection::split("first", "last", ["first", "age", "last", "age", "team"]);
        assert_eq!(selection.retained(), ["age", "team"]);
    }

    #[test]
    fn test_normalized_record_json_shape() {
        let record = NormalizedRecord::new(RowId(3), "Jane Doe").with_column("age", "30");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"rowId": 3, "idName": "Jane Doe", "checkList": false, "age": "30"})
        );
    }

    #[test]
    fn test_normalized_record_reads_rows_without_row_id() {
        let record: NormalizedRecord =
            serde_json::from_str(r#"{"idName":"Bob","team":"Red","checkList":true}"#).unwrap();

        assert_eq!(record.row_id, RowId(0));
        assert_eq!(record.id_name, "Bob");
        assert!(record.check_list);
        assert_eq!(record.retained.get("team").and_then(Value::as_str), Some("Red"));
        assert!(!record.retained.contains_key("idName"));
    }

    #[test]
    fn test_raw_record_keeps_key_order() {
        let record: RawRecord = [("zeta", "1"), ("alpha", "2")].into_iter().collect();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
    }
}
