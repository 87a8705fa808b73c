use crate::domain::model::{ColumnSelection, IdentityColumns, NormalizedRecord, RawRecord, RowId};
use crate::utils::error::{ChecklistError, Result};
use std::fmt;

/// Maps raw sheet rows onto checklist rows, one for one and in order.
///
/// Every row gets a fresh `RowId` (its position), an `idName` built from the
/// identity column(s), the retained columns, and `checkList = false`.
/// No validation happens here: a selection naming missing columns yields
/// empty names.
pub fn map_records(records: &[RawRecord], selection: &ColumnSelection) -> Vec<NormalizedRecord> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| map_record(RowId(index as u64), record, selection))
        .collect()
}

fn map_record(row_id: RowId, record: &RawRecord, selection: &ColumnSelection) -> NormalizedRecord {
    let mut normalized = NormalizedRecord::new(row_id, identity_name(record, selection.identity()));

    for column in selection.retained() {
        // 缺少的欄位不寫入（與原本 JSON 序列化時省略 undefined 相同）
        if let Some(value) = record.get(column) {
            normalized = normalized.with_column(column.as_str(), coerce_boolean(value));
        }
    }

    normalized
}

fn identity_name(record: &RawRecord, identity: &IdentityColumns) -> String {
    match identity {
        IdentityColumns::Single(column) => record.get(column).unwrap_or("").trim().to_string(),
        IdentityColumns::Split { first, last } => format!(
            "{} {}",
            record.get(first).unwrap_or(""),
            record.get(last).unwrap_or("")
        )
        .trim()
        .to_string(),
    }
}

/// Sheet booleans are shown as Yes/No; everything else passes through.
pub fn coerce_boolean(value: &str) -> &str {
    match value {
        "TRUE" => "Yes",
        "FALSE" => "No",
        other => other,
    }
}

/// Which required selectors are still missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionErrors {
    pub name: bool,
    pub first_name: bool,
    pub last_name: bool,
}

impl SelectionErrors {
    pub fn any(&self) -> bool {
        self.name || self.first_name || self.last_name
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name {
            fields.push("name");
        }
        if self.first_name {
            fields.push("first name");
        }
        if self.last_name {
            fields.push("last name");
        }
        fields
    }
}

impl fmt::Display for SelectionErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.missing_fields().join(", "))
    }
}

/// The column-selection screen's state before it is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionForm {
    split_name: bool,
    name: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    keep: Vec<String>,
}

impl SelectionForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches between the single name column and first/last columns.
    /// Switching clears every identity choice made so far.
    pub fn set_split_name(&mut self, split: bool) {
        if self.split_name != split {
            self.name = None;
            self.first_name = None;
            self.last_name = None;
        }
        self.split_name = split;
    }

    pub fn is_split_name(&self) -> bool {
        self.split_name
    }

    pub fn set_name(&mut self, column: impl Into<String>) {
        self.name = non_empty(column.into());
    }

    pub fn set_first_name(&mut self, column: impl Into<String>) {
        self.first_name = non_empty(column.into());
    }

    pub fn set_last_name(&mut self, column: impl Into<String>) {
        self.last_name = non_empty(column.into());
    }

    /// Flips whether `column` is kept.
    pub fn toggle_keep(&mut self, column: impl Into<String>) {
        let Some(column) = non_empty(column.into()) else {
            return;
        };
        if let Some(pos) = self.keep.iter().position(|c| *c == column) {
            self.keep.remove(pos);
        } else {
            self.keep.push(column);
        }
    }

    pub fn keep<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for column in columns.into_iter().filter_map(|c| non_empty(c.into())) {
            if !self.keep.contains(&column) {
                self.keep.push(column);
            }
        }
        self
    }

    /// True when `column` is taken by the current identity choice.
    pub fn is_identity_column(&self, column: &str) -> bool {
        [&self.name, &self.first_name, &self.last_name]
            .into_iter()
            .flatten()
            .any(|c| c == column)
    }

    /// Flags each missing required selector independently.
    pub fn errors(&self) -> SelectionErrors {
        if self.split_name {
            SelectionErrors {
                name: false,
                first_name: self.first_name.is_none(),
                last_name: self.last_name.is_none(),
            }
        } else {
            SelectionErrors {
                name: self.name.is_none(),
                ..SelectionErrors::default()
            }
        }
    }

    /// Builds the selection, checking that every named column exists in
    /// `headers`.
    pub fn submit(&self, headers: &[String]) -> Result<ColumnSelection> {
        let errors = self.errors();
        if errors.any() {
            return Err(ChecklistError::SelectionIncomplete(errors));
        }

        let identity = match (&self.name, &self.first_name, &self.last_name) {
            (_, Some(first), Some(last)) if self.split_name => IdentityColumns::Split {
                first: first.clone(),
                last: last.clone(),
            },
            (Some(name), _, _) if !self.split_name => IdentityColumns::Single(name.clone()),
            _ => return Err(ChecklistError::SelectionIncomplete(errors)),
        };

        let named = [&self.name, &self.first_name, &self.last_name]
            .into_iter()
            .flatten()
            .chain(self.keep.iter());
        for column in named {
            if !headers.contains(column) {
                return Err(ChecklistError::UnknownColumn {
                    column: column.clone(),
                    available: headers.join(", "),
                });
            }
        }

        Ok(ColumnSelection::new(identity, self.keep.iter().cloned()))
    }
}

// 標題已轉為小寫，欄位名稱一律以小寫比對
fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
