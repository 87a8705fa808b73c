use crate::domain::model::{NormalizedRecord, RawRecord};
use crate::domain::ports::KeyValueStore;
use crate::utils::error::{ChecklistError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key under which the submitted sheet link is stored.
pub const CSV_URL_KEY: &str = "csvUrl";
/// Key for the parsed sheet rows, before column mapping.
pub const CSV_DATA_KEY: &str = "csvData";
/// Key for the checklist rows.
pub const FILTERED_CSV_DATA_KEY: &str = "filteredCsvData";

/// Typed access to the entries the stages hand to each other.
#[derive(Debug, Clone)]
pub struct Repository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load_source_url(&self) -> Result<Option<String>> {
        self.store.get(CSV_URL_KEY)
    }

    pub fn save_source_url(&self, url: &str) -> Result<()> {
        self.store.set(CSV_URL_KEY, url)
    }

    /// `None` when no sheet has been loaded yet.
    pub fn load_raw_records(&self) -> Result<Option<Vec<RawRecord>>> {
        self.load_json(CSV_DATA_KEY)
    }

    pub fn save_raw_records(&self, records: &[RawRecord]) -> Result<()> {
        self.save_json(CSV_DATA_KEY, records)
    }

    /// `None` when no columns have been mapped yet.
    pub fn load_checklist(&self) -> Result<Option<Vec<NormalizedRecord>>> {
        self.load_json(FILTERED_CSV_DATA_KEY)
    }

    pub fn save_checklist(&self, records: &[NormalizedRecord]) -> Result<()> {
        self.save_json(FILTERED_CSV_DATA_KEY, records)
    }

    /// Erases every stored entry.
    pub fn clear_all(&self) -> Result<()> {
        tracing::info!("🗑️ Clearing stored sheet data");
        self.store.clear()
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        if raw == "null" {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| ChecklistError::CorruptEntry {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        tracing::debug!("Saving {} ({} bytes)", key, json.len());
        self.store.set(key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;
    use crate::domain::model::RowId;

    #[test]
    fn test_entries_use_wire_keys() {
        let store = MemoryStore::new();
        let repo = Repository::new(store.clone());

        repo.save_source_url("https://example.com").unwrap();
        let raw: RawRecord = [("name", "Alice")].into_iter().collect();
        repo.save_raw_records(&[raw]).unwrap();
        repo.save_checklist(&[NormalizedRecord::new(RowId(0), "Alice")])
            .unwrap();

        assert_eq!(store.get(CSV_URL_KEY).unwrap().as_deref(), Some("https://example.com"));
        assert_eq!(store.get(CSV_DATA_KEY).unwrap().as_deref(), Some(r#"[{"name":"Alice"}]"#));
        assert_eq!(
            store.get(FILTERED_CSV_DATA_KEY).unwrap().as_deref(),
            Some(r#"[{"rowId":0,"idName":"Alice","checkList":false}]"#)
        );
    }

    #[test]
    fn test_missing_entries_load_as_none() {
        let repo = Repository::new(MemoryStore::new());

        assert!(repo.load_source_url().unwrap().is_none());
        assert!(repo.load_raw_records().unwrap().is_none());
        assert!(repo.load_checklist().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_entry_reports_key() {
        let store = MemoryStore::new();
        store.set(CSV_DATA_KEY, "{not json").unwrap();
        let repo = Repository::new(store);

        let err = repo.load_raw_records().unwrap_err();
        assert!(matches!(err, ChecklistError::CorruptEntry { ref key, .. } if key == CSV_DATA_KEY));
    }

    #[test]
    fn test_clear_all_removes_everything() {
        let repo = Repository::new(MemoryStore::new());
        repo.save_source_url("https://example.com").unwrap();
        repo.save_checklist(&[]).unwrap();

        repo.clear_all().unwrap();

        assert!(repo.load_source_url().unwrap().is_none());
        assert!(repo.load_checklist().unwrap().is_none());
    }
}
