use crate::core::collate::natural_cmp;
use crate::core::repository::Repository;
use crate::domain::model::{NormalizedRecord, RowId};
use crate::domain::ports::KeyValueStore;
use crate::utils::error::{ChecklistError, Result};
use std::collections::HashSet;

/// Unchecked rows first, then by name in natural order. Stable.
pub fn sort_records(mut records: Vec<NormalizedRecord>) -> Vec<NormalizedRecord> {
    records.sort_by(|a, b| {
        a.check_list
            .cmp(&b.check_list)
            .then_with(|| natural_cmp(&a.id_name, &b.id_name))
    });
    records
}

/// Rows whose name contains `query` (case-insensitive), optionally
/// restricted to unchecked rows. An empty query matches every row.
pub fn filter_records<'a>(
    records: &'a [NormalizedRecord],
    query: &str,
    unchecked_only: bool,
) -> Vec<&'a NormalizedRecord> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| record.id_name.to_lowercase().contains(&needle))
        .filter(|record| !unchecked_only || !record.check_list)
        .collect()
}

/// The checklist screen's working set, backed by the repository.
///
/// Every mutation re-sorts the rows and then writes the whole collection
/// back, so a fresh load always sees sorted, consistent data.
pub struct ChecklistStore<'a, S: KeyValueStore> {
    repo: &'a Repository<S>,
    records: Vec<NormalizedRecord>,
}

impl<'a, S: KeyValueStore> ChecklistStore<'a, S> {
    /// Loads and sorts the stored rows. Missing data loads as an empty list.
    pub fn load(repo: &'a Repository<S>) -> Result<Self> {
        let mut records = repo.load_checklist()?.unwrap_or_default();
        if assign_missing_row_ids(&mut records) {
            tracing::debug!("Re-keyed {} stored rows by position", records.len());
        }
        Ok(Self {
            repo,
            records: sort_records(records),
        })
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn checked_count(&self) -> usize {
        self.records.iter().filter(|r| r.check_list).count()
    }

    pub fn get(&self, row_id: RowId) -> Option<&NormalizedRecord> {
        self.records.iter().find(|r| r.row_id == row_id)
    }

    pub fn filter(&self, query: &str, unchecked_only: bool) -> Vec<&NormalizedRecord> {
        filter_records(&self.records, query, unchecked_only)
    }

    /// Flips the check flag of `row_id`, re-sorts and persists.
    pub fn toggle(&mut self, row_id: RowId) -> Result<&[NormalizedRecord]> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.row_id == row_id)
            .ok_or(ChecklistError::RecordNotFound(row_id))?;
        record.check_list = !record.check_list;
        tracing::info!(
            "{} {}",
            if record.check_list { "✅ Checked" } else { "↩️ Unchecked" },
            record.id_name
        );

        let records = std::mem::take(&mut self.records);
        self.records = sort_records(records);
        self.repo.save_checklist(&self.records)?;
        Ok(&self.records)
    }

    /// Erases all stored data. Cannot be undone.
    pub fn clear(self) -> Result<()> {
        self.repo.clear_all()
    }
}

/// Re-keys rows by position when keys are missing or repeated (data written
/// before row ids existed). Returns whether anything changed.
fn assign_missing_row_ids(records: &mut [NormalizedRecord]) -> bool {
    let mut seen = HashSet::new();
    if records.iter().all(|r| seen.insert(r.row_id)) {
        return false;
    }
    for (index, record) in records.iter_mut().enumerate() {
        record.row_id = RowId(index as u64);
    }
    true
}
