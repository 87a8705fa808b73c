use crate::core::checklist::ChecklistStore;
use crate::core::flow::Screen;
use crate::core::ingest;
use crate::core::mapper::{map_records, SelectionForm};
use crate::core::repository::Repository;
use crate::core::validator;
use crate::domain::model::NormalizedRecord;
use crate::domain::ports::{KeyValueStore, SheetSource};
use crate::utils::error::{ChecklistError, Result};

/// Drives the stages in order: link check, ingest, column mapping,
/// checklist. Stages only talk through the repository.
pub struct ChecklistEngine<S: KeyValueStore, H: SheetSource> {
    repo: Repository<S>,
    source: H,
}

impl<S: KeyValueStore, H: SheetSource> ChecklistEngine<S, H> {
    pub fn new(store: S, source: H) -> Self {
        Self {
            repo: Repository::new(store),
            source,
        }
    }

    pub fn repository(&self) -> &Repository<S> {
        &self.repo
    }

    /// Validates `input`, stores the link and the parsed rows.
    /// Returns the number of rows stored (zero also when the fetch failed).
    pub async fn submit_link(&self, input: &str) -> Result<usize> {
        tracing::info!("Starting link submission");

        let url = validator::validate_submission(&self.source, input).await?;
        self.repo.save_source_url(&url)?;

        let records = ingest::ingest(&self.source, &url).await;
        if records.is_empty() {
            tracing::warn!("⚠️ No rows were loaded; the sheet may be empty or the fetch failed");
        }
        self.repo.save_raw_records(&records)?;

        tracing::info!("✅ Stored {} rows", records.len());
        Ok(records.len())
    }

    /// Column names offered on the selection screen.
    pub fn headers(&self) -> Result<Vec<String>> {
        let records = self
            .repo
            .load_raw_records()?
            .ok_or(ChecklistError::NoSheetData)?;
        Ok(ingest::headers(&records))
    }

    /// Submits the selection form and stores the mapped checklist rows,
    /// replacing any previous mapping.
    pub fn apply_selection(&self, form: &SelectionForm) -> Result<Vec<NormalizedRecord>> {
        let records = self
            .repo
            .load_raw_records()?
            .ok_or(ChecklistError::NoSheetData)?;
        let headers = ingest::headers(&records);
        let selection = form.submit(&headers)?;
        tracing::debug!("Column selection: {:?}", selection);

        let mapped = map_records(&records, &selection);
        self.repo.save_checklist(&mapped)?;

        tracing::info!("🧩 Mapped {} rows", mapped.len());
        Ok(mapped)
    }

    /// The first `rows` mapped rows, in sheet order.
    pub fn preview(&self, rows: usize) -> Result<Vec<NormalizedRecord>> {
        let mut records = self.repo.load_checklist()?.unwrap_or_default();
        records.truncate(rows);
        Ok(records)
    }

    pub fn open_checklist(&self) -> Result<ChecklistStore<'_, S>> {
        ChecklistStore::load(&self.repo)
    }

    pub fn current_screen(&self) -> Result<Screen> {
        Screen::resume(&self.repo)
    }
}
