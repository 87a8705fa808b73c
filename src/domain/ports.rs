use crate::utils::error::Result;
use async_trait::async_trait;

/// String key-value storage shared by all stages (the browser's local
/// storage in the web version of the tool).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removes every entry.
    fn clear(&self) -> Result<()>;
}

/// Remote access to a published sheet.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Issues a header-only request; `Ok(true)` on a success status.
    async fn head(&self, url: &str) -> Result<bool>;

    /// Fetches the body as text. Non-success statuses are errors.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}
