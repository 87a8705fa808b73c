use crate::core::repository::Repository;
use crate::domain::ports::KeyValueStore;
use crate::utils::error::Result;
use std::fmt;

/// Screens of the checklist flow, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Entry,
    LinkSubmission,
    ColumnSelection,
    Preview,
    Checklist,
}

impl Screen {
    /// Where a new session picks up, judged from what is stored.
    pub fn resume<S: KeyValueStore>(repo: &Repository<S>) -> Result<Screen> {
        if repo.load_checklist()?.is_some() {
            return Ok(Screen::Checklist);
        }
        if repo.load_raw_records()?.is_some() {
            return Ok(Screen::ColumnSelection);
        }
        Ok(Screen::Entry)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Screen::Entry => "entry",
            Screen::LinkSubmission => "link submission",
            Screen::ColumnSelection => "column selection",
            Screen::Preview => "preview",
            Screen::Checklist => "checklist",
        };
        f.write_str(label)
    }
}
